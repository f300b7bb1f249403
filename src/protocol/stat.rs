use std::fmt;

use super::{impl_command_for, quote, Command};

/// Prints the `st_mode` word of a path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stat {
    pub path: String,
}

impl Stat {
    pub fn new<T: Into<String>>(path: T) -> Self {
        Self { path: path.into() }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stat({})[0]", quote(&self.path))
    }
}

impl_command_for!(Stat);
