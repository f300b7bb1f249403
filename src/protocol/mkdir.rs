use std::fmt;

use super::{impl_command_for, quote, Command};

/// Creates a single directory. The parent must already exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MkDir {
    pub path: String,
}

impl MkDir {
    pub fn new<T: Into<String>>(path: T) -> Self {
        Self { path: path.into() }
    }
}

impl fmt::Display for MkDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mkdir({})", quote(&self.path))
    }
}

impl_command_for!(MkDir);
