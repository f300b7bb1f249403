use std::fmt;

use super::{impl_command_for, quote, Command};

/// Prints the names of the immediate children of a directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadDir {
    pub path: String,
}

impl ReadDir {
    pub fn new<T: Into<String>>(path: T) -> Self {
        Self { path: path.into() }
    }
}

impl fmt::Display for ReadDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listdir({})", quote(&self.path))
    }
}

impl_command_for!(ReadDir);
