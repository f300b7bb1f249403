use std::fmt;

use super::{impl_command_for, quote, Command};

/// Removes an empty directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RmDir {
    pub path: String,
}

impl RmDir {
    pub fn new<T: Into<String>>(path: T) -> Self {
        Self { path: path.into() }
    }
}

impl fmt::Display for RmDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rmdir({})", quote(&self.path))
    }
}

impl_command_for!(RmDir);
