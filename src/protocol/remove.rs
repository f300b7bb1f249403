use std::fmt;

use super::{impl_command_for, quote, Command};

/// Deletes a regular file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remove {
    pub filename: String,
}

impl Remove {
    pub fn new<T: Into<String>>(filename: T) -> Self {
        Self {
            filename: filename.into(),
        }
    }
}

impl fmt::Display for Remove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "remove({})", quote(&self.filename))
    }
}

impl_command_for!(Remove);
