use std::fmt;

use super::{impl_command_for, Command, HANDLE};

/// Closes the remote handle, flushing what was written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Close;

impl fmt::Display for Close {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{HANDLE}.close()")
    }
}

impl_command_for!(Close);
