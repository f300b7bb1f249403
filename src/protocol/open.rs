use std::fmt;

use super::{impl_command_for, quote, Command, HANDLE};

/// Mode string passed to the remote `open`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    ReadBinary,
    WriteBinary,
}

impl OpenMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReadBinary => "rb",
            Self::WriteBinary => "wb",
        }
    }
}

/// Opens a file and binds it to the remote handle variable.
///
/// Opening with [`OpenMode::WriteBinary`] creates the file or truncates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Open {
    pub filename: String,
    pub mode: OpenMode,
}

impl Open {
    pub fn new<T: Into<String>>(filename: T, mode: OpenMode) -> Self {
        Self {
            filename: filename.into(),
            mode,
        }
    }
}

impl fmt::Display for Open {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{HANDLE} = open({}, {})",
            quote(&self.filename),
            quote(self.mode.as_str())
        )
    }
}

impl_command_for!(Open);
