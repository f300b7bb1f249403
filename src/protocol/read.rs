use std::fmt;

use super::{impl_command_for, quote, Command, OpenMode};

/// Prints the whole content of a file as one hex bytes literal.
/// Requires `hexlify` to be imported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Read {
    pub filename: String,
}

impl Read {
    pub fn new<T: Into<String>>(filename: T) -> Self {
        Self {
            filename: filename.into(),
        }
    }
}

impl fmt::Display for Read {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hexlify(open({}, {}).read())",
            quote(&self.filename),
            quote(OpenMode::ReadBinary.as_str())
        )
    }
}

impl_command_for!(Read);
