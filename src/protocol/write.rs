use std::fmt;

use super::{impl_command_for, Command, HANDLE};

/// Appends one hex-encoded chunk to the open remote handle.
/// Requires `unhexlify` to be imported.
#[derive(Clone, PartialEq, Eq)]
pub struct Write {
    pub data: String,
}

impl Write {
    pub fn new<T: Into<String>>(data: T) -> Self {
        Self { data: data.into() }
    }
}

impl fmt::Debug for Write {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Write")
            .field("data", &self.data.len())
            .finish()
    }
}

impl fmt::Display for Write {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{HANDLE}.write(unhexlify(b'{}'))", self.data)
    }
}

impl_command_for!(Write);
