use std::fmt;

use super::{impl_command_for, Command};

/// Binds names from a remote module into the prompt's namespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub module: &'static str,
    pub names: Vec<&'static str>,
}

impl Import {
    /// Filesystem primitives every other command relies on. Sent once per session.
    pub fn preamble() -> Self {
        Self {
            module: "os",
            names: vec!["listdir", "mkdir", "rmdir", "remove", "stat"],
        }
    }

    pub fn unhexlify() -> Self {
        Self {
            module: "ubinascii",
            names: vec!["unhexlify"],
        }
    }

    pub fn hexlify() -> Self {
        Self {
            module: "ubinascii",
            names: vec!["hexlify"],
        }
    }
}

impl fmt::Display for Import {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "from {} import {}", self.module, self.names.join(", "))
    }
}

impl_command_for!(Import);
