mod close;
mod file_attrs;
mod init;
mod mkdir;
mod open;
mod read;
mod readdir;
mod remove;
mod rmdir;
mod stat;
mod write;

use std::fmt;

pub use self::{
    close::Close,
    file_attrs::{FileMode, FileType},
    init::Import,
    mkdir::MkDir,
    open::{Open, OpenMode},
    read::Read,
    readdir::ReadDir,
    remove::Remove,
    rmdir::RmDir,
    stat::Stat,
    write::Write,
};

/// Prompt the interpreter prints whenever it waits for input
pub const PROMPT: &[u8] = b">>> ";
/// Ctrl-C, interrupts whatever the interpreter is running
pub const INTERRUPT: u8 = 0x03;
/// Every command line is terminated with CRLF
pub const LINE_END: &str = "\r\n";

/// Name of the remote variable holding the file being written
pub(crate) const HANDLE: &str = "_upyfs_f";

/// Renders `value` as a double-quoted interpreter string literal.
pub fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            // a raw tab would trigger completion at the prompt
            '\t' => quoted.push_str("\\t"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

macro_rules! impl_command_for {
    ($name:ident) => {
        impl From<$name> for Command {
            fn from(input: $name) -> Self {
                Self::$name(input)
            }
        }
    };
}

pub(crate) use impl_command_for;

/// A single line of source executed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Import(Import),
    Stat(Stat),
    ReadDir(ReadDir),
    MkDir(MkDir),
    RmDir(RmDir),
    Remove(Remove),
    Open(Open),
    Write(Write),
    Close(Close),
    Read(Read),
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Import(c) => c.fmt(f),
            Self::Stat(c) => c.fmt(f),
            Self::ReadDir(c) => c.fmt(f),
            Self::MkDir(c) => c.fmt(f),
            Self::RmDir(c) => c.fmt(f),
            Self::Remove(c) => c.fmt(f),
            Self::Open(c) => c.fmt(f),
            Self::Write(c) => c.fmt(f),
            Self::Close(c) => c.fmt(f),
            Self::Read(c) => c.fmt(f),
        }
    }
}
