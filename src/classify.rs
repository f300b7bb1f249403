//! Maps remote exception output to structured errors.
//!
//! The interpreter reports every failure as a printed traceback. The text of
//! the final exception line is a stable property of the firmware, so the
//! known faults are recognized by matching against a table of signatures.
//! Operations never look at raw exception text themselves.

use crate::error::{Error, UpyResult};

/// Header printed before every uncaught exception
pub const TRACEBACK: &str = "Traceback (most recent call last):";

/// Fault kinds the classifier can derive from output text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    NotFound,
    AlreadyExists,
}

/// How a signature is compared against an output line
#[derive(Debug, Clone, Copy)]
enum Pattern {
    /// The line contains the text anywhere
    Contains(&'static str),
    /// The line is exactly the text, ignoring surrounding whitespace
    Line(&'static str),
}

impl Pattern {
    fn matches(self, line: &str) -> bool {
        match self {
            Self::Contains(text) => line.contains(text),
            Self::Line(text) => line.trim() == text,
        }
    }
}

/// Known remote fault signatures, checked in order.
///
/// Older firmware prints the bare errno (`OSError: 2`), newer builds the
/// symbolic form.
const SIGNATURES: &[(Pattern, Fault)] = &[
    (Pattern::Contains("OSError: [Errno 2] ENOENT"), Fault::NotFound),
    (Pattern::Line("OSError: 2"), Fault::NotFound),
    (Pattern::Contains("OSError: [Errno 17] EEXIST"), Fault::AlreadyExists),
    (Pattern::Line("OSError: 17"), Fault::AlreadyExists),
];

/// Returns the fault named by the output, if it is a traceback and a known
/// signature matches. Ordinary output is never a fault, whatever it prints.
pub fn fault(raw: &str) -> Option<Fault> {
    if !raw.contains(TRACEBACK) {
        return None;
    }

    raw.lines().find_map(|line| {
        SIGNATURES
            .iter()
            .find(|(pattern, _)| pattern.matches(line))
            .map(|(_, fault)| *fault)
    })
}

/// Passes `raw` through when it carries no exception, otherwise converts it
/// to an error. `subject` is the remote path the command was about and ends
/// up in `NotFound` and `AlreadyExists`.
pub fn classify<'a>(raw: &'a str, subject: &str) -> UpyResult<&'a str> {
    match fault(raw) {
        Some(Fault::NotFound) => Err(Error::NotFound(subject.to_owned())),
        Some(Fault::AlreadyExists) => Err(Error::AlreadyExists(subject.to_owned())),
        None if raw.contains(TRACEBACK) => Err(Error::Remote(raw.trim().to_owned())),
        None => Ok(raw),
    }
}
