//! Manage files on a MicroPython board through its interactive prompt.
//!
//! The board is reset over the serial control lines, interrupted, and then
//! driven one source line at a time: every filesystem operation is a short
//! sequence of lines such as `stat("/lib")[0]` or `listdir("/lib")` whose
//! printed reply is parsed back. See [`client::UpySession`] for the
//! operations and [`transport::Transport`] for what the byte stream must
//! provide.

#[macro_use]
extern crate log;
#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate async_trait;

pub mod classify;
/// Session engine and filesystem operations
pub mod client;
mod error;
/// Command lines sent to the prompt
pub mod protocol;
pub mod repr;
/// Byte stream abstraction and the serial port implementation
pub mod transport;
mod utils;

pub use error::{Error, UpyResult};
