//! Byte stream the session drives.
//!
//! The session only needs a handful of primitives: write, flush, a plain
//! read and the two modem control lines used to reset the board. Framing
//! replies at the prompt is left to the session. [`SerialTransport`] provides them over a serial port; tests provide
//! their own implementation.

mod serial;

use std::io;

use bytes::BytesMut;

pub use serial::SerialTransport;

/// Transport handler. This is `async_trait`
#[async_trait]
pub trait Transport: Send {
    /// Discards everything received but not yet read.
    fn clear_input(&mut self) -> io::Result<()>;

    /// Drives the RTS control line.
    fn set_rts(&mut self, level: bool) -> io::Result<()>;

    /// Drives the DTR control line.
    fn set_dtr(&mut self, level: bool) -> io::Result<()>;

    /// Number of received bytes that can be read without waiting.
    fn bytes_pending(&mut self) -> io::Result<usize>;

    /// Writes all of `data`.
    async fn write(&mut self, data: &[u8]) -> io::Result<()>;

    /// Waits until everything written has left the host.
    async fn flush(&mut self) -> io::Result<()>;

    /// Waits until data has been received and appends it to `buf`. Returns
    /// the number of bytes appended, 0 once the device is gone.
    ///
    /// Must be cancel safe: the session drops the future when its idle
    /// timeout expires and no received byte may be lost by that.
    async fn read(&mut self, buf: &mut BytesMut) -> io::Result<usize>;

    /// Releases the underlying device. Called exactly once.
    async fn close(&mut self) -> io::Result<()>;
}
