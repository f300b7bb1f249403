use std::io;

use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_serial::{ClearBuffer, SerialPort, SerialPortBuilderExt, SerialStream};

use super::Transport;
use crate::error::UpyResult;

/// [`Transport`] over a serial device such as `/dev/ttyUSB0`
pub struct SerialTransport {
    path: String,
    port: Option<SerialStream>,
}

impl SerialTransport {
    /// Opens the device at `path` with 8N1 framing at `baud`.
    pub fn open<T: Into<String>>(path: T, baud: u32) -> UpyResult<Self> {
        let path = path.into();
        let port = tokio_serial::new(path.as_str(), baud).open_native_async()?;
        debug!("opened {path} at {baud} baud");

        Ok(Self {
            path,
            port: Some(port),
        })
    }

    fn port(&mut self) -> io::Result<&mut SerialStream> {
        self.port
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "serial port closed"))
    }
}

#[async_trait]
impl Transport for SerialTransport {
    fn clear_input(&mut self) -> io::Result<()> {
        Ok(self.port()?.clear(ClearBuffer::Input)?)
    }

    fn set_rts(&mut self, level: bool) -> io::Result<()> {
        Ok(self.port()?.write_request_to_send(level)?)
    }

    fn set_dtr(&mut self, level: bool) -> io::Result<()> {
        Ok(self.port()?.write_data_terminal_ready(level)?)
    }

    fn bytes_pending(&mut self) -> io::Result<usize> {
        Ok(self.port()?.bytes_to_read()? as usize)
    }

    async fn write(&mut self, data: &[u8]) -> io::Result<()> {
        self.port()?.write_all(data).await
    }

    async fn flush(&mut self) -> io::Result<()> {
        self.port()?.flush().await
    }

    async fn read(&mut self, buf: &mut BytesMut) -> io::Result<usize> {
        // read_buf only appends once data has arrived, so dropping this
        // future mid-wait loses nothing
        let read = self.port()?.read_buf(buf).await?;
        if read == 0 {
            debug!("{} reached end of stream", self.path);
        }
        Ok(read)
    }

    async fn close(&mut self) -> io::Result<()> {
        if let Some(mut port) = self.port.take() {
            let _ = port.flush().await;
            debug!("closed {}", self.path);
        }
        Ok(())
    }
}
