use bytes::{Bytes, BytesMut};
use std::time::Duration;
use tokio::time;

use crate::{
    classify::classify,
    error::{Error, UpyResult},
    protocol::{Command, Import, INTERRUPT, LINE_END, PROMPT},
    transport::Transport,
};

/// Time the board gets to come out of reset before it is interrupted
const SETTLE_DELAY: Duration = Duration::from_millis(500);
/// Pause after the first prompt, long enough for a second one to start arriving
const DRAIN_DELAY: Duration = Duration::from_millis(10);
const READ_CAPACITY: usize = 1024;

/// Session configuration
#[derive(Debug, Clone)]
pub struct Options {
    /// Text the interpreter prints when it is ready for the next line
    pub prompt: String,
    /// Longest silence tolerated while waiting for the prompt. The timer
    /// restarts whenever data arrives, so long replies are not cut off.
    /// Default: 10 seconds
    pub timeout: Duration,
    /// Delay between releasing reset and sending the interrupt.
    /// Default: 500 milliseconds
    pub settle: Duration,
    /// Raw bytes sent per write command during upload.
    /// Default: 32, i.e. 64 hex characters per line
    pub chunk_size: usize,
    /// Deepest directory level a recursive remove descends into.
    /// Default: 32
    pub max_depth: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            prompt: String::from_utf8_lossy(PROMPT).into_owned(),
            timeout: Duration::from_secs(10),
            settle: SETTLE_DELAY,
            chunk_size: 32,
            max_depth: 32,
        }
    }
}

impl Options {
    /// Set the idle timeout in seconds.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }
}

/// Lifecycle of a [`RawSession`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Handshaking,
    Ready,
    Executing,
    Closed,
}

/// Implements raw work with the interpreter prompt in line-response format.
///
/// Exactly one line is outstanding at any time. A line is written with CRLF,
/// then everything up to the next prompt is read back; the echo of the line
/// and the prompt itself are cut away and the remaining text is what the
/// line printed. Bytes received past the prompt stay buffered for the next
/// reply. Any transport failure or timeout is unrecoverable: the
/// transport is released and the session stays [`State::Closed`].
pub struct RawSession<T: Transport> {
    transport: T,
    buffer: BytesMut,
    state: State,
    options: Options,
}

impl<T: Transport> RawSession<T> {
    /// Resets the board, waits for its prompt and binds the filesystem
    /// primitives. On failure the transport is closed before returning.
    pub async fn open(transport: T, options: Options) -> UpyResult<Self> {
        let mut session = Self {
            transport,
            buffer: BytesMut::with_capacity(READ_CAPACITY),
            state: State::Handshaking,
            options,
        };

        if let Err(err) = session.handshake().await {
            warn!("handshake failed: {err}");
            let _ = session.close().await;
            return Err(err);
        }

        Ok(session)
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    async fn handshake(&mut self) -> UpyResult<()> {
        info!("resetting board into run mode");
        self.buffer.clear();
        self.transport.clear_input()?;
        self.transport.set_rts(true)?;
        self.transport.set_dtr(false)?;
        self.transport.set_rts(false)?;

        info!("sending ^C after {}ms", self.options.settle.as_millis());
        time::sleep(self.options.settle).await;
        self.transport.write(&[INTERRUPT]).await?;
        self.transport.flush().await?;

        let banner = self.read_prompt().await?;
        debug!("{}", String::from_utf8_lossy(&banner));

        // a boot banner ends in a prompt of its own, the interrupt then
        // produces a second one
        time::sleep(DRAIN_DELAY).await;
        if self.buffer.len() + self.transport.bytes_pending()? > 0 {
            let rest = self.read_prompt().await?;
            debug!("{}", String::from_utf8_lossy(&rest));
        }

        self.state = State::Ready;

        let preamble = Command::from(Import::preamble()).to_string();
        let output = self.execute(&preamble).await?;
        classify(&output, "os")?;

        Ok(())
    }

    /// Reads until the prompt and returns everything up to and including it.
    /// Each wait for more data gets the full idle timeout.
    async fn read_prompt(&mut self) -> UpyResult<Bytes> {
        let prompt = self.options.prompt.as_bytes();
        let mut searched = 0;

        loop {
            if let Some(pos) = find(&self.buffer[searched..], prompt) {
                let end = searched + pos + prompt.len();
                return Ok(self.buffer.split_to(end).freeze());
            }
            searched = self.buffer.len().saturating_sub(prompt.len());

            let read =
                time::timeout(self.options.timeout, self.transport.read(&mut self.buffer)).await??;
            if read == 0 {
                return Err(Error::IO("device closed while waiting for prompt".to_owned()));
            }
        }
    }

    /// Runs one line at the prompt and returns what it printed.
    ///
    /// Undecodable bytes in the reply are replaced, never rejected. The text
    /// is returned unclassified, remote exceptions included.
    pub async fn execute(&mut self, line: &str) -> UpyResult<String> {
        if self.state != State::Ready {
            return Err(Error::UnexpectedBehavior(format!(
                "session not ready ({:?})",
                self.state
            )));
        }

        if line.contains(['\r', '\n']) {
            return Err(Error::UnexpectedBehavior(format!(
                "command spans multiple lines: {line:?}"
            )));
        }

        self.state = State::Executing;
        match self.exchange(line).await {
            Ok(output) => {
                self.state = State::Ready;
                Ok(output)
            }
            Err(err) => {
                warn!("closing session after failed command: {err}");
                let _ = self.close().await;
                Err(err)
            }
        }
    }

    async fn exchange(&mut self, line: &str) -> UpyResult<String> {
        let mut data = Vec::with_capacity(line.len() + LINE_END.len());
        data.extend_from_slice(line.as_bytes());
        data.extend_from_slice(LINE_END.as_bytes());

        self.transport.write(&data).await?;
        self.transport.flush().await?;

        let raw = self.read_prompt().await?;
        let text = String::from_utf8_lossy(&raw);
        debug!("{text}");

        Ok(extract(&text, line, &self.options.prompt).to_owned())
    }

    /// Releases the transport. Closing twice is a no-op.
    pub async fn close(&mut self) -> UpyResult<()> {
        if self.state == State::Closed {
            return Ok(());
        }

        self.state = State::Closed;
        Ok(self.transport.close().await?)
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Cuts the echoed line and the trailing prompt from a raw reply.
///
/// Anything the board printed before the echo, such as a stray byte left
/// from the previous exchange, is dropped with the echo.
fn extract<'a>(raw: &'a str, line: &str, prompt: &str) -> &'a str {
    let body = raw.strip_suffix(prompt).unwrap_or(raw);
    let body = match body.find(line) {
        Some(pos) => &body[pos + line.len()..],
        None => body,
    };
    let body = body.strip_prefix(LINE_END).unwrap_or(body);
    body.strip_suffix(LINE_END).unwrap_or(body)
}
