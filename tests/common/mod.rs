//! In-memory stand-in for a MicroPython board behind a serial port.
//!
//! It echoes every line like the real REPL, evaluates the handful of
//! statements the client sends against a map of paths and answers with the
//! same value reprs and tracebacks the firmware prints. Directory listings
//! come back in creation order, which is rarely sorted.

#![allow(dead_code)]

use std::{
    collections::{BTreeMap, VecDeque},
    io,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use async_trait::async_trait;
use bytes::BytesMut;
use upyfs::{client::Options, transport::Transport};

const PROMPT: &str = ">>> ";
const BANNER: &str = "MicroPython v1.22.0 on 2024-01-01; ESP32 module with ESP32\r\nType \"help()\" for more information.\r\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Dir,
    File(Vec<u8>),
}

#[derive(Debug, Default)]
pub struct Board {
    pub nodes: BTreeMap<String, Node>,
    /// Paths in the order they were created
    created: Vec<String>,
    /// Every line the board executed, in order
    pub commands: Vec<String>,
    /// Control line changes, e.g. `rts=1`
    pub lines: Vec<String>,
    pub interrupts: usize,
    pub closed: bool,
    /// Print a boot banner with its own prompt before the interrupt prompt
    pub banner: bool,
    /// Never print a prompt at all
    pub mute: bool,
    /// Lines answered with an I/O error instead of being executed
    pub fail_on: Vec<String>,
    /// Lines after which the board never prompts again
    pub hang_on: Vec<String>,
    /// Deliver output in pieces of at most this many bytes, each after
    /// the given pause
    pub pace: Option<(usize, Duration)>,
    names: Vec<String>,
    handle: Option<String>,
    input: Vec<u8>,
    output: VecDeque<u8>,
}

fn traceback(exception: &str) -> String {
    format!(
        "Traceback (most recent call last):\r\n  File \"<stdin>\", line 1, in <module>\r\n{exception}"
    )
}

fn unquote(text: &str) -> Option<String> {
    let body = text.strip_prefix('"')?.strip_suffix('"')?;
    let mut value = String::new();
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => value.push(chars.next()?),
            c => value.push(c),
        }
    }
    Some(value)
}

fn parent(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) | None => "/",
        Some(pos) => &path[..pos],
    }
}

impl Board {
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert("/".to_owned(), Node::Dir);
        Self {
            nodes,
            ..Default::default()
        }
    }

    pub fn with_banner(mut self) -> Self {
        self.banner = true;
        self
    }

    pub fn dir(mut self, path: &str) -> Self {
        self.put(path.to_owned(), Node::Dir);
        self
    }

    pub fn file(mut self, path: &str, data: &[u8]) -> Self {
        self.put(path.to_owned(), Node::File(data.to_vec()));
        self
    }

    fn put(&mut self, path: String, node: Node) {
        if !self.nodes.contains_key(&path) {
            self.created.push(path.clone());
        }
        self.nodes.insert(path, node);
    }

    fn delete(&mut self, path: &str) {
        self.nodes.remove(path);
        self.created.retain(|p| p != path);
    }

    /// Commands that changed the filesystem, in order
    pub fn mutations(&self) -> Vec<String> {
        self.commands
            .iter()
            .filter(|c| {
                ["mkdir(", "rmdir(", "remove(", "_upyfs_f = open(", "_upyfs_f.write("]
                    .iter()
                    .any(|p| c.starts_with(p))
            })
            .cloned()
            .collect()
    }

    fn children(&self, path: &str) -> Vec<String> {
        self.created
            .iter()
            .filter(|k| parent(k) == path)
            .map(|k| k.rsplit('/').next().unwrap_or_default().to_owned())
            .collect()
    }

    fn require(&self, name: &str) -> Result<(), String> {
        if self.names.iter().any(|n| n == name) {
            Ok(())
        } else {
            Err(traceback(&format!("NameError: name '{name}' isn't defined")))
        }
    }

    fn eval(&mut self, line: &str) -> Result<String, String> {
        if let Some(names) = line.strip_prefix("from os import ") {
            self.names.extend(names.split(", ").map(str::to_owned));
            return Ok(String::new());
        }
        if let Some(names) = line.strip_prefix("from ubinascii import ") {
            self.names.extend(names.split(", ").map(str::to_owned));
            return Ok(String::new());
        }
        if let Some(arg) = line
            .strip_prefix("hexlify(open(")
            .and_then(|r| r.strip_suffix(", \"rb\").read())"))
        {
            self.require("hexlify")?;
            let path = unquote(arg).ok_or("bad path")?;
            return match self.nodes.get(&path) {
                Some(Node::File(data)) => Ok(format!("b'{}'", hex::encode(data))),
                Some(Node::Dir) => Err(traceback("OSError: [Errno 21] EISDIR")),
                None => Err(traceback("OSError: [Errno 2] ENOENT")),
            };
        }
        if let Some(arg) = line
            .strip_prefix("_upyfs_f = open(")
            .and_then(|r| r.strip_suffix(", \"wb\")"))
        {
            let path = unquote(arg).ok_or("bad path")?;
            if self.nodes.get(parent(&path)) != Some(&Node::Dir) {
                return Err(traceback("OSError: [Errno 2] ENOENT"));
            }
            if self.nodes.get(&path) == Some(&Node::Dir) {
                return Err(traceback("OSError: [Errno 21] EISDIR"));
            }
            self.put(path.clone(), Node::File(vec![]));
            self.handle = Some(path);
            return Ok(String::new());
        }
        if let Some(data) = line
            .strip_prefix("_upyfs_f.write(unhexlify(b'")
            .and_then(|r| r.strip_suffix("'))"))
        {
            self.require("unhexlify")?;
            let bytes = hex::decode(data).map_err(|e| e.to_string())?;
            let path = self.handle.clone().ok_or("no handle")?;
            if let Some(Node::File(content)) = self.nodes.get_mut(&path) {
                content.extend_from_slice(&bytes);
            }
            return Ok(bytes.len().to_string());
        }
        if line == "_upyfs_f.close()" {
            self.handle = None;
            return Ok(String::new());
        }
        if let Some(arg) = line
            .strip_prefix("stat(")
            .and_then(|r| r.strip_suffix(")[0]"))
        {
            self.require("stat")?;
            let path = unquote(arg).ok_or("bad path")?;
            return match self.nodes.get(&path) {
                Some(Node::Dir) => Ok("16384".to_owned()),
                Some(Node::File(_)) => Ok("32768".to_owned()),
                None => Err(traceback("OSError: [Errno 2] ENOENT")),
            };
        }

        let (function, arg) = line
            .split_once('(')
            .and_then(|(f, r)| Some((f, r.strip_suffix(')')?)))
            .ok_or_else(|| traceback("SyntaxError: invalid syntax"))?;
        self.require(function)?;
        let path = unquote(arg).ok_or("bad path")?;

        match (function, self.nodes.get(&path).cloned()) {
            ("listdir", Some(Node::Dir)) => {
                let names: Vec<String> = self
                    .children(&path)
                    .iter()
                    .map(|n| format!("'{n}'"))
                    .collect();
                Ok(format!("[{}]", names.join(", ")))
            }
            ("listdir", Some(Node::File(_))) => Err(traceback("OSError: [Errno 20] ENOTDIR")),
            ("mkdir", Some(_)) => Err(traceback("OSError: [Errno 17] EEXIST")),
            ("mkdir", None) => {
                if self.nodes.get(parent(&path)) != Some(&Node::Dir) {
                    return Err(traceback("OSError: [Errno 2] ENOENT"));
                }
                self.put(path, Node::Dir);
                Ok(String::new())
            }
            ("rmdir", Some(Node::Dir)) => {
                if !self.children(&path).is_empty() {
                    return Err(traceback("OSError: [Errno 13] EACCES"));
                }
                self.delete(&path);
                Ok(String::new())
            }
            ("rmdir", Some(Node::File(_))) => Err(traceback("OSError: [Errno 20] ENOTDIR")),
            ("remove", Some(Node::File(_))) => {
                self.delete(&path);
                Ok(String::new())
            }
            ("remove", Some(Node::Dir)) => Err(traceback("OSError: [Errno 21] EISDIR")),
            (_, None) => Err(traceback("OSError: [Errno 2] ENOENT")),
            _ => Err(traceback("SyntaxError: invalid syntax")),
        }
    }

    fn run_line(&mut self, line: String) {
        self.output.extend(line.as_bytes());
        self.output.extend(b"\r\n");
        self.commands.push(line.clone());

        if self.hang_on.contains(&line) {
            self.mute = true;
            return;
        }

        let reply = if self.fail_on.contains(&line) {
            Err(traceback("OSError: [Errno 5] EIO"))
        } else {
            self.eval(&line)
        };

        let text = match reply {
            Ok(text) | Err(text) => text,
        };
        if !text.is_empty() {
            self.output.extend(text.as_bytes());
            self.output.extend(b"\r\n");
        }
        self.output.extend(PROMPT.as_bytes());
    }

    fn receive(&mut self, data: &[u8]) {
        for &byte in data {
            if byte == 0x03 {
                self.interrupts += 1;
                self.input.clear();
                if self.mute {
                    continue;
                }
                if self.banner {
                    self.output.extend(BANNER.as_bytes());
                    self.output.extend(PROMPT.as_bytes());
                }
                self.output.extend(b"\r\n");
                self.output.extend(PROMPT.as_bytes());
                continue;
            }

            self.input.push(byte);
            if self.input.ends_with(b"\r\n") {
                let len = self.input.len() - 2;
                let line = String::from_utf8_lossy(&self.input[..len]).into_owned();
                self.input.clear();
                if !self.mute {
                    self.run_line(line);
                }
            }
        }
    }

    fn take(&mut self, limit: usize) -> Vec<u8> {
        let end = limit.min(self.output.len());
        self.output.drain(..end).collect()
    }
}

/// Transport half handed to the session; the test keeps the other half to
/// inspect the board afterwards.
#[derive(Clone)]
pub struct SimulatedPort {
    board: Arc<Mutex<Board>>,
}

impl SimulatedPort {
    pub fn new(board: Board) -> Self {
        Self {
            board: Arc::new(Mutex::new(board)),
        }
    }

    pub fn board(&self) -> MutexGuard<'_, Board> {
        self.board.lock().unwrap()
    }
}

#[async_trait]
impl Transport for SimulatedPort {
    fn clear_input(&mut self) -> io::Result<()> {
        self.board().output.clear();
        Ok(())
    }

    fn set_rts(&mut self, level: bool) -> io::Result<()> {
        self.board().lines.push(format!("rts={}", u8::from(level)));
        Ok(())
    }

    fn set_dtr(&mut self, level: bool) -> io::Result<()> {
        self.board().lines.push(format!("dtr={}", u8::from(level)));
        Ok(())
    }

    fn bytes_pending(&mut self) -> io::Result<usize> {
        Ok(self.board().output.len())
    }

    async fn write(&mut self, data: &[u8]) -> io::Result<()> {
        let mut board = self.board();
        if board.closed {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "closed"));
        }
        board.receive(data);
        Ok(())
    }

    async fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    async fn read(&mut self, buf: &mut BytesMut) -> io::Result<usize> {
        let pace = self.board().pace;
        let limit = match pace {
            Some((step, pause)) => {
                tokio::time::sleep(pause).await;
                step
            }
            None => usize::MAX,
        };

        let data = self.board().take(limit);
        if data.is_empty() {
            // a silent board never answers
            return std::future::pending().await;
        }
        buf.extend_from_slice(&data);
        Ok(data.len())
    }

    async fn close(&mut self) -> io::Result<()> {
        self.board().closed = true;
        Ok(())
    }
}

/// Session options tuned for the simulator: no reset delay, short timeout
pub fn options() -> Options {
    Options {
        settle: Duration::ZERO,
        timeout: Duration::from_millis(200),
        ..Options::default()
    }
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
