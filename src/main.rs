//! upyfs - copy, list and delete files on a MicroPython board
//!
//! # Usage
//!
//! ```bash
//! # Upload a script, creating /lib on the board if needed
//! upyfs -u /lib/util.py -f util.py -o
//!
//! # List the root directory over another port
//! upyfs -p /dev/ttyACM0 -l /
//!
//! # Delete a directory tree with debug output
//! upyfs -vv -r /lib
//! ```

use anyhow::{Context, Result};
use clap::{ArgAction, ArgGroup, Parser};
use log::{debug, LevelFilter};
use std::{path::PathBuf, process::ExitCode};

use upyfs::{
    client::{Options, UpySession},
    transport::{SerialTransport, Transport},
    Error, UpyResult,
};

/// Manage files on a MicroPython device over its serial REPL
#[derive(Parser, Debug)]
#[command(name = "upyfs")]
#[command(version)]
#[command(group(
    ArgGroup::new("operation")
        .required(true)
        .args(["upload", "download", "remove", "list", "mkdir"])
))]
struct Cli {
    /// Turn off warnings
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbosity level (-v info, -vv debug)
    #[arg(short, action = ArgAction::Count)]
    verbose: u8,

    /// Path of the serial device
    #[arg(short, long, default_value = "/dev/ttyUSB0")]
    port: String,

    /// Baud rate
    #[arg(short, long, default_value_t = 115_200)]
    baud: u32,

    /// Seconds of silence tolerated while waiting for the prompt
    #[arg(short, long, default_value_t = 10)]
    timeout: u64,

    /// Remote file to upload to, requires --file
    #[arg(short, long, value_name = "REMOTE", requires = "file")]
    upload: Option<String>,

    /// Remote file to download, requires --file
    #[arg(short, long, value_name = "REMOTE", requires = "file")]
    download: Option<String>,

    /// Remote file or directory to remove
    #[arg(short, long, value_name = "REMOTE")]
    remove: Option<String>,

    /// Remote directory to list
    #[arg(short, long, value_name = "REMOTE")]
    list: Option<String>,

    /// Remote directory to create, parents included
    #[arg(short, long, value_name = "REMOTE")]
    mkdir: Option<String>,

    /// Replace existing files on the device (upload) or locally (download)
    #[arg(short = 'o', long = "override")]
    overwrite: bool,

    /// Path to the file on the local filesystem
    #[arg(short, long, value_name = "LOCAL")]
    file: Option<PathBuf>,
}

#[derive(Debug)]
enum Operation {
    Upload { local: PathBuf, remote: String },
    Download { remote: String, local: PathBuf },
    Remove(String),
    List(String),
    Mkdir(String),
}

impl Cli {
    fn operation(&self) -> Result<Operation> {
        let local = || self.file.clone().context("--file is required for transfers");

        let operation = if let Some(remote) = &self.upload {
            Operation::Upload {
                local: local()?,
                remote: remote.clone(),
            }
        } else if let Some(remote) = &self.download {
            Operation::Download {
                remote: remote.clone(),
                local: local()?,
            }
        } else if let Some(path) = &self.remove {
            Operation::Remove(path.clone())
        } else if let Some(path) = &self.list {
            Operation::List(path.clone())
        } else if let Some(path) = &self.mkdir {
            Operation::Mkdir(path.clone())
        } else {
            anyhow::bail!("no operation given");
        };

        Ok(operation)
    }

    fn log_level(&self) -> LevelFilter {
        match (self.quiet, self.verbose) {
            (true, _) => LevelFilter::Error,
            (false, 0) => LevelFilter::Warn,
            (false, 1) => LevelFilter::Info,
            (false, _) => LevelFilter::Debug,
        }
    }
}

async fn execute<T: Transport>(
    session: &mut UpySession<T>,
    operation: Operation,
    overwrite: bool,
) -> UpyResult<()> {
    match operation {
        Operation::Upload { local, remote } => {
            if !overwrite && session.stat(&remote).await?.is_file() {
                return Err(Error::AlreadyExists(remote));
            }
            session.upload(&local, &remote).await
        }
        Operation::Download { remote, local } => {
            if !overwrite && tokio::fs::metadata(&local).await.is_ok() {
                return Err(Error::AlreadyExists(local.display().to_string()));
            }
            session.download(&remote, &local).await
        }
        Operation::Remove(path) => session.remove(&path).await,
        Operation::List(path) => {
            for name in session.listdir(&path).await? {
                println!("{name}");
            }
            Ok(())
        }
        Operation::Mkdir(path) => session.mkdir(&path).await,
    }
}

async fn run(cli: Cli) -> Result<()> {
    let operation = cli.operation()?;

    let transport = SerialTransport::open(cli.port.as_str(), cli.baud)
        .with_context(|| format!("failed to open {}", cli.port))?;
    let options = Options::default().with_timeout(cli.timeout);
    let mut session = UpySession::new(transport, options)
        .await
        .context("failed to bring up the REPL")?;

    debug!("running {operation:?}");
    let result = execute(&mut session, operation, cli.overwrite).await;
    let closed = session.close().await;

    result?;
    closed.context("failed to close the port")?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .format_timestamp(None)
        .format_target(false)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("upyfs: {err:#}");
            ExitCode::FAILURE
        }
    }
}
