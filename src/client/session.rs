use std::path::Path;

use super::{Options, RawSession};
use crate::{
    classify::classify,
    error::{Error, UpyResult},
    protocol::{
        Close, Command, FileMode, FileType, Import, MkDir, Open, OpenMode, Read, ReadDir, Remove,
        RmDir, Stat, Write,
    },
    repr,
    transport::Transport,
    utils,
};

/// Pending work of a recursive remove
enum Step {
    Visit(String, usize),
    RmDir(String),
}

/// High-level operations on the remote filesystem.
///
/// Every method re-queries the device: nothing about the remote tree is
/// cached between calls. Multi-command operations stop at the first failing
/// command and leave the remote side as the completed commands left it.
pub struct UpySession<T: Transport> {
    session: RawSession<T>,
}

impl<T: Transport> UpySession<T> {
    /// Opens the session: resets the board and binds the filesystem
    /// primitives.
    pub async fn new(transport: T, options: Options) -> UpyResult<Self> {
        Ok(Self {
            session: RawSession::open(transport, options).await?,
        })
    }

    /// Releases the transport.
    pub async fn close(&mut self) -> UpyResult<()> {
        self.session.close().await
    }

    /// The underlying line-level session
    pub fn raw(&mut self) -> &mut RawSession<T> {
        &mut self.session
    }

    async fn command<C: Into<Command>>(&mut self, command: C, subject: &str) -> UpyResult<String> {
        let line = command.into().to_string();
        let output = self.session.execute(&line).await?;
        classify(&output, subject).map(str::to_owned)
    }

    /// Queries what `path` currently names. A missing path is reported as
    /// [`FileType::NotFound`], not as an error.
    pub async fn stat(&mut self, path: &str) -> UpyResult<FileType> {
        let path = utils::normalize(path)?;
        match self.command(Stat::new(path.as_str()), &path).await {
            Ok(output) => Ok(FileMode::from(repr::parse_int(&output)?).file_type()),
            Err(Error::NotFound(_)) => Ok(FileType::NotFound),
            Err(err) => Err(err),
        }
    }

    /// Names of the immediate children of a directory, in the order the
    /// device returns them.
    pub async fn listdir(&mut self, path: &str) -> UpyResult<Vec<String>> {
        let path = utils::normalize(path)?;
        let output = self.command(ReadDir::new(path.as_str()), &path).await?;
        repr::parse_str_list(&output)
    }

    /// Creates `path` and every missing directory above it.
    ///
    /// Existing directories are left alone, so calling this twice is fine.
    /// Fails with [`Error::AlreadyExists`] when a file occupies any segment.
    pub async fn mkdir(&mut self, path: &str) -> UpyResult<()> {
        let path = utils::normalize(path)?;

        for prefix in utils::prefixes(&path) {
            match self.stat(&prefix).await? {
                FileType::Directory => continue,
                FileType::NotFound => {
                    info!("creating directory {prefix}");
                    let _ = self.command(MkDir::new(prefix.as_str()), &prefix).await?;
                }
                FileType::File => return Err(Error::AlreadyExists(prefix)),
            }
        }

        Ok(())
    }

    /// Removes a file, or a directory with everything below it.
    ///
    /// Children are removed depth-first before their parent. On the first
    /// failure the remaining siblings and all ancestors stay in place.
    pub async fn remove(&mut self, path: &str) -> UpyResult<()> {
        let path = utils::normalize(path)?;
        if path == "/" {
            return Err(Error::InvalidPath(path));
        }

        let max_depth = self.session.options().max_depth;
        let mut stack = vec![Step::Visit(path, 0)];

        while let Some(step) = stack.pop() {
            match step {
                Step::Visit(path, depth) => match self.stat(&path).await? {
                    FileType::NotFound => return Err(Error::NotFound(path)),
                    FileType::File => {
                        info!("removing file {path}");
                        let _ = self.command(Remove::new(path.as_str()), &path).await?;
                    }
                    FileType::Directory => {
                        if depth >= max_depth {
                            return Err(Error::Limited(format!(
                                "{path} is nested deeper than {max_depth} levels"
                            )));
                        }

                        let children = self.listdir(&path).await?;
                        stack.push(Step::RmDir(path.clone()));
                        stack.extend(
                            children
                                .iter()
                                .rev()
                                .map(|child| Step::Visit(utils::join(&path, child), depth + 1)),
                        );
                    }
                },
                Step::RmDir(path) => {
                    info!("removing directory {path}");
                    let _ = self.command(RmDir::new(path.as_str()), &path).await?;
                }
            }
        }

        Ok(())
    }

    /// Writes `data` to the remote file at `path`, creating missing parent
    /// directories and replacing an existing file.
    ///
    /// The payload is sent hex-encoded in chunks of
    /// [`Options::chunk_size`] bytes, one command each. A failure part way
    /// leaves a partially written file.
    pub async fn write(&mut self, path: &str, data: &[u8]) -> UpyResult<()> {
        let path = utils::normalize(path)?;
        if path == "/" || self.stat(&path).await?.is_dir() {
            return Err(Error::AlreadyExists(path));
        }

        if let Some(parent) = utils::parent(&path) {
            self.mkdir(parent).await?;
        }

        let chunk_size = self.session.options().chunk_size.max(1);
        info!(
            "writing {} bytes to {path} in {} chunks",
            data.len(),
            data.len().div_ceil(chunk_size)
        );

        let _ = self.command(Import::unhexlify(), &path).await?;
        let _ = self
            .command(Open::new(path.as_str(), OpenMode::WriteBinary), &path)
            .await?;

        for chunk in data.chunks(chunk_size) {
            let output = self.command(Write::new(hex::encode(chunk)), &path).await?;
            let written = repr::parse_int(&output)?;
            if written as usize != chunk.len() {
                return Err(Error::UnexpectedBehavior(format!(
                    "short write to {path}: {written} of {} bytes",
                    chunk.len()
                )));
            }
        }

        let _ = self.command(Close, &path).await?;
        Ok(())
    }

    /// Reads the whole remote file at `path`.
    ///
    /// The content comes back as a single hex literal, so the file must fit
    /// in the device's memory twice over.
    pub async fn read(&mut self, path: &str) -> UpyResult<Vec<u8>> {
        let path = utils::normalize(path)?;
        match self.stat(&path).await? {
            FileType::NotFound => return Err(Error::NotFound(path)),
            FileType::Directory => return Err(Error::AlreadyExists(path)),
            FileType::File => {}
        }

        let _ = self.command(Import::hexlify(), &path).await?;
        let output = self.command(Read::new(path.as_str()), &path).await?;
        let data = hex::decode(repr::parse_bytes(&output)?)?;
        info!("read {} bytes from {path}", data.len());

        Ok(data)
    }

    /// Copies the local file at `local` to `remote`.
    pub async fn upload<P: AsRef<Path>>(&mut self, local: P, remote: &str) -> UpyResult<()> {
        let local = local.as_ref();
        let data = tokio::fs::read(local)
            .await
            .map_err(|err| Error::IO(format!("{}: {err}", local.display())))?;

        self.write(remote, &data).await
    }

    /// Copies the remote file at `remote` to `local`, replacing it.
    pub async fn download<P: AsRef<Path>>(&mut self, remote: &str, local: P) -> UpyResult<()> {
        let local = local.as_ref();
        let data = self.read(remote).await?;

        tokio::fs::write(local, &data)
            .await
            .map_err(|err| Error::IO(format!("{}: {err}", local.display())))
    }
}
