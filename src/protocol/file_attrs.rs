/// The `st_mode` word returned by the remote `stat`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileMode(u32);

bitflags! {
    impl FileMode: u32 {
        const FIFO = 0x1000;
        const CHR = 0x2000;
        const DIR = 0x4000;
        const BLK = 0x6000;
        const REG = 0x8000;
        const LNK = 0xA000;
        const SOCK = 0xC000;
        const FORMAT = 0xF000;
    }
}

impl FileMode {
    /// The node type encoded in the mode, permission bits masked off.
    ///
    /// Anything that is not a directory is handled like a regular file:
    /// it is removed with `remove` and can be opened for reading.
    pub fn file_type(self) -> FileType {
        if self.bits() & Self::FORMAT.bits() == Self::DIR.bits() {
            FileType::Directory
        } else {
            FileType::File
        }
    }
}

impl From<u32> for FileMode {
    fn from(bits: u32) -> Self {
        Self::from_bits_retain(bits)
    }
}

/// What a remote path currently names. Never cached, every query goes to the
/// device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    File,
    Directory,
    NotFound,
}

impl FileType {
    pub fn is_dir(self) -> bool {
        self == Self::Directory
    }

    pub fn is_file(self) -> bool {
        self == Self::File
    }
}
