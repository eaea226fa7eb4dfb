use std::fs::Metadata;

use crate::fs::{FileType, Mode};

/// A metadata snapshot, valid only at the instant it was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub file_type: FileType,
    /// Permission bits. Backends with a read-only-attribute model synthesize these from the
    /// attribute, so only the owner-write bit is meaningful there.
    pub mode: Mode,
    pub size: u64,
    pub read_only: bool,
}

impl Stats {
    #[cfg(unix)]
    #[allow(clippy::unnecessary_cast)]
    pub(crate) const fn from_stat(raw: &libc::stat) -> Stats {
        let mode = Mode::from_bits_truncate(raw.st_mode as u32);
        Stats {
            file_type: FileType::from_stat_mode(raw.st_mode),
            mode,
            size: raw.st_size as u64,
            read_only: !mode.owner_write(),
        }
    }

    pub(crate) fn from_metadata(meta: &Metadata) -> Stats {
        let file_type = FileType::from_std(meta.file_type());

        #[cfg(unix)]
        let (mode, read_only) = {
            use std::os::unix::fs::PermissionsExt;
            let mode = Mode::from_bits_truncate(meta.permissions().mode());
            (mode, !mode.owner_write())
        };
        #[cfg(not(unix))]
        let read_only = meta.permissions().readonly();
        #[cfg(not(unix))]
        let mode = match (read_only, file_type.is_directory()) {
            (true, true) => Mode::from_bits_truncate(0o555),
            (true, false) => Mode::from_bits_truncate(0o444),
            (false, true) => Mode::DEFAULT_DIR,
            (false, false) => Mode::DEFAULT_FILE,
        };

        Stats {
            file_type,
            mode,
            size: meta.len(),
            read_only,
        }
    }

    pub const fn is_directory(&self) -> bool {
        self.file_type.is_directory()
    }

    pub const fn is_regular(&self) -> bool {
        self.file_type.is_regular()
    }

    pub const fn is_symlink(&self) -> bool {
        self.file_type.is_symlink()
    }
}
