use std::fmt::Debug;

use tracing::{debug, warn};

use crate::fs::path::{self, Flavor};
use crate::fs::{ErrorKind, File, FileStream, FsError, Mode, OpenExcl, Result, Stats};
use crate::util::result::ResultExtension;

mod portable;
#[cfg(unix)]
mod posix;
mod std_ops;
#[cfg(windows)]
mod windows;

pub use portable::*;
#[cfg(unix)]
pub use posix::*;
#[cfg(windows)]
pub use windows::*;

/// The filesystem contract implemented once per family of host operating system.
///
/// Implementations are stateless, so a single instance can be shared by the whole process (see
/// [`sys_fs`]). Every native failure is translated into an [`FsError`] before it is returned.
///
/// The path algorithms ([`absolute_path`](Backend::absolute_path),
/// [`canonical_path`](Backend::canonical_path)) and [`mkdirs`](Backend::mkdirs) are provided in
/// terms of the required methods.
pub trait Backend: Send + Sync + Debug {
    /// The naming convention of the paths this backend accepts.
    fn flavor(&self) -> Flavor;

    /// The canonical absolute path of an existing entry, with every symlink resolved.
    fn real_path(&self, path: &str) -> Result<String>;

    /// Whether `file` exists. A missing entry or a non-directory ancestor yields `false`; every
    /// other failure is returned.
    fn exists(&self, file: &File) -> Result<bool>;

    /// Stats `file`, following a trailing symlink.
    fn stat(&self, file: &File) -> Result<Stats>;

    /// Stats `file` without following a trailing symlink, where the backend can tell them apart.
    fn lstat(&self, file: &File) -> Result<Stats>;

    /// Applies `mode` to `file`. A missing `file` is only an error if `must_exist` is set.
    fn chmod(&self, file: &File, mode: Mode, must_exist: bool) -> Result<()>;

    /// Removes a file or an empty directory. A missing `file` is only an error if `must_exist` is
    /// set. With `ignore_read_only`, backends that model a read-only attribute clear it and retry.
    fn delete(&self, file: &File, ignore_read_only: bool, must_exist: bool) -> Result<()>;

    /// Creates a single directory. An existing `dir` is only an error if `must_create` is set.
    fn mkdir(&self, dir: &File, mode: Mode, must_create: bool) -> Result<()>;

    fn open_read(&self, file: &File) -> Result<FileStream>;

    /// Opens `file` for writing. Without `appending`, an existing file is truncated.
    fn open_write(&self, file: &File, excl: OpenExcl, appending: bool) -> Result<FileStream>;

    fn open_read_write(&self, file: &File, excl: OpenExcl) -> Result<FileStream>;

    fn is_absolute(&self, file: &File) -> bool {
        path::is_absolute(file.path(), self.flavor())
    }

    /// Resolves `file` against the current directory. See [`path::absolute_with`].
    fn absolute_path(&self, file: &File) -> Result<File> {
        path::absolute_with(file.path(), self.flavor(), |p| self.real_path(p)).map(File::new)
    }

    /// Canonicalizes `file` as far as the filesystem allows. See [`path::canonical_with`].
    fn canonical_path(&self, file: &File) -> Result<File> {
        path::canonical_with(file.path(), self.flavor(), |p| self.real_path(p)).map(File::new)
    }

    /// Creates `dir` along with every missing ancestor.
    ///
    /// If nothing is missing this succeeds, unless `must_create` is set. If creating any directory
    /// fails, every directory created by this call is removed again, innermost first, and the
    /// original error is returned with any removal failures attached as suppressed.
    ///
    /// A directory that appears concurrently while this runs is treated as not created by this
    /// call, so it is neither an error nor rolled back. Anything else found in its place, such as
    /// a regular file or a dangling symlink, fails the call. Nothing stops another process from
    /// populating a directory before it is rolled back, in which case its removal fails and is
    /// reported as suppressed.
    fn mkdirs(&self, dir: &File, mode: Mode, must_create: bool) -> Result<()> {
        let mut missing = Vec::new();
        let mut current = Some(dir.clone());
        while let Some(candidate) = current {
            if self.exists(&candidate)? {
                break;
            }
            current = candidate.parent_file();
            missing.push(candidate);
        }

        if missing.is_empty() {
            if must_create {
                return Err(FsError::new(ErrorKind::FileAlreadyExists).with_file(dir));
            }
            debug!(op = "mkdirs", path = %dir, "directory already exists");
            return Ok(());
        }

        let mut created: Vec<&File> = Vec::with_capacity(missing.len());
        for next in missing.iter().rev() {
            match self.mkdir(next, mode, true) {
                Ok(()) => created.push(next),
                Err(error)
                    if error.kind().is_file_already_exists()
                        && (next != dir || !must_create)
                        && self.stat(next).is_ok_and(|stats| stats.is_directory()) =>
                {
                    debug!(op = "mkdirs", path = %next, "directory created concurrently");
                },
                Err(mut error) => {
                    for undo in created.iter().rev() {
                        if let Err(cleanup) = self.delete(undo, true, false) {
                            warn!(op = "mkdirs", path = %undo, error = %cleanup, "rollback failed");
                            error.add_suppressed(cleanup);
                        }
                    }
                    return Err(error);
                },
            }
        }
        Ok(())
    }

    fn read_bytes(&self, file: &File) -> Result<Vec<u8>> {
        let stream = self.open_read(file)?;
        read_to_end(&stream).and_cleanup(stream.close())
    }

    /// Reads `file` as UTF-8. Invalid UTF-8 fails with [`ErrorKind::Io`].
    fn read_utf8(&self, file: &File) -> Result<String> {
        let bytes = self.read_bytes(file)?;
        String::from_utf8(bytes).map_err(|_| {
            FsError::new(ErrorKind::Io)
                .with_file(file)
                .with_reason("stream did not contain valid UTF-8")
        })
    }

    /// Replaces the contents of `file` with `data`.
    fn write_bytes(&self, file: &File, excl: OpenExcl, data: &[u8]) -> Result<()> {
        let stream = self.open_write(file, excl, false)?;
        stream.write(data).and_cleanup(stream.close())
    }

    fn write_utf8(&self, file: &File, excl: OpenExcl, text: &str) -> Result<()> {
        self.write_bytes(file, excl, text.as_bytes())
    }

    fn append_bytes(&self, file: &File, excl: OpenExcl, data: &[u8]) -> Result<()> {
        let stream = self.open_write(file, excl, true)?;
        stream.write(data).and_cleanup(stream.close())
    }

    fn append_utf8(&self, file: &File, excl: OpenExcl, text: &str) -> Result<()> {
        self.append_bytes(file, excl, text.as_bytes())
    }
}

fn read_to_end(stream: &FileStream) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    let mut chunk = [0; 8192];
    while let Some(count) = stream.read(&mut chunk)? {
        data.extend_from_slice(&chunk[..count]);
    }
    Ok(data)
}

/// The backend selected for the compilation target.
#[cfg(unix)]
pub type SysFs = PosixFs;
/// The backend selected for the compilation target.
#[cfg(windows)]
pub type SysFs = WindowsFs;
/// The backend selected for the compilation target.
#[cfg(not(any(unix, windows)))]
pub type SysFs = PortableFs;

static SYS_FS: SysFs = SysFs::new();

/// The process-wide instance of [`SysFs`].
pub fn sys_fs() -> &'static SysFs {
    &SYS_FS
}

/// The host's directory for temporary files.
pub fn sys_temp_dir() -> File {
    File::new(std::env::temp_dir().to_string_lossy())
}

pub fn exists(file: &File) -> Result<bool> {
    sys_fs().exists(file)
}

pub fn stat(file: &File) -> Result<Stats> {
    sys_fs().stat(file)
}

pub fn lstat(file: &File) -> Result<Stats> {
    sys_fs().lstat(file)
}

pub fn chmod(file: &File, mode: Mode, must_exist: bool) -> Result<()> {
    sys_fs().chmod(file, mode, must_exist)
}

pub fn delete(file: &File, ignore_read_only: bool, must_exist: bool) -> Result<()> {
    sys_fs().delete(file, ignore_read_only, must_exist)
}

pub fn mkdir(dir: &File, mode: Mode, must_create: bool) -> Result<()> {
    sys_fs().mkdir(dir, mode, must_create)
}

pub fn mkdirs(dir: &File, mode: Mode, must_create: bool) -> Result<()> {
    sys_fs().mkdirs(dir, mode, must_create)
}

pub fn absolute_path(file: &File) -> Result<File> {
    sys_fs().absolute_path(file)
}

pub fn canonical_path(file: &File) -> Result<File> {
    sys_fs().canonical_path(file)
}

pub fn open_read(file: &File) -> Result<FileStream> {
    sys_fs().open_read(file)
}

pub fn open_write(file: &File, excl: OpenExcl, appending: bool) -> Result<FileStream> {
    sys_fs().open_write(file, excl, appending)
}

pub fn open_read_write(file: &File, excl: OpenExcl) -> Result<FileStream> {
    sys_fs().open_read_write(file, excl)
}

pub fn read_bytes(file: &File) -> Result<Vec<u8>> {
    sys_fs().read_bytes(file)
}

pub fn read_utf8(file: &File) -> Result<String> {
    sys_fs().read_utf8(file)
}

pub fn write_bytes(file: &File, excl: OpenExcl, data: &[u8]) -> Result<()> {
    sys_fs().write_bytes(file, excl, data)
}

pub fn write_utf8(file: &File, excl: OpenExcl, text: &str) -> Result<()> {
    sys_fs().write_utf8(file, excl, text)
}

pub fn append_bytes(file: &File, excl: OpenExcl, data: &[u8]) -> Result<()> {
    sys_fs().append_bytes(file, excl, data)
}

pub fn append_utf8(file: &File, excl: OpenExcl, text: &str) -> Result<()> {
    sys_fs().append_utf8(file, excl, text)
}
