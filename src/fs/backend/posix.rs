use std::ffi::CStr;
use std::io;
use std::mem::MaybeUninit;
use std::ptr;

use libc::{c_int, mode_t};
use tracing::{debug, trace};

use crate::fs::path::Flavor;
use crate::fs::stream::{Access, Fd};
use crate::fs::{
    Backend, ErrorKind, File, FileStream, FileType, FsError, Mode, OpenExcl, Result, Stats,
};
use crate::util::fs::{c_path, from_c_path};

/// The backend for POSIX-like hosts, calling straight into libc.
///
/// Permission bits are applied as given, subject to the process umask for newly created entries.
#[derive(Debug, Default, Clone, Copy)]
pub struct PosixFs;

impl PosixFs {
    pub const fn new() -> PosixFs {
        PosixFs
    }

    fn stat_with(file: &File, follow: bool) -> Result<Stats> {
        let pathname = c_path(file)?;
        let mut raw: MaybeUninit<libc::stat> = MaybeUninit::uninit();
        let op = if follow { "stat" } else { "lstat" };
        trace!(op, path = %file);

        // SAFETY: pathname is NUL-terminated and raw is valid for writes of one stat structure.
        let ret = unsafe {
            if follow {
                libc::stat(pathname.as_ptr(), raw.as_mut_ptr())
            } else {
                libc::lstat(pathname.as_ptr(), raw.as_mut_ptr())
            }
        };

        match ret {
            -1 => Err(FsError::from_io(io::Error::last_os_error(), file)),
            // SAFETY: The call succeeded, so it initialized raw.
            _ => Ok(Stats::from_stat(unsafe { raw.assume_init_ref() })),
        }
    }

    fn open_stream(
        &self,
        file: &File,
        flags: c_int,
        excl: OpenExcl,
        access: Access,
    ) -> Result<FileStream> {
        let mode = excl.mode().unwrap_or(Mode::DEFAULT_FILE);
        let fd = Fd::open(file, flags | excl.flags(), mode)?;

        let raw = fd.stat().map_err(|e| FsError::from_io(e, file))?;
        if FileType::from_stat_mode(raw.st_mode).is_directory() {
            return Err(FsError::new(ErrorKind::Io)
                .with_file(file)
                .with_reason("is a directory"));
        }

        let stream = FileStream::new(file.clone(), Box::new(fd), access);
        if !excl.is_must_create() {
            return Ok(stream);
        }

        let parent = file.parent_file().unwrap_or_else(|| File::new("."));
        match Fd::open_dir(&parent) {
            Ok(parent_fd) => Ok(stream.with_parent(Box::new(parent_fd))),
            Err(error) => {
                debug!(op = "open", path = %file, %error, "opened without a parent descriptor");
                Ok(stream)
            },
        }
    }
}

fn unless_missing(error: FsError, must_exist: bool, op: &'static str) -> Result<()> {
    if !must_exist && error.kind().is_file_not_found() {
        debug!(op, path = ?error.file(), "target does not exist");
        Ok(())
    } else {
        Err(error)
    }
}

impl Backend for PosixFs {
    fn flavor(&self) -> Flavor {
        Flavor::Posix
    }

    fn real_path(&self, path: &str) -> Result<String> {
        let file = File::new(path);
        let pathname = c_path(&file)?;
        trace!(op = "realpath", path = %file);

        // SAFETY: pathname is NUL-terminated. A null buffer makes realpath allocate the result.
        let resolved = unsafe { libc::realpath(pathname.as_ptr(), ptr::null_mut()) };
        if resolved.is_null() {
            return Err(FsError::from_io(io::Error::last_os_error(), &file));
        }

        // SAFETY: realpath returned a NUL-terminated string that stays valid until freed below.
        let real = from_c_path(unsafe { CStr::from_ptr(resolved) });
        // SAFETY: resolved was allocated by realpath and is not used again.
        unsafe { libc::free(resolved.cast()) };
        Ok(real)
    }

    fn exists(&self, file: &File) -> Result<bool> {
        let pathname = c_path(file)?;
        trace!(op = "access", path = %file);

        // SAFETY: pathname is NUL-terminated and outlives the call.
        match unsafe { libc::access(pathname.as_ptr(), libc::F_OK) } {
            0 => Ok(true),
            _ => match FsError::from_io(io::Error::last_os_error(), file) {
                error if error.kind().is_file_not_found() || error.kind().is_not_directory() => {
                    Ok(false)
                },
                error => Err(error),
            },
        }
    }

    fn stat(&self, file: &File) -> Result<Stats> {
        PosixFs::stat_with(file, true)
    }

    fn lstat(&self, file: &File) -> Result<Stats> {
        PosixFs::stat_with(file, false)
    }

    fn chmod(&self, file: &File, mode: Mode, must_exist: bool) -> Result<()> {
        let pathname = c_path(file)?;
        trace!(op = "chmod", path = %file, %mode);

        // SAFETY: pathname is NUL-terminated and outlives the call.
        match unsafe { libc::chmod(pathname.as_ptr(), mode_t::from(mode.bits())) } {
            -1 => unless_missing(
                FsError::from_io(io::Error::last_os_error(), file),
                must_exist,
                "chmod",
            ),
            _ => Ok(()),
        }
    }

    /// The permission bits of `file` itself never prevent its removal here, so
    /// `ignore_read_only` has no effect.
    fn delete(&self, file: &File, _ignore_read_only: bool, must_exist: bool) -> Result<()> {
        let pathname = c_path(file)?;
        trace!(op = "unlink", path = %file);

        // SAFETY: pathname is NUL-terminated and outlives the call.
        if unsafe { libc::unlink(pathname.as_ptr()) } == 0 {
            return Ok(());
        }

        let error = io::Error::last_os_error();
        let is_dir = match error.raw_os_error() {
            Some(libc::EISDIR) => true,
            // Some systems refuse to unlink a directory with EPERM instead.
            Some(libc::EPERM) => self.lstat(file).is_ok_and(|stats| stats.is_directory()),
            _ => false,
        };
        if !is_dir {
            return unless_missing(FsError::from_io(error, file), must_exist, "delete");
        }

        trace!(op = "rmdir", path = %file);
        // SAFETY: pathname is NUL-terminated and outlives the call.
        match unsafe { libc::rmdir(pathname.as_ptr()) } {
            0 => Ok(()),
            _ => {
                let error = io::Error::last_os_error();
                match error.raw_os_error() {
                    Some(libc::EEXIST) => {
                        Err(FsError::new(ErrorKind::DirectoryNotEmpty).with_file(file))
                    },
                    _ => unless_missing(FsError::from_io(error, file), must_exist, "delete"),
                }
            },
        }
    }

    fn mkdir(&self, dir: &File, mode: Mode, must_create: bool) -> Result<()> {
        let pathname = c_path(dir)?;
        trace!(op = "mkdir", path = %dir, %mode);

        // SAFETY: pathname is NUL-terminated and outlives the call.
        match unsafe { libc::mkdir(pathname.as_ptr(), mode_t::from(mode.bits())) } {
            -1 => match FsError::from_io(io::Error::last_os_error(), dir) {
                error if !must_create && error.kind().is_file_already_exists() => {
                    debug!(op = "mkdir", path = %dir, "directory already exists");
                    Ok(())
                },
                error => Err(error),
            },
            _ => Ok(()),
        }
    }

    fn open_read(&self, file: &File) -> Result<FileStream> {
        self.open_stream(file, libc::O_RDONLY, OpenExcl::MustExist, Access::Read)
    }

    fn open_write(&self, file: &File, excl: OpenExcl, appending: bool) -> Result<FileStream> {
        let flags = libc::O_WRONLY | if appending { libc::O_APPEND } else { libc::O_TRUNC };
        self.open_stream(file, flags, excl, Access::Write { append: appending })
    }

    fn open_read_write(&self, file: &File, excl: OpenExcl) -> Result<FileStream> {
        self.open_stream(file, libc::O_RDWR, excl, Access::ReadWrite)
    }
}
