use std::io;
use std::mem::{ManuallyDrop, MaybeUninit};

use libc::{c_int, off_t, stat as Stat};
use tracing::{trace, warn};

use crate::fs::stream::Native;
use crate::fs::{File, FsError, Mode, Result};
use crate::util::fs::{self as fs_util, cvt, cvt_size_r};

/// An owned POSIX file descriptor, closed on drop.
#[derive(Debug)]
pub(crate) struct Fd(c_int);

impl Fd {
    pub fn open(file: &File, flags: c_int, mode: Mode) -> Result<Fd> {
        let pathname = fs_util::c_path(file)?;
        trace!(op = "open", path = %file, flags);

        // SAFETY: pathname is NUL-terminated and outlives the call.
        match unsafe {
            libc::open(pathname.as_ptr(), flags | libc::O_CLOEXEC, c_int::from(mode.bits()))
        } {
            -1 => Err(FsError::from_io(io::Error::last_os_error(), file)),
            fd => Ok(Fd(fd)),
        }
    }

    /// Opens a directory for use as a stream's parent resource.
    pub fn open_dir(dir: &File) -> Result<Fd> {
        Fd::open(dir, libc::O_RDONLY | libc::O_DIRECTORY, Mode::from_bits_truncate(0))
    }

    pub fn stat(&self) -> io::Result<Stat> {
        let mut raw: MaybeUninit<Stat> = MaybeUninit::uninit();
        // SAFETY: raw is valid for writes of one stat structure.
        cvt(unsafe { libc::fstat(self.0, raw.as_mut_ptr()) })?;
        // SAFETY: fstat succeeded, so it initialized raw.
        Ok(unsafe { raw.assume_init() })
    }
}

fn to_off(pos: u64) -> io::Result<off_t> {
    off_t::try_from(pos).map_err(|_| {
        io::Error::new(io::ErrorKind::InvalidInput, "position does not fit the native offset type")
    })
}

impl Native for Fd {
    fn read(&self, buf: &mut [u8]) -> io::Result<usize> {
        cvt_size_r(|| {
            // SAFETY: buf is valid for writes of buf.len() bytes.
            unsafe { libc::read(self.0, buf.as_mut_ptr().cast(), buf.len()) }
        })
    }

    fn read_at(&self, buf: &mut [u8], pos: u64) -> io::Result<usize> {
        let offset = to_off(pos)?;
        cvt_size_r(|| {
            // SAFETY: buf is valid for writes of buf.len() bytes.
            unsafe { libc::pread(self.0, buf.as_mut_ptr().cast(), buf.len(), offset) }
        })
    }

    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        cvt_size_r(|| {
            // SAFETY: buf is valid for reads of buf.len() bytes.
            unsafe { libc::write(self.0, buf.as_ptr().cast(), buf.len()) }
        })
    }

    fn write_at(&self, buf: &[u8], pos: u64) -> io::Result<usize> {
        let offset = to_off(pos)?;
        cvt_size_r(|| {
            // SAFETY: buf is valid for reads of buf.len() bytes.
            unsafe { libc::pwrite(self.0, buf.as_ptr().cast(), buf.len(), offset) }
        })
    }

    fn position(&self) -> io::Result<u64> {
        // SAFETY: lseek has no memory-safety preconditions.
        match unsafe { libc::lseek(self.0, 0, libc::SEEK_CUR) } {
            -1 => Err(io::Error::last_os_error()),
            pos => Ok(pos as u64),
        }
    }

    fn seek(&self, pos: u64) -> io::Result<()> {
        let offset = to_off(pos)?;
        // SAFETY: lseek has no memory-safety preconditions.
        match unsafe { libc::lseek(self.0, offset, libc::SEEK_SET) } {
            -1 => Err(io::Error::last_os_error()),
            _ => Ok(()),
        }
    }

    #[allow(clippy::unnecessary_cast)]
    fn size(&self) -> io::Result<u64> {
        Ok(self.stat()?.st_size as u64)
    }

    fn truncate(&self, size: u64) -> io::Result<()> {
        let length = to_off(size)?;
        // SAFETY: ftruncate has no memory-safety preconditions.
        cvt(unsafe { libc::ftruncate(self.0, length) }).map(drop)
    }

    fn sync(&self, meta: bool) -> io::Result<()> {
        #[cfg(any(target_os = "linux", target_os = "android"))]
        let sync_data = libc::fdatasync;
        #[cfg(not(any(target_os = "linux", target_os = "android")))]
        let sync_data = libc::fsync;

        let call: unsafe extern "C" fn(c_int) -> c_int = if meta { libc::fsync } else { sync_data };
        // SAFETY: fsync and fdatasync have no memory-safety preconditions.
        cvt(unsafe { call(self.0) }).map(drop)
    }

    fn close(self: Box<Self>) -> io::Result<()> {
        // The descriptor is invalid after close regardless of the outcome, so Drop must not run.
        let fd = ManuallyDrop::new(*self);
        // SAFETY: fd is owned and is not used again.
        cvt(unsafe { libc::close(fd.0) }).map(drop)
    }
}

impl Drop for Fd {
    fn drop(&mut self) {
        // SAFETY: After this, the file descriptor is invalidated but we are dropping self so it
        // doesn't matter.
        if unsafe { libc::close(self.0) } == -1 {
            warn!(
                fd = self.0,
                error = %io::Error::last_os_error(),
                "failed to close file descriptor"
            );
        }
    }
}
