use std::fmt::Debug;
use std::io;

use parking_lot::RwLock;
use tracing::{trace, warn};

#[cfg(feature = "async")]
use crate::fs::bridge::StreamLock;
use crate::fs::{ErrorKind, File, FsError, Result};
use crate::util::result::ResultExtension;

mod excl;
#[cfg(unix)]
mod fd;
mod std_file;
mod std_io;
mod tests;

pub use excl::*;
#[cfg(unix)]
pub(crate) use fd::*;
pub(crate) use std_file::*;

/// The native descriptor behind a [`FileStream`].
pub(crate) trait Native: Send + Sync + Debug {
    fn read(&self, buf: &mut [u8]) -> io::Result<usize>;

    /// Reads at `pos` without moving the cursor.
    fn read_at(&self, buf: &mut [u8], pos: u64) -> io::Result<usize>;

    fn write(&self, buf: &[u8]) -> io::Result<usize>;

    /// Writes at `pos` without moving the cursor.
    fn write_at(&self, buf: &[u8], pos: u64) -> io::Result<usize>;

    fn position(&self) -> io::Result<u64>;

    fn seek(&self, pos: u64) -> io::Result<()>;

    fn size(&self) -> io::Result<u64>;

    fn truncate(&self, size: u64) -> io::Result<()>;

    fn sync(&self, meta: bool) -> io::Result<()>;

    fn close(self: Box<Self>) -> io::Result<()>;
}

/// The direction(s) a stream was opened for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Access {
    Read,
    Write { append: bool },
    ReadWrite,
}

#[derive(Debug)]
struct Open {
    native: Box<dyn Native>,
    /// A resource on the parent directory, released after `native`.
    parent: Option<Box<dyn Native>>,
}

impl Open {
    fn close(self, file: &File) -> Result<()> {
        trace!(op = "close", path = %file);
        let Open { native, parent } = self;

        let closed = native.close().map_err(|e| FsError::from_io(e, file));
        match parent {
            Some(parent) => {
                let parent_file = file.parent_file().unwrap_or_else(|| file.clone());
                closed.and_cleanup(parent.close().map_err(|e| FsError::from_io(e, &parent_file)))
            },
            None => closed,
        }
    }
}

/// An open handle on a file, owning exactly one native descriptor.
///
/// A stream starts open and becomes closed either through [`close`](FileStream::close) or when it
/// is dropped. Closing is idempotent; every other operation on a closed stream fails with
/// [`StreamClosed`](ErrorKind::StreamClosed). Operations that need a direction the stream was not
/// opened for fail with [`IllegalArgument`](ErrorKind::IllegalArgument).
///
/// The cursor-relative operations share one cursor, so a stream used from several threads at once
/// must be serialized by the caller, or used through [`AsyncFs`](crate::fs::AsyncFs) which does so.
#[derive(Debug)]
pub struct FileStream {
    file: File,
    access: Access,
    state: RwLock<Option<Open>>,
    #[cfg(feature = "async")]
    pub(crate) lock: StreamLock,
}

impl FileStream {
    pub(crate) fn new(file: File, native: Box<dyn Native>, access: Access) -> FileStream {
        FileStream {
            file,
            access,
            state: RwLock::new(Some(Open {
                native,
                parent: None,
            })),
            #[cfg(feature = "async")]
            lock: StreamLock::default(),
        }
    }

    pub(crate) fn with_parent(mut self, parent: Box<dyn Native>) -> FileStream {
        if let Some(open) = self.state.get_mut() {
            open.parent = Some(parent);
        }
        self
    }

    pub fn file(&self) -> &File {
        &self.file
    }

    pub fn can_read(&self) -> bool {
        matches!(self.access, Access::Read | Access::ReadWrite)
    }

    pub fn can_write(&self) -> bool {
        matches!(self.access, Access::Write { .. } | Access::ReadWrite)
    }

    /// Whether every write lands at the end of the file, regardless of the cursor.
    pub fn is_appending(&self) -> bool {
        matches!(self.access, Access::Write { append: true })
    }

    pub fn is_open(&self) -> bool {
        self.state.read().is_some()
    }

    fn with_open<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&Open) -> Result<T>,
    {
        match self.state.read().as_ref() {
            Some(open) => op(open),
            None => Err(FsError::closed(&self.file)),
        }
    }

    fn io_error(&self, error: io::Error) -> FsError {
        FsError::from_io(error, &self.file)
    }

    fn ensure_readable(&self) -> Result<()> {
        if self.can_read() {
            Ok(())
        } else {
            Err(FsError::illegal_argument(&self.file, "stream is not open for reading"))
        }
    }

    fn ensure_writable(&self) -> Result<()> {
        if self.can_write() {
            Ok(())
        } else {
            Err(FsError::illegal_argument(&self.file, "stream is not open for writing"))
        }
    }

    pub fn position(&self) -> Result<u64> {
        self.with_open(|open| open.native.position().map_err(|e| self.io_error(e)))
    }

    /// Moves the cursor. On an appending stream this is accepted and has no effect.
    pub fn set_position(&self, pos: u64) -> Result<()> {
        self.with_open(|open| {
            if self.is_appending() {
                return Ok(());
            }
            open.native.seek(pos).map_err(|e| self.io_error(e))
        })
    }

    pub fn size(&self) -> Result<u64> {
        self.with_open(|open| open.native.size().map_err(|e| self.io_error(e)))
    }

    /// Truncates the file to `size` bytes, or extends it with zeroes.
    ///
    /// If the cursor ends up past the new end of the file it is moved back to it.
    pub fn set_size(&self, size: u64) -> Result<()> {
        self.with_open(|open| {
            self.ensure_writable()?;
            let native = open.native.as_ref();
            let current = native.size().map_err(|e| self.io_error(e))?;

            if size < current || (size > current && self.is_appending()) {
                native.truncate(size).map_err(|e| self.io_error(e))?;
            } else if size > current {
                self.write_all_at(native, &[0], size - 1)?;
            }

            if !self.is_appending() && native.position().map_err(|e| self.io_error(e))? > size {
                native.seek(size).map_err(|e| self.io_error(e))?;
            }
            Ok(())
        })
    }

    /// Reads from the cursor, advancing it.
    ///
    /// Returns [`None`] at end of file. `Some(0)` is only returned for an empty `buf`.
    pub fn read(&self, buf: &mut [u8]) -> Result<Option<usize>> {
        self.with_open(|open| {
            self.ensure_readable()?;
            if buf.is_empty() {
                return Ok(Some(0));
            }
            match open.native.read(buf).map_err(|e| self.io_error(e))? {
                0 => Ok(None),
                count => Ok(Some(count)),
            }
        })
    }

    /// Reads at `pos`, leaving the cursor untouched. See [`read`](FileStream::read).
    pub fn read_at(&self, buf: &mut [u8], pos: u64) -> Result<Option<usize>> {
        self.with_open(|open| {
            self.ensure_readable()?;
            if buf.is_empty() {
                return Ok(Some(0));
            }
            match open.native.read_at(buf, pos).map_err(|e| self.io_error(e))? {
                0 => Ok(None),
                count => Ok(Some(count)),
            }
        })
    }

    /// Writes all of `buf` at the cursor (or at the end of the file when appending).
    pub fn write(&self, buf: &[u8]) -> Result<()> {
        self.with_open(|open| {
            self.ensure_writable()?;
            let mut rest = buf;
            while !rest.is_empty() {
                match open.native.write(rest).map_err(|e| self.io_error(e))? {
                    0 => return Err(self.write_zero()),
                    count => rest = &rest[count..],
                }
            }
            Ok(())
        })
    }

    /// Writes all of `buf` at `pos`, leaving the cursor untouched.
    ///
    /// Appending streams always write at the end of the file, so they reject positional writes.
    pub fn write_at(&self, buf: &[u8], pos: u64) -> Result<()> {
        self.with_open(|open| {
            self.ensure_writable()?;
            if self.is_appending() {
                return Err(FsError::illegal_argument(
                    &self.file,
                    "positional write on an appending stream",
                ));
            }
            self.write_all_at(open.native.as_ref(), buf, pos)
        })
    }

    fn write_all_at(&self, native: &dyn Native, buf: &[u8], pos: u64) -> Result<()> {
        let mut rest = buf;
        let mut pos = pos;
        while !rest.is_empty() {
            match native.write_at(rest, pos).map_err(|e| self.io_error(e))? {
                0 => return Err(self.write_zero()),
                count => {
                    rest = &rest[count..];
                    pos += count as u64;
                },
            }
        }
        Ok(())
    }

    fn write_zero(&self) -> FsError {
        FsError::new(ErrorKind::Io)
            .with_file(&self.file)
            .with_reason("failed to write whole buffer")
    }

    /// Flushes written data to the backing store, and with `meta` the file's metadata too.
    ///
    /// A stream holding a parent resource also flushes the parent when `meta` is set, so a newly
    /// created entry survives a crash.
    pub fn sync(&self, meta: bool) -> Result<()> {
        self.with_open(|open| {
            trace!(op = "sync", path = %self.file, meta);
            open.native.sync(meta).map_err(|e| self.io_error(e))?;
            match &open.parent {
                Some(parent) if meta => parent.sync(true).map_err(|e| self.io_error(e)),
                _ => Ok(()),
            }
        })
    }

    /// Releases the descriptor, then the parent resource if there is one.
    ///
    /// Closing an already closed stream does nothing. If both releases fail, the parent's error is
    /// attached to the descriptor's as suppressed.
    pub fn close(&self) -> Result<()> {
        let Some(open) = self.state.write().take() else {
            return Ok(());
        };
        open.close(&self.file)
    }
}

impl Drop for FileStream {
    fn drop(&mut self) {
        if let Some(open) = self.state.get_mut().take() {
            if let Err(error) = open.close(&self.file) {
                warn!(path = %self.file, %error, "failed to close stream on drop");
            }
        }
    }
}
