use std::fs;
use std::io::{self, Read, Seek, SeekFrom, Write};

use parking_lot::Mutex;

use crate::fs::stream::Native;

/// A stream backed by [`std::fs::File`].
///
/// Targets without native positional I/O emulate it by moving the cursor and restoring it, so
/// every cursor access goes through `cursor`.
#[derive(Debug)]
pub(crate) struct StdFile {
    file: fs::File,
    cursor: Mutex<()>,
}

impl StdFile {
    pub fn new(file: fs::File) -> StdFile {
        StdFile {
            file,
            cursor: Mutex::new(()),
        }
    }

    #[cfg(not(unix))]
    fn at<T, F>(&self, pos: u64, op: F) -> io::Result<T>
    where
        F: FnOnce(&fs::File) -> io::Result<T>,
    {
        let _guard = self.cursor.lock();
        let mut file = &self.file;
        let saved = file.stream_position()?;
        file.seek(SeekFrom::Start(pos))?;
        let result = op(file);
        file.seek(SeekFrom::Start(saved))?;
        result
    }
}

impl Native for StdFile {
    fn read(&self, buf: &mut [u8]) -> io::Result<usize> {
        let _guard = self.cursor.lock();
        (&self.file).read(buf)
    }

    fn read_at(&self, buf: &mut [u8], pos: u64) -> io::Result<usize> {
        #[cfg(unix)]
        {
            std::os::unix::fs::FileExt::read_at(&self.file, buf, pos)
        }
        #[cfg(not(unix))]
        {
            self.at(pos, |mut file| file.read(buf))
        }
    }

    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        let _guard = self.cursor.lock();
        (&self.file).write(buf)
    }

    fn write_at(&self, buf: &[u8], pos: u64) -> io::Result<usize> {
        #[cfg(unix)]
        {
            std::os::unix::fs::FileExt::write_at(&self.file, buf, pos)
        }
        #[cfg(not(unix))]
        {
            self.at(pos, |mut file| file.write(buf))
        }
    }

    fn position(&self) -> io::Result<u64> {
        let _guard = self.cursor.lock();
        (&self.file).stream_position()
    }

    fn seek(&self, pos: u64) -> io::Result<()> {
        let _guard = self.cursor.lock();
        (&self.file).seek(SeekFrom::Start(pos)).map(drop)
    }

    fn size(&self) -> io::Result<u64> {
        Ok(self.file.metadata()?.len())
    }

    fn truncate(&self, size: u64) -> io::Result<()> {
        self.file.set_len(size)
    }

    fn sync(&self, meta: bool) -> io::Result<()> {
        if meta {
            self.file.sync_all()
        } else {
            self.file.sync_data()
        }
    }

    /// The standard library reports no error from closing a file, so this cannot fail.
    fn close(self: Box<Self>) -> io::Result<()> {
        drop(self);
        Ok(())
    }
}
