use std::io::{self, Read, Seek, SeekFrom, Write};

use crate::fs::FileStream;

impl Read for &FileStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(FileStream::read(self, buf)?.unwrap_or(0))
    }
}

impl Write for &FileStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        FileStream::write(self, buf)?;
        Ok(buf.len())
    }

    /// Streams do no buffering of their own. Use [`FileStream::sync`] for durability.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for &FileStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => Some(offset),
            SeekFrom::End(delta) => self.size()?.checked_add_signed(delta),
            SeekFrom::Current(delta) => self.position()?.checked_add_signed(delta),
        };

        match target {
            Some(target) => {
                self.set_position(target)?;
                Ok(self.position()?)
            },
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "invalid seek to a negative or overflowing position",
            )),
        }
    }
}
