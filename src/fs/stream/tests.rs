#![cfg(test)]

use std::io::{Read, Seek, SeekFrom, Write};

use tempfile::TempDir;

use super::*;
use crate::fs::{self, Mode};

fn scratch() -> (TempDir, File) {
    let dir = tempfile::tempdir().expect("failed to create scratch directory");
    let file = File::new(dir.path().to_string_lossy());
    (dir, file)
}

#[test]
fn test_write_then_read_back() {
    let (_guard, root) = scratch();
    let stream = fs::open_read_write(&root.resolve("data"), OpenExcl::default())
        .expect("failed to open stream");
    let data: Vec<u8> = (0..=255).cycle().take(10_000).collect();

    stream.write(&data).expect("write failed");
    assert_eq!(stream.position(), Ok(data.len() as u64));
    stream.set_position(0).expect("seek failed");

    let mut read = vec![0; data.len()];
    let mut filled = 0;
    while let Some(count) = stream.read(&mut read[filled..]).expect("read failed") {
        filled += count;
        if filled == read.len() {
            break;
        }
    }
    assert_eq!(read, data, "the bytes read back should be the bytes written");

    stream.set_size(0).expect("truncate failed");
    assert_eq!(stream.size(), Ok(0));
    stream.close().expect("close failed");
}

#[test]
fn test_end_of_stream() {
    let (_guard, root) = scratch();
    let file = root.resolve("empty");
    fs::write_bytes(&file, OpenExcl::default(), b"").expect("failed to create file");

    let stream = fs::open_read(&file).expect("failed to open stream");
    let mut buf = [0; 16];
    assert_eq!(stream.read(&mut buf), Ok(None), "end of file should read as None");
    assert_eq!(stream.read(&mut []), Ok(Some(0)), "an empty buffer should read nothing");
    assert_eq!(stream.read_at(&mut buf, 100), Ok(None));
}

#[test]
fn test_positional_io_keeps_cursor() {
    let (_guard, root) = scratch();
    let stream = fs::open_read_write(&root.resolve("data"), OpenExcl::default())
        .expect("failed to open stream");

    stream.write(b"hello world").expect("write failed");
    stream.set_position(2).expect("seek failed");
    stream.write_at(b"W", 6).expect("write_at failed");

    let mut buf = [0; 5];
    assert_eq!(stream.read_at(&mut buf, 6), Ok(Some(5)));
    assert_eq!(&buf, b"World");
    assert_eq!(stream.position(), Ok(2), "positional I/O should not move the cursor");
}

#[test]
fn test_closed_stream() {
    let (_guard, root) = scratch();
    let stream = fs::open_read_write(&root.resolve("data"), OpenExcl::default())
        .expect("failed to open stream");

    assert!(stream.is_open());
    assert_eq!(stream.close(), Ok(()));
    assert_eq!(stream.close(), Ok(()), "closing twice should be a no-op");
    assert!(!stream.is_open());

    let closed = Err(ErrorKind::StreamClosed);
    let mut buf = [0; 4];
    assert_eq!(stream.position().map_err(|e| e.kind()), closed.map(|()| 0));
    assert_eq!(stream.set_position(1).map_err(|e| e.kind()), closed);
    assert_eq!(stream.size().map_err(|e| e.kind()), closed.map(|()| 0));
    assert_eq!(stream.set_size(1).map_err(|e| e.kind()), closed);
    assert_eq!(stream.read(&mut buf).map_err(|e| e.kind()), closed.map(|()| None));
    assert_eq!(stream.read_at(&mut buf, 0).map_err(|e| e.kind()), closed.map(|()| None));
    assert_eq!(stream.write(b"x").map_err(|e| e.kind()), closed);
    assert_eq!(stream.write_at(b"x", 0).map_err(|e| e.kind()), closed);
    assert_eq!(stream.sync(true).map_err(|e| e.kind()), closed);
}

#[test]
fn test_direction_is_enforced() {
    let (_guard, root) = scratch();
    let file = root.resolve("data");
    fs::write_bytes(&file, OpenExcl::default(), b"abc").expect("failed to create file");

    let reader = fs::open_read(&file).expect("failed to open reader");
    assert!(reader.can_read() && !reader.can_write());
    assert_eq!(reader.write(b"x").map_err(|e| e.kind()), Err(ErrorKind::IllegalArgument));
    assert_eq!(reader.set_size(0).map_err(|e| e.kind()), Err(ErrorKind::IllegalArgument));

    let writer = fs::open_write(&file, OpenExcl::MustExist, false).expect("failed to open writer");
    assert!(!writer.can_read() && writer.can_write());
    let mut buf = [0; 1];
    assert_eq!(writer.read(&mut buf).map_err(|e| e.kind()), Err(ErrorKind::IllegalArgument));
    assert_eq!(writer.size(), Ok(0), "opening for writing should truncate");
}

#[test]
fn test_appending() {
    let (_guard, root) = scratch();
    let file = root.resolve("log");
    fs::write_bytes(&file, OpenExcl::default(), b"one\n").expect("failed to create file");

    let stream = fs::open_write(&file, OpenExcl::MustExist, true).expect("failed to open stream");
    assert!(stream.is_appending());
    stream.set_position(0).expect("moving the cursor of an appending stream is ignored");
    stream.write(b"two\n").expect("write failed");
    assert_eq!(
        stream.write_at(b"x", 0).map_err(|e| e.kind()),
        Err(ErrorKind::IllegalArgument)
    );
    stream.close().expect("close failed");

    assert_eq!(fs::read_utf8(&file), Ok("one\ntwo\n".to_owned()));
}

#[test]
fn test_open_excl() {
    let (_guard, root) = scratch();
    let file = root.resolve("data");

    assert_eq!(
        fs::open_read_write(&file, OpenExcl::MustExist).map(|_| ()).map_err(|e| e.kind()),
        Err(ErrorKind::FileNotFound)
    );
    let created = fs::open_read_write(&file, OpenExcl::MustCreate(Mode::DEFAULT_FILE))
        .expect("MustCreate should create a missing file");
    created.close().expect("close failed");
    assert_eq!(
        fs::open_read_write(&file, OpenExcl::MustCreate(Mode::DEFAULT_FILE))
            .map(|_| ())
            .map_err(|e| e.kind()),
        Err(ErrorKind::FileAlreadyExists)
    );
    assert!(fs::open_read_write(&file, OpenExcl::default()).is_ok());
    assert_eq!(OpenExcl::default(), OpenExcl::MaybeCreate(Mode::DEFAULT_FILE));
}

#[cfg(unix)]
#[test]
fn test_must_create_keeps_parent() {
    let (_guard, root) = scratch();
    let excl = OpenExcl::MustCreate(Mode::DEFAULT_FILE);
    let stream =
        fs::open_write(&root.resolve("new"), excl, false).expect("failed to create file");

    assert!(
        stream.state.read().as_ref().is_some_and(|open| open.parent.is_some()),
        "a created file should hold its parent directory"
    );
    stream.write(b"durable").expect("write failed");
    assert_eq!(stream.sync(true), Ok(()), "syncing should also flush the parent");
    assert_eq!(stream.close(), Ok(()));
    assert!(stream.state.read().is_none());
}

#[test]
fn test_std_io_traits() {
    let (_guard, root) = scratch();
    let stream = fs::open_read_write(&root.resolve("data"), OpenExcl::default())
        .expect("failed to open stream");

    let mut handle = &stream;
    handle.write_all(b"0123456789").expect("write_all failed");
    assert_eq!(handle.seek(SeekFrom::End(-4)).expect("seek failed"), 6);

    let mut tail = String::new();
    handle.read_to_string(&mut tail).expect("read_to_string failed");
    assert_eq!(tail, "6789");

    assert_eq!(handle.seek(SeekFrom::Current(-10)).expect("seek failed"), 0);
    assert!(handle.seek(SeekFrom::Current(-1)).is_err(), "seeking before the start should fail");
}

#[derive(Debug)]
struct FailingClose(&'static str);

impl Native for FailingClose {
    fn read(&self, _: &mut [u8]) -> io::Result<usize> {
        Ok(0)
    }

    fn read_at(&self, _: &mut [u8], _: u64) -> io::Result<usize> {
        Ok(0)
    }

    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        Ok(buf.len())
    }

    fn write_at(&self, buf: &[u8], _: u64) -> io::Result<usize> {
        Ok(buf.len())
    }

    fn position(&self) -> io::Result<u64> {
        Ok(0)
    }

    fn seek(&self, _: u64) -> io::Result<()> {
        Ok(())
    }

    fn size(&self) -> io::Result<u64> {
        Ok(0)
    }

    fn truncate(&self, _: u64) -> io::Result<()> {
        Ok(())
    }

    fn sync(&self, _: bool) -> io::Result<()> {
        Ok(())
    }

    fn close(self: Box<Self>) -> io::Result<()> {
        Err(io::Error::other(self.0))
    }
}

#[test]
fn test_close_aggregates_parent_failure() {
    let file = File::new("dir").resolve("file");
    let native = Box::new(FailingClose("descriptor"));
    let stream = FileStream::new(file.clone(), native, Access::ReadWrite)
        .with_parent(Box::new(FailingClose("parent")));

    let error = stream.close().expect_err("both releases fail");
    assert_eq!(error.kind(), ErrorKind::Io);
    assert_eq!(error.file(), Some(&file), "the descriptor's failure should be the primary one");
    assert_eq!(error.suppressed().len(), 1);
    assert_eq!(error.suppressed()[0].file(), file.parent_file().as_ref());
    assert!(!stream.is_open(), "a failed close still leaves the stream closed");
    assert_eq!(stream.close(), Ok(()));
}
