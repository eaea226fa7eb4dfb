#![cfg(test)]

use std::io;

use super::*;

#[test]
fn test_io_kind_fallback() {
    let file = File::new("some/file");
    let cases = [
        (io::ErrorKind::NotFound, ErrorKind::FileNotFound),
        (io::ErrorKind::AlreadyExists, ErrorKind::FileAlreadyExists),
        (io::ErrorKind::PermissionDenied, ErrorKind::AccessDenied),
        (io::ErrorKind::DirectoryNotEmpty, ErrorKind::DirectoryNotEmpty),
        (io::ErrorKind::NotADirectory, ErrorKind::NotDirectory),
        (io::ErrorKind::InvalidInput, ErrorKind::IllegalArgument),
        (io::ErrorKind::UnexpectedEof, ErrorKind::Io),
    ];

    for (native, expected) in cases {
        let error = FsError::from_io(io::Error::new(native, "synthetic"), &file);
        assert_eq!(
            error.kind(), expected,
            "Errors without a native code should be translated by their io::ErrorKind."
        );
        assert_eq!(error.file(), Some(&file), "The offending path should be attached.");
    }
}

#[cfg(unix)]
#[test]
fn test_errno_translation() {
    let file = File::new("/nowhere");
    let cases = [
        (libc::ENOENT, ErrorKind::FileNotFound),
        (libc::EEXIST, ErrorKind::FileAlreadyExists),
        (libc::EACCES, ErrorKind::AccessDenied),
        (libc::EPERM, ErrorKind::AccessDenied),
        (libc::ENOTEMPTY, ErrorKind::DirectoryNotEmpty),
        (libc::ENOTDIR, ErrorKind::NotDirectory),
        (libc::EINVAL, ErrorKind::IllegalArgument),
        (libc::EIO, ErrorKind::Io),
        (libc::ELOOP, ErrorKind::Io),
    ];

    for (code, expected) in cases {
        let error = FsError::from_io(io::Error::from_raw_os_error(code), &file);
        assert_eq!(error.kind(), expected, "errno {code} should map to {expected:?}.");
    }
}

#[cfg(unix)]
#[test]
fn test_reason_has_no_native_code() {
    let error = FsError::from_io(io::Error::from_raw_os_error(libc::EIO), &File::new("/x"));
    let reason = error.reason().unwrap_or_default();
    assert!(!reason.is_empty(), "Catch-all errors should carry the OS description.");
    assert!(
        !reason.contains("os error"),
        "The raw native error code should not leak into the reason: {reason}"
    );
}

#[test]
fn test_suppressed_and_display() {
    let a = File::new("a");
    let b = File::new("b");
    let mut primary = FsError::new(ErrorKind::AccessDenied).with_file(&a).with_other(&b);
    primary.add_suppressed(FsError::new(ErrorKind::DirectoryNotEmpty).with_file(&b));

    assert_eq!(primary.suppressed().len(), 1);
    assert_eq!(primary.suppressed()[0].kind(), ErrorKind::DirectoryNotEmpty);
    assert_eq!(primary.other(), Some(&b));
    assert_eq!(primary.to_string(), "access denied: a -> b [1 suppressed]");
}

#[test]
fn test_into_io_error() {
    let error = FsError::closed(&File::new("stream"));
    let converted = io::Error::from(error);
    assert_eq!(converted.kind(), io::ErrorKind::BrokenPipe);
    assert!(
        converted.get_ref().is_some_and(|inner| inner.is::<FsError>()),
        "The original error should be recoverable from the io::Error."
    );
}
