use windows_sys::Win32::Foundation::{
    ERROR_ACCESS_DENIED, ERROR_ALREADY_EXISTS, ERROR_BAD_PATHNAME, ERROR_DIRECTORY,
    ERROR_DIR_NOT_EMPTY, ERROR_FILE_EXISTS, ERROR_FILE_NOT_FOUND, ERROR_FILENAME_EXCED_RANGE,
    ERROR_INVALID_DRIVE, ERROR_INVALID_NAME, ERROR_INVALID_PARAMETER, ERROR_NOT_READY,
    ERROR_PATH_NOT_FOUND, ERROR_SHARING_VIOLATION, ERROR_WRITE_PROTECT,
};

use crate::fs::ErrorKind;

/// Maps a Windows last-error code onto the closed error taxonomy.
pub(crate) const fn kind_of(code: u32) -> ErrorKind {
    match code {
        ERROR_FILE_NOT_FOUND | ERROR_PATH_NOT_FOUND | ERROR_INVALID_DRIVE | ERROR_NOT_READY => {
            ErrorKind::FileNotFound
        },
        ERROR_FILE_EXISTS | ERROR_ALREADY_EXISTS => ErrorKind::FileAlreadyExists,
        ERROR_ACCESS_DENIED | ERROR_SHARING_VIOLATION | ERROR_WRITE_PROTECT => {
            ErrorKind::AccessDenied
        },
        ERROR_DIR_NOT_EMPTY => ErrorKind::DirectoryNotEmpty,
        ERROR_DIRECTORY => ErrorKind::NotDirectory,
        ERROR_INVALID_NAME | ERROR_BAD_PATHNAME | ERROR_INVALID_PARAMETER
        | ERROR_FILENAME_EXCED_RANGE => ErrorKind::IllegalArgument,
        _ => ErrorKind::Io,
    }
}
