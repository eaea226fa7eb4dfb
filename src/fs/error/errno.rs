use libc::c_int;

use crate::fs::ErrorKind;

/// Maps a POSIX error number onto the closed error taxonomy.
pub(crate) const fn kind_of(code: c_int) -> ErrorKind {
    match code {
        libc::ENOENT =>                              ErrorKind::FileNotFound,
        libc::EEXIST =>                              ErrorKind::FileAlreadyExists,
        libc::EACCES | libc::EPERM | libc::EROFS =>  ErrorKind::AccessDenied,
        libc::ENOTEMPTY =>                           ErrorKind::DirectoryNotEmpty,
        libc::ENOTDIR =>                             ErrorKind::NotDirectory,
        libc::EINVAL | libc::ENAMETOOLONG =>         ErrorKind::IllegalArgument,
        _ =>                                         ErrorKind::Io,
    }
}
