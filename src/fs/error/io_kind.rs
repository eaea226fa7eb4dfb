use std::io;

use crate::fs::ErrorKind;

/// Maps an error that carries no native code (e.g. one synthesized by the standard library on a
/// portable target) onto the closed error taxonomy.
pub(crate) fn kind_of(kind: io::ErrorKind) -> ErrorKind {
    match kind {
        io::ErrorKind::NotFound =>          ErrorKind::FileNotFound,
        io::ErrorKind::AlreadyExists =>     ErrorKind::FileAlreadyExists,
        io::ErrorKind::PermissionDenied
        | io::ErrorKind::ReadOnlyFilesystem => ErrorKind::AccessDenied,
        io::ErrorKind::DirectoryNotEmpty => ErrorKind::DirectoryNotEmpty,
        io::ErrorKind::NotADirectory =>     ErrorKind::NotDirectory,
        io::ErrorKind::InvalidInput =>      ErrorKind::IllegalArgument,
        _ =>                                ErrorKind::Io,
    }
}
