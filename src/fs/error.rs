use std::error::Error;
use std::fmt::{self, Formatter};
use std::io;

use derive_more::{Display, IsVariant};

use crate::fs::File;

#[cfg(unix)]
pub(crate) mod errno;
mod io_kind;
mod tests;
#[cfg(windows)]
pub(crate) mod win32;

pub type Result<T> = std::result::Result<T, FsError>;

/// The closed set of failure categories reported by this crate.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, IsVariant)]
pub enum ErrorKind {
    #[display("file not found")]
    FileNotFound,
    #[display("file already exists")]
    FileAlreadyExists,
    #[display("access denied")]
    AccessDenied,
    #[display("directory not empty")]
    DirectoryNotEmpty,
    #[display("not a directory")]
    NotDirectory,
    #[display("stream closed")]
    StreamClosed,
    #[display("illegal argument")]
    IllegalArgument,
    /// Any native failure that does not fit one of the other kinds.
    #[display("i/o error")]
    Io,
}

/// An error translated from a native failure, carrying the path(s) it concerns.
///
/// Secondary failures that happened while recovering from this one (e.g. while rolling back a
/// partial [`mkdirs`](crate::fs::Backend::mkdirs) or releasing a stream's parent resource) are kept
/// in [`suppressed`](FsError::suppressed) rather than being discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsError {
    kind: ErrorKind,
    file: Option<File>,
    other: Option<File>,
    reason: Option<String>,
    suppressed: Vec<FsError>,
}

impl FsError {
    pub const fn new(kind: ErrorKind) -> FsError {
        FsError {
            kind,
            file: None,
            other: None,
            reason: None,
            suppressed: Vec::new(),
        }
    }

    /// Translates an [`io::Error`] produced while operating on `file`.
    ///
    /// Native codes are mapped with the table for the host family. Errors that carry no native code
    /// fall back to their [`io::ErrorKind`].
    pub fn from_io(error: io::Error, file: &File) -> FsError {
        let kind = match error.raw_os_error() {
            #[cfg(unix)]
            Some(code) => errno::kind_of(code),
            #[cfg(windows)]
            Some(code) => win32::kind_of(code as u32),
            _ => io_kind::kind_of(error.kind()),
        };

        let translated = FsError::new(kind).with_file(file);
        match kind {
            ErrorKind::Io | ErrorKind::IllegalArgument => {
                translated.with_reason(os_message(&error))
            },
            _ => translated,
        }
    }

    pub fn with_file(mut self, file: &File) -> FsError {
        self.file = Some(file.clone());
        self
    }

    pub fn with_other(mut self, other: &File) -> FsError {
        self.other = Some(other.clone());
        self
    }

    pub fn with_reason<S: Into<String>>(mut self, reason: S) -> FsError {
        self.reason = Some(reason.into());
        self
    }

    pub(crate) fn closed(file: &File) -> FsError {
        FsError::new(ErrorKind::StreamClosed).with_file(file)
    }

    pub(crate) fn illegal_argument(file: &File, reason: &str) -> FsError {
        FsError::new(ErrorKind::IllegalArgument)
            .with_file(file)
            .with_reason(reason)
    }

    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub const fn file(&self) -> Option<&File> {
        self.file.as_ref()
    }

    pub const fn other(&self) -> Option<&File> {
        self.other.as_ref()
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    pub fn suppressed(&self) -> &[FsError] {
        &self.suppressed
    }

    pub fn add_suppressed(&mut self, error: FsError) {
        self.suppressed.push(error);
    }
}

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(file) = &self.file {
            write!(f, ": {file}")?;
        }
        if let Some(other) = &self.other {
            write!(f, " -> {other}")?;
        }
        if let Some(reason) = &self.reason {
            write!(f, " ({reason})")?;
        }
        if !self.suppressed.is_empty() {
            write!(f, " [{} suppressed]", self.suppressed.len())?;
        }
        Ok(())
    }
}

impl Error for FsError {}

impl From<FsError> for io::Error {
    fn from(value: FsError) -> Self {
        let kind = match value.kind {
            ErrorKind::FileNotFound => io::ErrorKind::NotFound,
            ErrorKind::FileAlreadyExists => io::ErrorKind::AlreadyExists,
            ErrorKind::AccessDenied => io::ErrorKind::PermissionDenied,
            ErrorKind::DirectoryNotEmpty => io::ErrorKind::DirectoryNotEmpty,
            ErrorKind::NotDirectory => io::ErrorKind::NotADirectory,
            ErrorKind::StreamClosed => io::ErrorKind::BrokenPipe,
            ErrorKind::IllegalArgument => io::ErrorKind::InvalidInput,
            ErrorKind::Io => io::ErrorKind::Other,
        };
        io::Error::new(kind, value)
    }
}

/// The OS description of an error, without the trailing numeric code.
fn os_message(error: &io::Error) -> String {
    let text = error.to_string();
    match text.find(" (os error ") {
        Some(end) => text[..end].to_owned(),
        None => text,
    }
}
