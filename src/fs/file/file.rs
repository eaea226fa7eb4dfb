use std::fmt::{self, Display, Formatter};
use std::path::Path;

use crate::fs::path::{self, Flavor};
use crate::fs::{self, Result};

/// An immutable path on the host filesystem.
///
/// A `File` is only a name: it owns no descriptor and performs no I/O of its own. The path is
/// normalized for the host [`Flavor`] on construction, so two `File`s compare equal exactly when
/// their normalized paths do.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct File {
    path: String,
}

impl File {
    pub fn new<S: Into<String>>(path: S) -> File {
        File {
            path: path::normalize(&path.into(), Flavor::HOST),
        }
    }

    /// Resolves `child` against this path. An absolute or rooted `child` replaces it.
    pub fn resolve<S: AsRef<str>>(&self, child: S) -> File {
        File {
            path: path::join(&self.path, child.as_ref(), Flavor::HOST),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn into_path(self) -> String {
        self.path
    }

    /// The final component, or the empty string for a root.
    pub fn name(&self) -> &str {
        path::basename(&self.path, Flavor::HOST)
    }

    pub fn parent(&self) -> Option<&str> {
        path::dirname(&self.path, Flavor::HOST)
    }

    pub fn parent_file(&self) -> Option<File> {
        self.parent().map(|parent| File {
            path: parent.to_owned(),
        })
    }

    pub fn is_absolute(&self) -> bool {
        path::is_absolute(&self.path, Flavor::HOST)
    }

    /// Collapses `.` and `..` components lexically, without consulting the filesystem.
    pub fn normalize(&self) -> File {
        File {
            path: path::normalize_lexically(&self.path, Flavor::HOST),
        }
    }

    /// See [`Backend::absolute_path`](crate::fs::Backend::absolute_path).
    pub fn absolute(&self) -> Result<File> {
        fs::absolute_path(self)
    }

    /// See [`Backend::canonical_path`](crate::fs::Backend::canonical_path).
    pub fn canonical(&self) -> Result<File> {
        fs::canonical_path(self)
    }

    pub fn exists(&self) -> Result<bool> {
        fs::exists(self)
    }
}

impl Display for File {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}

impl AsRef<Path> for File {
    fn as_ref(&self) -> &Path {
        Path::new(&self.path)
    }
}

impl From<&str> for File {
    fn from(value: &str) -> Self {
        File::new(value)
    }
}

impl From<String> for File {
    fn from(value: String) -> Self {
        File::new(value)
    }
}
