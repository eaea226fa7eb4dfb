use crate::fs::path::Flavor;
use crate::fs::stream::Access;
use crate::fs::{Backend, File, FileStream, Mode, OpenExcl, Result, Stats};

use super::std_ops;

/// The backend for Windows hosts.
///
/// Paths may use drive letters, drive-relative prefixes (`C:foo`) and UNC roots. Permissions are
/// modeled by the read-only attribute alone: a mode grants write access iff its owner-write bit is
/// set, and its other bits are accepted but have no effect.
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsFs;

impl WindowsFs {
    pub const fn new() -> WindowsFs {
        WindowsFs
    }
}

impl Backend for WindowsFs {
    fn flavor(&self) -> Flavor {
        Flavor::Windows
    }

    /// Resolves through `GetFinalPathNameByHandle`, or `GetFullPathName` for a bare drive, and
    /// strips the `\\?\` prefix from the result.
    fn real_path(&self, path: &str) -> Result<String> {
        std_ops::real_path(path, Flavor::Windows)
    }

    fn exists(&self, file: &File) -> Result<bool> {
        std_ops::exists(file)
    }

    fn stat(&self, file: &File) -> Result<Stats> {
        std_ops::stat(file, true)
    }

    fn lstat(&self, file: &File) -> Result<Stats> {
        std_ops::stat(file, false)
    }

    fn chmod(&self, file: &File, mode: Mode, must_exist: bool) -> Result<()> {
        std_ops::chmod(file, mode, must_exist)
    }

    fn delete(&self, file: &File, ignore_read_only: bool, must_exist: bool) -> Result<()> {
        std_ops::delete(file, ignore_read_only, must_exist)
    }

    /// Creates `dir` with the read-only attribute when `mode` lacks owner-write.
    fn mkdir(&self, dir: &File, mode: Mode, must_create: bool) -> Result<()> {
        std_ops::mkdir(dir, mode, must_create)
    }

    fn open_read(&self, file: &File) -> Result<FileStream> {
        std_ops::open(file, Access::Read, OpenExcl::MustExist)
    }

    fn open_write(&self, file: &File, excl: OpenExcl, appending: bool) -> Result<FileStream> {
        std_ops::open(file, Access::Write { append: appending }, excl)
    }

    fn open_read_write(&self, file: &File, excl: OpenExcl) -> Result<FileStream> {
        std_ops::open(file, Access::ReadWrite, excl)
    }
}
