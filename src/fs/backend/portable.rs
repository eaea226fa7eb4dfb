use crate::fs::path::Flavor;
use crate::fs::stream::Access;
use crate::fs::{Backend, File, FileStream, Mode, OpenExcl, Result, Stats};

use super::std_ops;

/// A backend built only on [`std::fs`], for hosts without a dedicated backend.
///
/// Permissions follow the read-only-attribute model: [`chmod`](Backend::chmod) only applies the
/// owner-write bit, by clearing or setting the attribute.
#[derive(Debug, Default, Clone, Copy)]
pub struct PortableFs;

impl PortableFs {
    pub const fn new() -> PortableFs {
        PortableFs
    }
}

impl Backend for PortableFs {
    fn flavor(&self) -> Flavor {
        Flavor::HOST
    }

    fn real_path(&self, path: &str) -> Result<String> {
        std_ops::real_path(path, self.flavor())
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
