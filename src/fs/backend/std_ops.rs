//! Operations over [`std::fs`] shared by the backends that model permissions as a single
//! read-only attribute.

use std::fs::{self, OpenOptions};
use std::io;

use tracing::{debug, trace};

use crate::fs::path::{self, Flavor};
use crate::fs::stream::{Access, StdFile};
use crate::fs::{ErrorKind, File, FileStream, FsError, Mode, OpenExcl, Result, Stats};

fn translate(error: io::Error, file: &File) -> FsError {
    FsError::from_io(error, file)
}

fn unless_missing(error: FsError, must_exist: bool, op: &'static str) -> Result<()> {
    if !must_exist && error.kind().is_file_not_found() {
        debug!(op, path = ?error.file(), "target does not exist");
        Ok(())
    } else {
        Err(error)
    }
}

pub(super) fn real_path(path: &str, flavor: Flavor) -> Result<String> {
    let file = File::new(path);
    trace!(op = "realpath", path = %file);

    // A bare drive stands for that drive's current directory, which canonicalize rejects.
    let is_bare_drive = flavor.is_windows() && path.len() == 2 && path::root_len(path, flavor) == 2;
    let resolved = if is_bare_drive {
        std::path::absolute(&file)
    } else {
        fs::canonicalize(&file)
    };
    let resolved = resolved.map_err(|e| translate(e, &file))?;

    let resolved = resolved.to_string_lossy();
    let stripped = match flavor {
        Flavor::Windows => strip_verbatim(&resolved),
        Flavor::Posix => resolved.into_owned(),
    };
    Ok(path::normalize(&stripped, flavor))
}

/// Rewrites the `\\?\` forms returned by Windows into their ordinary spelling.
fn strip_verbatim(path: &str) -> String {
    if let Some(unc) = path.strip_prefix(r"\\?\UNC\") {
        format!(r"\\{unc}")
    } else if let Some(local) = path.strip_prefix(r"\\?\") {
        local.to_owned()
    } else {
        path.to_owned()
    }
}

pub(super) fn exists(file: &File) -> Result<bool> {
    trace!(op = "metadata", path = %file);
    match fs::metadata(file) {
        Ok(_) => Ok(true),
        Err(error) => match translate(error, file) {
            error if error.kind().is_file_not_found() || error.kind().is_not_directory() => {
                Ok(false)
            },
            error => Err(error),
        },
    }
}

pub(super) fn stat(file: &File, follow: bool) -> Result<Stats> {
    let op = if follow { "metadata" } else { "symlink_metadata" };
    trace!(op, path = %file);
    let meta = if follow {
        fs::metadata(file)
    } else {
        fs::symlink_metadata(file)
    };
    meta.map(|meta| Stats::from_metadata(&meta))
        .map_err(|e| translate(e, file))
}

/// Without the owner-write bit a unix entry counts as read-only, matching [`Stats::read_only`].
fn is_read_only_permission(permissions: &fs::Permissions) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        permissions.mode() & 0o200 == 0
    }
    #[cfg(not(unix))]
    {
        permissions.readonly()
    }
}

fn set_read_only(file: &File, read_only: bool) -> io::Result<()> {
    let mut permissions = fs::metadata(file)?.permissions();
    if is_read_only_permission(&permissions) != read_only {
        permissions.set_readonly(read_only);
        fs::set_permissions(file, permissions)?;
    }
    Ok(())
}

/// Only the owner-write bit of `mode` is applied, as the absence of the read-only attribute.
pub(super) fn chmod(file: &File, mode: Mode, must_exist: bool) -> Result<()> {
    trace!(op = "set_permissions", path = %file, %mode);
    set_read_only(file, !mode.owner_write())
        .or_else(|e| unless_missing(translate(e, file), must_exist, "chmod"))
}

fn is_dir(file: &File) -> bool {
    fs::symlink_metadata(file).is_ok_and(|meta| meta.is_dir())
}

fn is_read_only(file: &File) -> bool {
    fs::symlink_metadata(file).is_ok_and(|meta| is_read_only_permission(&meta.permissions()))
}

pub(super) fn delete(file: &File, ignore_read_only: bool, must_exist: bool) -> Result<()> {
    trace!(op = "remove_file", path = %file);
    let mut result = fs::remove_file(file);

    if result.is_err() && ignore_read_only && is_read_only(file) {
        debug!(op = "delete", path = %file, "clearing read-only attribute");
        result = set_read_only(file, false).and_then(|()| fs::remove_file(file));
    }

    if result.is_err() && is_dir(file) {
        trace!(op = "remove_dir", path = %file);
        result = fs::remove_dir(file);
    }

    result.or_else(|e| unless_missing(translate(e, file), must_exist, "delete"))
}

pub(super) fn mkdir(dir: &File, mode: Mode, must_create: bool) -> Result<()> {
    trace!(op = "create_dir", path = %dir, %mode);
    match fs::create_dir(dir) {
        Ok(()) if !mode.owner_write() => set_read_only(dir, true).map_err(|e| translate(e, dir)),
        Ok(()) => Ok(()),
        Err(error) => match translate(error, dir) {
            error if !must_create && error.kind().is_file_already_exists() => {
                debug!(op = "mkdir", path = %dir, "directory already exists");
                Ok(())
            },
            error => Err(error),
        },
    }
}

pub(super) fn open(file: &File, access: Access, excl: OpenExcl) -> Result<FileStream> {
    let mut options = OpenOptions::new();
    match access {
        Access::Read => options.read(true),
        Access::Write { append: true } => options.append(true),
        Access::Write { append: false } => options.write(true).truncate(true),
        Access::ReadWrite => options.read(true).write(true),
    };
    excl.apply(&mut options);

    trace!(op = "open", path = %file, ?access, ?excl);
    let native = options.open(file).map_err(|e| translate(e, file))?;
    if native.metadata().is_ok_and(|meta| meta.is_dir()) {
        return Err(FsError::new(ErrorKind::Io)
            .with_file(file)
            .with_reason("is a directory"));
    }

    Ok(FileStream::new(file.clone(), Box::new(StdFile::new(native)), access))
}
