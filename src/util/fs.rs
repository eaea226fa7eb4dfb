use std::ffi::{CStr, CString};
use std::io;

use libc::c_int;

use crate::fs::{File, FsError, Result};

pub fn err_no() -> c_int {
    io::Error::last_os_error().raw_os_error().unwrap_or(libc::EIO)
}

/// Builds the NUL-terminated form of a path for passing to libc.
pub fn c_path(file: &File) -> Result<CString> {
    CString::new(file.path())
        .map_err(|_| FsError::illegal_argument(file, "path contains a NUL byte"))
}

pub fn from_c_path(raw: &CStr) -> String {
    raw.to_string_lossy().into_owned()
}

/// Converts a `-1` return into the `io::Error` for the current errno.
pub fn cvt(ret: c_int) -> io::Result<c_int> {
    match ret {
        -1 => Err(io::Error::last_os_error()),
        ret => Ok(ret),
    }
}

/// Like [`cvt`] for size-returning calls, retrying on `EINTR`.
pub fn cvt_size_r<F: FnMut() -> isize>(mut call: F) -> io::Result<usize> {
    loop {
        match call() {
            -1 if err_no() == libc::EINTR => continue,
            -1 => return Err(io::Error::last_os_error()),
            count => return Ok(count as usize),
        }
    }
}
