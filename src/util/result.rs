use crate::fs::{FsError, Result};

pub(crate) trait ResultExtension<T> {
    /// Folds the outcome of a cleanup step into `self`. A cleanup failure becomes the primary error
    /// when `self` succeeded, and is attached as a suppressed error when `self` already failed.
    fn and_cleanup(self, cleanup: Result<()>) -> Result<T>;
}

impl<T> ResultExtension<T> for Result<T> {
    fn and_cleanup(self, cleanup: Result<()>) -> Result<T> {
        match (self, cleanup) {
            (Ok(val), Ok(())) => Ok(val),
            (Ok(_), Err(error)) => Err(error),
            (Err(error), Ok(())) => Err(error),
            (Err(mut error), Err(secondary)) => {
                error.add_suppressed(secondary);
                Err(error)
            },
        }
    }
}
