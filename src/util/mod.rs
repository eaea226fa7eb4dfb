#[cfg(unix)]
pub(crate) mod fs;
pub(crate) mod result;
