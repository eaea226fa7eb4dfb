mod file;
mod tests;

pub use file::*;
