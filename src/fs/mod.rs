//! Filesystem primitives over the host operating system.
//!
//! Most callers only need the free functions in this module, which dispatch to the backend
//! selected for the current target ([`SysFs`]), together with [`File`] and [`FileStream`].
//!
//! ```no_run
//! use portable_fs::fs::{self, File, Mode, OpenExcl};
//!
//! let dir = File::new("/tmp/portable-fs/a/b");
//! fs::mkdirs(&dir, Mode::DEFAULT_DIR, false)?;
//!
//! let stream = fs::open_read_write(&dir.resolve("data.bin"), OpenExcl::default())?;
//! stream.write(b"hello")?;
//! stream.set_position(0)?;
//! let mut buf = [0; 5];
//! assert_eq!(stream.read(&mut buf)?, Some(5));
//! stream.close()?;
//! # Ok::<(), portable_fs::fs::FsError>(())
//! ```
//!
//! # Backends
//! | Target        | Backend        | Permission model                 |
//! |---------------|----------------|----------------------------------|
//! | `cfg(unix)`   | [`PosixFs`]    | Full owner/group/other bits      |
//! | `cfg(windows)`| `WindowsFs`    | Read-only attribute (owner-write)|
//! | anything else | [`PortableFs`] | Read-only attribute (owner-write)|
//!
//! [`PortableFs`] is available on every target so it can be used explicitly, but only becomes
//! [`SysFs`] where neither of the native backends apply.

pub mod path;

mod backend;
#[cfg(feature = "async")]
mod bridge;
mod error;
mod file;
mod file_type;
mod mode;
mod stats;
mod stream;

pub use backend::*;
#[cfg(feature = "async")]
pub use bridge::*;
pub use error::*;
pub use file::*;
pub use file_type::*;
pub use mode::*;
pub use stats::*;
pub use stream::*;
