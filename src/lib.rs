//! A cross-platform filesystem primitive layer.
//!
//! This crate provides one logical contract over the host filesystem, implemented separately for
//! each family of host operating system. It is a thin pass-through: nothing is cached, there is no
//! virtual filesystem and no on-disk format of its own.
//!
//! # Layout
//! - [`fs::File`] is an immutable, normalized path string. It holds no I/O state.
//! - [`fs::Backend`] is the per-OS contract (`exists`, `mkdir`, `mkdirs`, `chmod`, `delete`,
//!   `absolute_path`, `canonical_path` and the `open_*` family). Exactly one implementation is
//!   selected at compile time as [`fs::SysFs`]; the free functions in [`fs`] dispatch to it.
//! - [`fs::FileStream`] owns exactly one native descriptor and exposes a cursor-based and a
//!   positional byte API.
//! - [`fs::AsyncFs`] (feature `async`) runs all of the above on a caller-provided tokio runtime
//!   and serializes cursor-dependent stream operations behind a per-stream lock.
//!
//! # Error Handling
//! Every native failure is translated at the backend boundary into an [`fs::FsError`], whose
//! [`fs::ErrorKind`] belongs to a small closed set. No raw OS error code crosses the boundary.
//! Multi-step operations that fail twice (a `mkdirs` rollback, a stream closing its parent
//! resource) keep the secondary failures as suppressed errors on the primary one rather than
//! discarding them.
//!
//! # Logging
//! Native calls are instrumented with [`tracing`]. The crate never installs a subscriber.
//!
//! # Dependencies
//! The POSIX backend relies on `libc` for its thin syscall wrappers. The Windows backend uses the
//! standard library plus `windows-sys` for the native error codes. Every other target gets the
//! portable backend, which only uses [`std::fs`].

#![warn(clippy::missing_safety_doc)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(clippy::missing_panics_doc)]
#![warn(clippy::unwrap_used)]
#![allow(clippy::module_inception)]

pub mod fs;

pub(crate) mod util;
