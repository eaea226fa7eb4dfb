use std::fs::OpenOptions;

use derive_more::IsVariant;

use crate::fs::Mode;

/// Whether opening a file for writing may create it, must create it, or must not.
///
/// The [`Mode`] carried by the creating variants is only applied if the file is actually created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IsVariant)]
pub enum OpenExcl {
    /// Open the file if it exists, otherwise create it.
    MaybeCreate(Mode),
    /// Create the file, failing with [`FileAlreadyExists`](crate::fs::ErrorKind::FileAlreadyExists)
    /// if it exists.
    MustCreate(Mode),
    /// Open an existing file, failing with [`FileNotFound`](crate::fs::ErrorKind::FileNotFound)
    /// otherwise.
    MustExist,
}

impl OpenExcl {
    pub const fn mode(self) -> Option<Mode> {
        match self {
            OpenExcl::MaybeCreate(mode) | OpenExcl::MustCreate(mode) => Some(mode),
            OpenExcl::MustExist => None,
        }
    }

    #[cfg(unix)]
    pub(crate) const fn flags(self) -> libc::c_int {
        match self {
            OpenExcl::MaybeCreate(_) => libc::O_CREAT,
            OpenExcl::MustCreate(_) => libc::O_CREAT | libc::O_EXCL,
            OpenExcl::MustExist => 0,
        }
    }

    /// Configures `options` to create the file according to this policy.
    ///
    /// Where the target has no permission bits, a mode without owner-write creates the file with
    /// the read-only attribute instead.
    pub(crate) fn apply(self, options: &mut OpenOptions) -> &mut OpenOptions {
        match self {
            OpenExcl::MaybeCreate(_) => {
                options.create(true);
            },
            OpenExcl::MustCreate(_) => {
                options.create_new(true);
            },
            OpenExcl::MustExist => {},
        }

        if let Some(mode) = self.mode() {
            #[cfg(unix)]
            {
                use std::os::unix::fs::OpenOptionsExt;
                options.mode(u32::from(mode.bits()));
            }
            #[cfg(windows)]
            {
                use std::os::windows::fs::OpenOptionsExt;
                use windows_sys::Win32::Storage::FileSystem::FILE_ATTRIBUTE_READONLY;
                if !mode.owner_write() {
                    options.attributes(FILE_ATTRIBUTE_READONLY);
                }
            }
            #[cfg(not(any(unix, windows)))]
            let _ = mode;
        }
        options
    }
}

impl Default for OpenExcl {
    fn default() -> Self {
        OpenExcl::MaybeCreate(Mode::DEFAULT_FILE)
    }
}
