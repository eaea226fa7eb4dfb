use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::fs::{ErrorKind, FsError};


/// Permission bits decoded from a 3-digit octal string such as `"755"`.
///
/// Digit positions are owner, group and other; each digit is the bitwise OR of read (`4`),
/// write (`2`) and execute (`1`).
///
/// Backends that only model a read-only attribute accept every mode, but only
/// [`owner_write`](Mode::owner_write) has an observable effect on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Mode(u16);

impl Mode {
    pub const DEFAULT_DIR: Mode = Mode(0o777);
    pub const DEFAULT_FILE: Mode = Mode(0o666);

    pub const OWNER_READ: u16 = 0o400;
    pub const OWNER_WRITE: u16 = 0o200;
    pub const OWNER_EXECUTE: u16 = 0o100;
    pub const GROUP_READ: u16 = 0o040;
    pub const GROUP_WRITE: u16 = 0o020;
    pub const GROUP_EXECUTE: u16 = 0o010;
    pub const OTHER_READ: u16 = 0o004;
    pub const OTHER_WRITE: u16 = 0o002;
    pub const OTHER_EXECUTE: u16 = 0o001;

    /// Returns [`None`] if any bit outside of `0o777` is set.
    pub const fn from_bits(bits: u16) -> Option<Mode> {
        if bits & !0o777 == 0 {
            Some(Mode(bits))
        } else {
            None
        }
    }

    /// Keeps only the permission bits of a raw `st_mode`-like value.
    pub const fn from_bits_truncate(bits: u32) -> Mode {
        Mode((bits & 0o777) as u16)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn contains(self, bits: u16) -> bool {
        self.0 & bits == bits
    }

    pub const fn owner(self) -> u8 {
        ((self.0 >> 6) & 0o7) as u8
    }

    pub const fn group(self) -> u8 {
        ((self.0 >> 3) & 0o7) as u8
    }

    pub const fn other(self) -> u8 {
        (self.0 & 0o7) as u8
    }

    /// Whether the owner-write bit is set; the only bit read-only-attribute backends observe.
    pub const fn owner_write(self) -> bool {
        self.contains(Mode::OWNER_WRITE)
    }
}

impl FromStr for Mode {
    type Err = FsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            FsError::new(ErrorKind::IllegalArgument)
                .with_reason(format!("mode must be 3 octal digits, found {s:?}"))
        };

        let bytes = s.as_bytes();
        if bytes.len() != 3 {
            Err(invalid())?
        }

        let mut bits = 0;
        for digit in bytes {
            match digit {
                b'0'..=b'7' => bits = (bits << 3) | u16::from(digit - b'0'),
                _ => Err(invalid())?,
            }
        }
        Ok(Mode(bits))
    }
}

impl TryFrom<&str> for Mode {
    type Error = FsError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:03o}", self.0)
    }
}
