//! Pure path-string algorithms.
//!
//! Every function takes a [`Flavor`] so that both naming conventions can be used (and tested) on
//! any host. Functions other than [`normalize`] expect their input to already be normalized for the
//! given flavor, which is always the case for the path held by a [`File`](crate::fs::File).

use derive_more::IsVariant;

mod resolve;
mod tests;

pub use resolve::*;

/// A path naming convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IsVariant)]
pub enum Flavor {
    /// A single root `/`, separator `/`.
    Posix,
    /// Roots are `X:\`, `X:` (drive-relative), `\\server\share` (UNC) and `\` (rooted on the
    /// current drive). Both `\` and `/` are accepted as separators; `\` is written.
    Windows,
}

impl Flavor {
    #[cfg(windows)]
    pub const HOST: Flavor = Flavor::Windows;
    #[cfg(not(windows))]
    pub const HOST: Flavor = Flavor::Posix;

    pub const fn separator(self) -> char {
        match self {
            Flavor::Posix => '/',
            Flavor::Windows => '\\',
        }
    }

    /// The separator used between entries of a path list, such as `PATH`.
    pub const fn path_separator(self) -> char {
        match self {
            Flavor::Posix => ':',
            Flavor::Windows => ';',
        }
    }

    pub const fn is_separator(self, c: char) -> bool {
        match self {
            Flavor::Posix => c == '/',
            Flavor::Windows => c == '\\' || c == '/',
        }
    }
}

pub const SYS_DIR_SEP: char = Flavor::HOST.separator();
pub const SYS_PATH_SEP: char = Flavor::HOST.path_separator();

fn has_unc_prefix(path: &str, flavor: Flavor) -> bool {
    let mut chars = path.chars();
    flavor.is_windows()
        && chars.next().is_some_and(|c: char| flavor.is_separator(c))
        && chars.next().is_some_and(|c: char| flavor.is_separator(c))
}

fn has_drive_prefix(path: &str, flavor: Flavor) -> bool {
    let bytes = path.as_bytes();
    flavor.is_windows() && bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Rewrites separators to the flavor's own, collapses separator runs and drops a trailing
/// separator that is not part of the root.
///
/// The double separator that introduces a UNC root is kept.
pub fn normalize(path: &str, flavor: Flavor) -> String {
    let sep = flavor.separator();
    let mut out = String::with_capacity(path.len());
    let mut rest = path;

    if has_unc_prefix(path, flavor) {
        out.push(sep);
        out.push(sep);
        rest = path.trim_start_matches(|c: char| flavor.is_separator(c));
    }

    let mut prev_sep = false;
    for c in rest.chars() {
        if flavor.is_separator(c) {
            if !prev_sep {
                out.push(sep);
            }
            prev_sep = true;
        } else {
            out.push(c);
            prev_sep = false;
        }
    }

    if out.len() > root_len(&out, flavor) && out.ends_with(sep) {
        out.pop();
    }
    out
}

/// The length in bytes of the root component of `path`, or `0` for a relative path.
///
/// A UNC root covers `\\server\share` without the separator that follows it.
pub fn root_len(path: &str, flavor: Flavor) -> usize {
    let is_sep = |c: char| flavor.is_separator(c);

    if has_unc_prefix(path, flavor) {
        let server_end = path[2..].find(is_sep).map_or(path.len(), |i| i + 2);
        if server_end == path.len() {
            return path.len();
        }
        let share_start = server_end + 1;
        return path[share_start..]
            .find(is_sep)
            .map_or(path.len(), |i| i + share_start);
    }

    if has_drive_prefix(path, flavor) {
        return match path[2..].chars().next() {
            Some(c) if is_sep(c) => 3,
            _ => 2,
        };
    }

    match path.chars().next() {
        Some(c) if is_sep(c) => 1,
        _ => 0,
    }
}

/// Whether `path` names the same entry regardless of the current directory.
///
/// On [`Flavor::Windows`] a bare drive (`C:foo`) and a rooted path without a drive (`\foo`) are
/// both relative.
pub fn is_absolute(path: &str, flavor: Flavor) -> bool {
    match flavor {
        Flavor::Posix => path.starts_with('/'),
        Flavor::Windows => has_unc_prefix(path, flavor) || root_len(path, flavor) == 3,
    }
}

/// The final component of `path`: `path` itself when it has no separator, and the empty string
/// for a bare root.
pub fn basename(path: &str, flavor: Flavor) -> &str {
    let rest = &path[root_len(path, flavor)..];
    match rest.rfind(|c: char| flavor.is_separator(c)) {
        Some(i) => &rest[i + 1..],
        None => rest,
    }
}

/// Everything before the final component of `path`, or [`None`] for a root, an empty path or a
/// single relative component.
pub fn dirname(path: &str, flavor: Flavor) -> Option<&str> {
    let root = root_len(path, flavor);
    let rest = &path[root..];
    if rest.is_empty() {
        return None;
    }

    match rest.rfind(|c: char| flavor.is_separator(c)) {
        Some(i) => Some(&path[..root + i]),
        None if root > 0 => Some(&path[..root]),
        None => None,
    }
}

/// Resolves `child` against `parent`. A child with any root replaces the parent entirely.
pub fn join(parent: &str, child: &str, flavor: Flavor) -> String {
    if child.is_empty() {
        return normalize(parent, flavor);
    }
    if parent.is_empty() || root_len(child, flavor) > 0 {
        return normalize(child, flavor);
    }

    let bare_drive = has_drive_prefix(parent, flavor) && parent.len() == 2;
    let needs_sep = !bare_drive && !parent.ends_with(|c: char| flavor.is_separator(c));

    let mut joined = String::with_capacity(parent.len() + child.len() + 1);
    joined.push_str(parent);
    if needs_sep {
        joined.push(flavor.separator());
    }
    joined.push_str(child);
    normalize(&joined, flavor)
}

/// Collapses `.` and `..` components without touching the filesystem.
///
/// `..` never climbs above a root. A relative path keeps the leading `..` components it cannot
/// collapse, and becomes `.` if nothing else remains.
pub fn normalize_lexically(path: &str, flavor: Flavor) -> String {
    let path = normalize(path, flavor);
    let root_end = root_len(&path, flavor);
    let root = &path[..root_end];
    let keeps_parent_refs = root.is_empty() || (root.len() == 2 && has_drive_prefix(root, flavor));

    let mut parts: Vec<&str> = Vec::new();
    for part in path[root_end..].split(|c: char| flavor.is_separator(c)) {
        match part {
            "" | "." => {},
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                },
                _ if keeps_parent_refs => parts.push(".."),
                _ => {},
            },
            part => parts.push(part),
        }
    }

    let joined = join(root, &parts.join(&flavor.separator().to_string()), flavor);
    if joined.is_empty() {
        String::from(".")
    } else {
        joined
    }
}
