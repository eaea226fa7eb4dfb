use crate::fs::Result;
use crate::fs::path::{self, Flavor};

/// Resolves `path` against the current directory, without touching any component of `path`
/// itself.
///
/// `real_path` is the backend's real-path primitive. It is asked for `"."`, or for a bare drive
/// (`"C:"`) when `path` is drive-relative, in which case the drive's own current directory replaces
/// the drive prefix. A path rooted without a drive (`\foo`) is placed under the root of the current
/// directory's drive.
pub fn absolute_with<F>(path: &str, flavor: Flavor, real_path: F) -> Result<String>
where
    F: Fn(&str) -> Result<String>,
{
    let path = path::normalize(path, flavor);
    if path::is_absolute(&path, flavor) {
        return Ok(path);
    }

    let (base, rest) = match path::root_len(&path, flavor) {
        2 if flavor.is_windows() => (real_path(&path[..2])?, &path[2..]),
        1 => {
            let cwd = real_path(".")?;
            let drive_root = &cwd[..path::root_len(&cwd, flavor)];
            (drive_root.to_owned(), &path[1..])
        },
        _ => (real_path(".")?, path.as_str()),
    };

    Ok(path::join(&base, rest, flavor))
}

/// Resolves `path` to an absolute path free of `.` and `..` components, with every symlink on
/// its nearest existing ancestor resolved.
///
/// Components below the nearest existing ancestor are kept verbatim. An ancestor is skipped when
/// `real_path` reports it missing, not a directory or inaccessible; any other failure is returned.
/// If even the root cannot be resolved, the lexical candidate is returned as is.
pub fn canonical_with<F>(path: &str, flavor: Flavor, real_path: F) -> Result<String>
where
    F: Fn(&str) -> Result<String>,
{
    let absolute = absolute_with(path, flavor, &real_path)?;
    let candidate = path::normalize_lexically(&absolute, flavor);

    let mut prefix = candidate.as_str();
    loop {
        match real_path(prefix) {
            Ok(resolved) => {
                let suffix = candidate[prefix.len()..]
                    .trim_start_matches(|c: char| flavor.is_separator(c));
                return Ok(path::join(&resolved, suffix, flavor));
            },
            Err(error)
                if error.kind().is_file_not_found()
                    || error.kind().is_not_directory()
                    || error.kind().is_access_denied() =>
            {
                match path::dirname(prefix, flavor) {
                    Some(parent) => prefix = parent,
                    None => return Ok(candidate),
                }
            },
            Err(error) => return Err(error),
        }
    }
}
