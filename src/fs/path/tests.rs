#![cfg(test)]

use std::cell::RefCell;

use super::*;
use crate::fs::{ErrorKind, File, FsError, Result};

use Flavor::*;

#[test]
fn test_normalize_posix() {
    let cases = [
        ("", ""),
        ("/", "/"),
        ("//", "/"),
        ("/a//b///c/", "/a/b/c"),
        ("a/b/", "a/b"),
        ("a\\b", "a\\b"),
    ];
    for (input, expected) in cases {
        assert_eq!(normalize(input, Posix), expected, "normalize({input:?})");
    }
}

#[test]
fn test_normalize_windows() {
    let cases = [
        ("C:/", "C:\\"),
        ("C:", "C:"),
        ("C:/Users//me/", "C:\\Users\\me"),
        ("//server/share/dir/", "\\\\server\\share\\dir"),
        ("\\\\\\server\\share", "\\\\server\\share"),
        ("\\\\server\\share\\", "\\\\server\\share"),
        ("/", "\\"),
        ("a/b\\c", "a\\b\\c"),
    ];
    for (input, expected) in cases {
        assert_eq!(normalize(input, Windows), expected, "normalize({input:?})");
    }
}

#[test]
fn test_absoluteness() {
    assert!(is_absolute("/", Posix));
    assert!(is_absolute("/a", Posix));
    assert!(!is_absolute("a/b", Posix));
    assert!(!is_absolute("C:\\a", Posix), "Drive letters mean nothing to POSIX paths.");

    assert!(is_absolute("C:\\", Windows));
    assert!(is_absolute("c:\\a", Windows));
    assert!(is_absolute("\\\\server\\share", Windows));
    assert!(
        !is_absolute("C:", Windows),
        "A bare drive letter is relative to that drive's current directory."
    );
    assert!(!is_absolute("C:a", Windows));
    assert!(!is_absolute("\\a", Windows), "A rooted path without a drive is not absolute.");
    assert!(!is_absolute("a", Windows));
}

#[test]
fn test_roots() {
    assert_eq!(root_len("/a", Posix), 1);
    assert_eq!(root_len("a", Posix), 0);
    assert_eq!(root_len("C:\\a", Windows), 3);
    assert_eq!(root_len("C:a", Windows), 2);
    assert_eq!(root_len("\\a", Windows), 1);
    assert_eq!(root_len("\\\\server\\share\\a", Windows), "\\\\server\\share".len());
    assert_eq!(root_len("\\\\server", Windows), "\\\\server".len());
    assert_eq!(root_len("1:\\a", Windows), 0, "Only letters name drives.");
}

#[test]
fn test_basename_and_dirname_posix() {
    let cases = [
        ("/a/b/c", "c", Some("/a/b")),
        ("/a", "a", Some("/")),
        ("/", "", None),
        ("a/b", "b", Some("a")),
        ("file", "file", None),
        ("", "", None),
    ];
    for (path, name, parent) in cases {
        assert_eq!(basename(path, Posix), name, "basename({path:?})");
        assert_eq!(dirname(path, Posix), parent, "dirname({path:?})");
    }
}

#[test]
fn test_basename_and_dirname_windows() {
    let cases = [
        ("C:\\a\\b", "b", Some("C:\\a")),
        ("C:\\a", "a", Some("C:\\")),
        ("C:\\", "", None),
        ("C:a", "a", Some("C:")),
        ("\\\\srv\\share\\x", "x", Some("\\\\srv\\share")),
        ("\\\\srv\\share", "", None),
        ("\\a", "a", Some("\\")),
    ];
    for (path, name, parent) in cases {
        assert_eq!(basename(path, Windows), name, "basename({path:?})");
        assert_eq!(dirname(path, Windows), parent, "dirname({path:?})");
    }
}

#[test]
fn test_join() {
    assert_eq!(join("/a", "b/c", Posix), "/a/b/c");
    assert_eq!(join("/", "b", Posix), "/b");
    assert_eq!(join("/a", "/b", Posix), "/b", "An absolute child replaces the parent.");
    assert_eq!(join("/a", "", Posix), "/a");
    assert_eq!(join("", "b", Posix), "b");

    assert_eq!(join("C:\\a", "b", Windows), "C:\\a\\b");
    assert_eq!(join("C:", "b", Windows), "C:b", "Joining onto a bare drive stays drive-relative.");
    assert_eq!(join("C:\\a", "D:\\b", Windows), "D:\\b");
    assert_eq!(join("\\\\srv\\share", "x/y", Windows), "\\\\srv\\share\\x\\y");
}

#[test]
fn test_normalize_lexically() {
    let posix = [
        ("/a/./b/../c", "/a/c"),
        ("/../..", "/"),
        ("/a/b/../../..", "/"),
        ("a/../..", ".."),
        ("../a/./b/..", "../a"),
        ("./", "."),
        ("a/..", "."),
    ];
    for (input, expected) in posix {
        assert_eq!(normalize_lexically(input, Posix), expected, "normalize_lexically({input:?})");
    }

    let windows = [
        ("C:\\a\\..\\..\\b", "C:\\b"),
        ("C:..\\a", "C:..\\a"),
        ("\\\\srv\\share\\a\\..\\..", "\\\\srv\\share"),
        ("\\a\\..\\..", "\\"),
    ];
    for (input, expected) in windows {
        assert_eq!(normalize_lexically(input, Windows), expected, "normalize_lexically({input:?})");
    }
}

/// A real-path primitive over a fixed set of existing directories, with `/link` pointing to
/// `/target`.
fn fake_real_path(path: &str) -> Result<String> {
    let existing = ["/", "/work", "/target", "/target/sub"];
    let resolved = match path {
        "." => "/work".to_owned(),
        "/link" => "/target".to_owned(),
        p if p.starts_with("/link/") => format!("/target/{}", &p["/link/".len()..]),
        p => p.to_owned(),
    };

    if existing.contains(&resolved.as_str()) {
        Ok(resolved)
    } else {
        Err(FsError::new(ErrorKind::FileNotFound).with_file(&File::new(path)))
    }
}

#[test]
fn test_absolute_with() {
    assert_eq!(absolute_with("/x/y", Posix, fake_real_path), Ok("/x/y".to_owned()));
    assert_eq!(absolute_with("x/y", Posix, fake_real_path), Ok("/work/x/y".to_owned()));
    assert_eq!(absolute_with("", Posix, fake_real_path), Ok("/work".to_owned()));
}

#[test]
fn test_absolute_with_drive_relative() {
    let asked = RefCell::new(Vec::new());
    let real_path = |path: &str| -> Result<String> {
        asked.borrow_mut().push(path.to_owned());
        match path {
            "D:" => Ok("D:\\projects".to_owned()),
            "." => Ok("C:\\Users\\me".to_owned()),
            _ => Err(FsError::new(ErrorKind::FileNotFound)),
        }
    };

    assert_eq!(
        absolute_with("D:src/lib", Windows, real_path),
        Ok("D:\\projects\\src\\lib".to_owned())
    );
    assert_eq!(absolute_with("D:", Windows, real_path), Ok("D:\\projects".to_owned()));
    assert_eq!(absolute_with("\\tmp", Windows, real_path), Ok("C:\\tmp".to_owned()));
    assert_eq!(absolute_with("rel", Windows, real_path), Ok("C:\\Users\\me\\rel".to_owned()));
    assert_eq!(absolute_with("E:\\x", Windows, real_path), Ok("E:\\x".to_owned()));
    assert_eq!(
        *asked.borrow(),
        ["D:", "D:", ".", "."],
        "Only the drive's own directory should be resolved for drive-relative paths."
    );
}

#[test]
fn test_canonical_with_splices_resolved_prefix() {
    assert_eq!(
        canonical_with("/link/sub/missing/../new/file", Posix, fake_real_path),
        Ok("/target/sub/new/file".to_owned())
    );
    assert_eq!(canonical_with("/link", Posix, fake_real_path), Ok("/target".to_owned()));
    assert_eq!(
        canonical_with("rel/../other", Posix, fake_real_path),
        Ok("/work/other".to_owned())
    );
}

#[test]
fn test_canonical_with_is_idempotent() {
    for path in ["/link/sub/x/y", "/link/../work", "nothing/here", "/", "/target/./sub"] {
        let once = canonical_with(path, Posix, fake_real_path);
        let twice = once.clone().and_then(|p| canonical_with(&p, Posix, fake_real_path));
        assert_eq!(once, twice, "canonicalizing {path:?} twice should change nothing");
    }
}

#[test]
fn test_canonical_with_skips_and_propagates() {
    let real_path = |path: &str| -> Result<String> {
        match path {
            "." => Ok("/".to_owned()),
            "/" => Ok("/".to_owned()),
            "/denied" => Err(FsError::new(ErrorKind::AccessDenied)),
            "/denied/x" => Err(FsError::new(ErrorKind::NotDirectory)),
            "/broken" | "/broken/x" => Err(FsError::new(ErrorKind::Io).with_reason("device error")),
            _ => Err(FsError::new(ErrorKind::FileNotFound)),
        }
    };

    assert_eq!(
        canonical_with("/denied/x", Posix, real_path),
        Ok("/denied/x".to_owned()),
        "Inaccessible and non-directory ancestors should be walked past."
    );
    assert_eq!(
        canonical_with("/broken/x", Posix, real_path).map_err(|e| e.kind()),
        Err(ErrorKind::Io),
        "Any other failure should be propagated."
    );
}

#[test]
fn test_canonical_with_unresolvable_root() {
    let real_path = |path: &str| -> Result<String> {
        match path {
            "." => Ok("/".to_owned()),
            _ => Err(FsError::new(ErrorKind::FileNotFound)),
        }
    };
    assert_eq!(canonical_with("/a/b", Posix, real_path), Ok("/a/b".to_owned()));
}
