#![cfg(test)]

use super::*;
use crate::fs::path::SYS_DIR_SEP;

#[test]
fn test_new_normalizes() {
    let file = File::new(format!("a{SYS_DIR_SEP}{SYS_DIR_SEP}b{SYS_DIR_SEP}"));
    assert_eq!(file.path(), format!("a{SYS_DIR_SEP}b"));
    assert_eq!(
        file,
        File::from(format!("a{SYS_DIR_SEP}b")),
        "Equality should follow the normalized path."
    );
}

#[test]
fn test_components() {
    let file = File::new("dir").resolve("sub").resolve("name.txt");
    assert_eq!(file.name(), "name.txt");
    assert_eq!(file.parent(), Some(format!("dir{SYS_DIR_SEP}sub").as_str()));
    assert_eq!(file.parent_file().map(|p| p.name().to_owned()), Some("sub".to_owned()));
    assert_eq!(File::new("single").parent(), None);
    assert!(!file.is_absolute());
}

#[test]
fn test_normalize_is_lexical() {
    let file = File::new("a").resolve("..").resolve("b").resolve(".");
    assert_eq!(file.normalize().path(), "b");
    assert_eq!(File::new("a").resolve("..").normalize().path(), ".");
}

#[cfg(unix)]
#[test]
fn test_posix_paths() {
    let root = File::new("/");
    assert!(root.is_absolute());
    assert_eq!(root.name(), "");
    assert_eq!(root.parent(), None);
    assert_eq!(root.resolve("etc").path(), "/etc");
    assert_eq!(
        File::new("/tmp").resolve("/var/log").path(),
        "/var/log",
        "An absolute child should replace the parent."
    );
    assert_eq!(File::new("/a/b").to_string(), "/a/b");
}

#[test]
fn test_absolute_resolves_against_current_dir() {
    let absolute = File::new("some-relative-name").absolute().expect("cwd should resolve");
    assert!(absolute.is_absolute(), "{absolute} should be absolute");
    assert_eq!(absolute.name(), "some-relative-name");
}
