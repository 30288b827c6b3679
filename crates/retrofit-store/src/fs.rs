//! Whole-file read and write helpers shared by the stores.

use std::io::{ErrorKind, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::StoreError;

/// Read `path` as UTF-8, `None` when the file does not exist.
pub(crate) fn read_optional(path: &Path) -> Result<Option<String>, StoreError> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StoreError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Replace `path` with `contents` in one step.
///
/// Writes a sibling temp file and renames it over the target, so a reader
/// never sees a partially written file. Missing parent directories are
/// created.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> Result<(), StoreError> {
    let write_err = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(write_err)?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(contents.as_bytes()).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn read_missing_is_none() {
        let tmp = TempDir::new().unwrap();
        assert!(read_optional(&tmp.path().join("absent.md")).unwrap().is_none());
    }

    #[test]
    fn write_creates_parents_and_replaces() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/dir/file.txt");
        write_atomic(&path, "first").unwrap();
        write_atomic(&path, "second").unwrap();
        assert_eq!(read_optional(&path).unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn write_failure_carries_path() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "a file, not a directory").unwrap();
        let target = blocker.join("child.json");

        let err = write_atomic(&target, "{}").unwrap_err();
        match err {
            StoreError::Write { path, .. } => assert_eq!(path, target),
            other => panic!("expected write error, got {other:?}"),
        }
    }

    #[test]
    fn reading_a_directory_is_an_error() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            read_optional(tmp.path()),
            Err(StoreError::Read { .. })
        ));
    }
}
