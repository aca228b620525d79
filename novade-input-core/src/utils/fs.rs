//! Filesystem Utilities.
//!
//! Helper functions that map `std::io::Error` into [`CoreError`] so callers in
//! the config and logging layers can use `?` throughout.

use crate::error::CoreError;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Ensures that a directory exists at the given path.
///
/// Missing parents are created. A path that exists but is not a directory is
/// reported as [`CoreError::Filesystem`].
///
/// # Examples
///
/// ```no_run
/// # use novade_input_core::utils::fs::ensure_dir_exists;
/// # use tempfile::tempdir;
/// let temp_dir = tempdir().unwrap();
/// let dir_path = temp_dir.path().join("logs");
/// ensure_dir_exists(&dir_path).unwrap();
/// assert!(dir_path.is_dir());
/// ```
pub fn ensure_dir_exists(path: &Path) -> Result<(), CoreError> {
    if path.exists() {
        if !path.is_dir() {
            Err(CoreError::Filesystem {
                message: "Path exists but is not a directory".to_string(),
                path: path.to_path_buf(),
                source: std::io::Error::new(
                    ErrorKind::AlreadyExists, // Path is occupied by a non-dir
                    "Path exists but is not a directory",
                ),
            })
        } else {
            Ok(())
        }
    } else {
        fs::create_dir_all(path).map_err(|e| CoreError::Filesystem {
            message: "Failed to create directory".to_string(),
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Reads a file into a string, treating a missing file as `Ok(None)`.
///
/// Whitespace-only files are also reported as `None`, matching how the config
/// loader treats an empty file: "nothing configured here".
pub fn read_optional_to_string(path: &Path) -> Result<Option<String>, std::io::Error> {
    match fs::read_to_string(path) {
        Ok(content) if content.trim().is_empty() => Ok(None),
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_dir_exists_creates_nested() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a/b/c");
        assert!(ensure_dir_exists(&nested).is_ok());
        assert!(nested.is_dir());
        // Second call is a no-op.
        assert!(ensure_dir_exists(&nested).is_ok());
    }

    #[test]
    fn test_ensure_dir_exists_rejects_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("occupied");
        fs::write(&file_path, "x").unwrap();

        match ensure_dir_exists(&file_path) {
            Err(CoreError::Filesystem { path, .. }) => assert_eq!(path, file_path),
            other => panic!("Expected Filesystem error, got {:?}", other),
        }
    }

    #[test]
    fn test_read_optional_to_string() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.toml");
        assert!(read_optional_to_string(&missing).unwrap().is_none());

        let blank = temp_dir.path().join("blank.toml");
        fs::write(&blank, "  \n").unwrap();
        assert!(read_optional_to_string(&blank).unwrap().is_none());

        let full = temp_dir.path().join("full.toml");
        fs::write(&full, "[logging]\n").unwrap();
        assert_eq!(read_optional_to_string(&full).unwrap().as_deref(), Some("[logging]\n"));
    }
}
