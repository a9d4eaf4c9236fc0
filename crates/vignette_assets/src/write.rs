//! Atomic file writes.

use std::fs;
use std::io::Write;
use std::path::Path;

use vignette_error::{AssetError, AssetErrorKind, VignetteResult};

/// Write `bytes` to `path` through a temporary file in the same directory.
///
/// The rename at the end is atomic on the platforms we target, so a reader
/// never observes a partially written file at `path`.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the
/// temporary file cannot be written or renamed into place.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> VignetteResult<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)
        .map_err(|e| AssetError::new(AssetErrorKind::DirectoryCreation(e.to_string())))?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)
        .map_err(|e| AssetError::new(AssetErrorKind::FileWrite(e.to_string())))?;

    temp.write_all(bytes)
        .map_err(|e| AssetError::new(AssetErrorKind::FileWrite(e.to_string())))?;

    temp.persist(path).map_err(|e| {
        AssetError::new(AssetErrorKind::FileWrite(format!(
            "{}: {}",
            path.display(),
            e
        )))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_and_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested/deeper/file.txt");

        write_atomic(&target, b"content").unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"content");
    }

    #[test]
    fn overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("file.txt");

        write_atomic(&target, b"first").unwrap();
        write_atomic(&target, b"second").unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"second");
    }

    #[test]
    fn leaves_no_temp_files_behind() {
        let dir = tempfile::tempdir().unwrap();
        write_atomic(&dir.path().join("file.txt"), b"x").unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }
}
