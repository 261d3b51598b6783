use crate::error::{ProcessingError, Result};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Copy `source` into `dest_dir` as `name`, overwriting an older copy.
///
/// The modification time is carried over so the copy sorts like the original.
/// When the target already is the source file nothing is copied.
pub fn copy_to(source: &Path, dest_dir: &Path, name: &str) -> Result<PathBuf> {
    if !source.is_file() {
        return Err(ProcessingError::MissingSource(source.to_path_buf()));
    }

    let target = dest_dir.join(name);
    if is_same_file(source, &target) {
        debug!("{} is already in place", target.display());
        return Ok(target);
    }

    fs::copy(source, &target).map_err(|e| ProcessingError::CopyFailed {
        path: target.clone(),
        source: e,
    })?;

    if let Err(e) = preserve_mtime(source, &target) {
        debug!("Could not carry mtime over to {}: {}", target.display(), e);
    }

    Ok(target)
}

/// `fs::copy` onto its own source truncates it, so both sides are resolved first
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn preserve_mtime(source: &Path, target: &Path) -> io::Result<()> {
    let modified = fs::metadata(source)?.modified()?;
    File::options().write(true).open(target)?.set_modified(modified)
}

/// Rename `source` to `new_name` within its own folder.
///
/// Refuses to replace a different existing file.
pub fn rename_in_place(source: &Path, new_name: &str) -> Result<PathBuf> {
    if !source.is_file() {
        return Err(ProcessingError::MissingSource(source.to_path_buf()));
    }

    let target = source
        .parent()
        .map(|dir| dir.join(new_name))
        .unwrap_or_else(|| PathBuf::from(new_name));

    if target == source {
        return Ok(target);
    }
    if target.exists() {
        return Err(ProcessingError::CopyFailed {
            path: target.clone(),
            source: io::Error::new(io::ErrorKind::AlreadyExists, "target already exists"),
        });
    }

    fs::rename(source, &target).map_err(|e| ProcessingError::CopyFailed {
        path: target.clone(),
        source: e,
    })?;

    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_copy_to() -> Result<()> {
        let src_dir = TempDir::new()?;
        let dest_dir = TempDir::new()?;
        let source = src_dir.path().join("IMG_1.JPG");
        fs::write(&source, b"jpeg bytes")?;

        let target = copy_to(&source, dest_dir.path(), "Unit4.jpg")?;

        assert_eq!(target, dest_dir.path().join("Unit4.jpg"));
        assert_eq!(fs::read(&target)?, b"jpeg bytes");
        assert!(source.exists());
        assert_eq!(
            fs::metadata(&source)?.modified()?,
            fs::metadata(&target)?.modified()?
        );
        Ok(())
    }

    #[test]
    fn test_copy_missing_source() {
        let dest_dir = TempDir::new().unwrap();
        let result = copy_to(Path::new("/nonexistent/a.jpg"), dest_dir.path(), "a.jpg");
        assert!(matches!(result, Err(ProcessingError::MissingSource(_))));
    }

    #[test]
    fn test_copy_into_missing_dir_fails() {
        let src_dir = TempDir::new().unwrap();
        let source = src_dir.path().join("a.jpg");
        fs::write(&source, b"x").unwrap();

        let result = copy_to(&source, &src_dir.path().join("nope"), "a.jpg");
        assert!(matches!(result, Err(ProcessingError::CopyFailed { .. })));
    }

    #[test]
    fn test_copy_onto_itself_keeps_bytes() -> Result<()> {
        let dir = TempDir::new()?;
        let source = dir.path().join("IMG_1.JPG");
        fs::write(&source, b"twenty bytes of jpeg")?;

        let target = copy_to(&source, dir.path(), "IMG_1.JPG")?;

        assert_eq!(target, source);
        assert_eq!(fs::read(&source)?, b"twenty bytes of jpeg");

        // Same file reached through a different spelling of the folder
        let dotted = dir.path().join(".");
        copy_to(&source, &dotted, "IMG_1.JPG")?;
        assert_eq!(fs::read(&source)?, b"twenty bytes of jpeg");
        Ok(())
    }

    #[test]
    fn test_rename_in_place() -> Result<()> {
        let dir = TempDir::new()?;
        let source = dir.path().join("IMG_1.JPG");
        fs::write(&source, b"x")?;
        fs::write(dir.path().join("taken.jpg"), b"y")?;

        assert!(matches!(
            rename_in_place(&source, "taken.jpg"),
            Err(ProcessingError::CopyFailed { .. })
        ));

        let target = rename_in_place(&source, "Unit4.jpg")?;
        assert_eq!(target, dir.path().join("Unit4.jpg"));
        assert!(!source.exists());
        assert!(target.exists());
        Ok(())
    }
}
