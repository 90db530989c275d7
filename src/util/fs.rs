use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::errors::BuildError;

/// Read a whole file, tagging the error with its path.
pub fn read_file(p: &Path) -> Result<Vec<u8>, BuildError> {
    fs::read(p).map_err(|e| BuildError::io(p, e))
}

/// Write a file, creating parent directories as needed.
pub fn write_file(p: &Path, content: &[u8]) -> Result<(), BuildError> {
    if let Some(parent) = p.parent() {
        fs::create_dir_all(parent).map_err(|e| BuildError::io(parent, e))?;
    }
    fs::write(p, content).map_err(|e| BuildError::io(p, e))
}

/// Remove a directory (if present) and create it again empty.
pub fn recreate_dir(p: &Path) -> Result<(), BuildError> {
    if p.exists() {
        fs::remove_dir_all(p).map_err(|e| BuildError::io(p, e))?;
    }
    fs::create_dir_all(p).map_err(|e| BuildError::io(p, e))
}

/// Recursively copy `src` into `dst`, merging with whatever `dst` already holds.
///
/// Directory structure and permission bits are preserved; symlinks are followed.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<(), BuildError> {
    let meta = fs::metadata(src).map_err(|e| BuildError::io(src, e))?;
    if !meta.is_dir() {
        return copy_file(src, dst, &meta);
    }

    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            BuildError::io(&path, e.into())
        })?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| BuildError::InvalidArgument(e.to_string()))?;
        let target = dst.join(rel);
        let meta = entry.metadata().map_err(|e| {
            let path = entry.path().to_path_buf();
            BuildError::io(&path, e.into())
        })?;
        if meta.is_dir() {
            fs::create_dir_all(&target).map_err(|e| BuildError::io(&target, e))?;
            fs::set_permissions(&target, meta.permissions())
                .map_err(|e| BuildError::io(&target, e))?;
        } else {
            copy_file(entry.path(), &target, &meta)?;
        }
    }
    Ok(())
}

fn copy_file(src: &Path, dst: &Path, meta: &fs::Metadata) -> Result<(), BuildError> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent).map_err(|e| BuildError::io(parent, e))?;
    }
    fs::copy(src, dst).map_err(|e| BuildError::io(src, e))?;
    fs::set_permissions(dst, meta.permissions()).map_err(|e| BuildError::io(dst, e))
}
