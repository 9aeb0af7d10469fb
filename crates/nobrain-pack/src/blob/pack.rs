//! Build a blob from files on disk

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::Blob;
use crate::error::{PackError, Stage};

/// Pack a file or a directory tree into a blob.
///
/// A single file becomes one entry named after the file. A directory is
/// walked recursively and every regular file becomes an entry whose id is its
/// path relative to `root`, separated by `/`. Entries are added in sorted
/// path order so the same tree always produces the same blob.
pub fn pack_path(root: &Path) -> Result<Blob, PackError> {
    let meta = fs::symlink_metadata(root).map_err(PackError::io(Stage::ReadInput))?;

    let mut blob = Blob::new();
    if meta.is_dir() {
        let mut files = Vec::new();
        collect_files(root, &mut files)?;
        files.sort();
        for path in files {
            let id = relative_id(root, &path);
            let data = fs::read(&path).map_err(PackError::io(Stage::ReadInput))?;
            blob.append(id, &data);
        }
    } else {
        let id = root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let data = fs::read(root).map_err(PackError::io(Stage::ReadInput))?;
        blob.append(id, &data);
    }

    debug!(root = %root.display(), entries = blob.item_count(), "packed path");
    Ok(blob)
}

/// Recursively collect every file under `dir`.
///
/// Symlinks to files are followed; symlinked directories are skipped so a
/// link cycle cannot recurse forever.
pub fn collect_files(dir: &Path, results: &mut Vec<PathBuf>) -> Result<(), PackError> {
    let entries = fs::read_dir(dir).map_err(PackError::io(Stage::WalkDirectory))?;
    for entry in entries {
        let entry = entry.map_err(PackError::io(Stage::WalkDirectory))?;
        let path = entry.path();
        let file_type = entry
            .file_type()
            .map_err(PackError::io(Stage::WalkDirectory))?;

        if file_type.is_dir() {
            collect_files(&path, results)?;
        } else if file_type.is_symlink() {
            match fs::metadata(&path) {
                Ok(target) if target.is_file() => results.push(path),
                Ok(_) => warn!(path = %path.display(), "skipping symlinked directory"),
                Err(err) => warn!(path = %path.display(), %err, "skipping broken symlink"),
            }
        } else if file_type.is_file() {
            results.push(path);
        }
    }
    Ok(())
}

/// Id of `path` relative to `root`, using `/` as separator.
pub fn relative_id(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
