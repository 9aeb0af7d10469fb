//! File output helpers.

use std::fs::{self, File, Permissions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{PackError, Stage};

/// Write a file by filling a temporary sibling and renaming it into place.
///
/// Readers never observe a half-written `path`. On failure the temporary
/// file is removed and `path` is left untouched.
pub(crate) fn write_atomic<F>(
    path: &Path,
    permissions: Option<Permissions>,
    fill: F,
) -> Result<(), PackError>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<(), PackError>,
{
    let tmp_path = temp_sibling(path);
    let result = write_then_rename(path, &tmp_path, permissions, fill);
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

fn write_then_rename<F>(
    path: &Path,
    tmp_path: &Path,
    permissions: Option<Permissions>,
    fill: F,
) -> Result<(), PackError>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<(), PackError>,
{
    let file = File::create(tmp_path).map_err(PackError::io(Stage::WriteOutput))?;
    let mut writer = BufWriter::new(file);
    fill(&mut writer)?;
    writer.flush().map_err(PackError::io(Stage::WriteOutput))?;
    let file = writer
        .into_inner()
        .map_err(|e| PackError::io(Stage::WriteOutput)(e.into_error()))?;
    file.sync_all().map_err(PackError::io(Stage::WriteOutput))?;
    drop(file);

    if let Some(permissions) = permissions {
        fs::set_permissions(tmp_path, permissions).map_err(PackError::io(Stage::WriteOutput))?;
    }
    fs::rename(tmp_path, path).map_err(PackError::io(Stage::WriteOutput))
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.{}.tmp", name, std::process::id()))
}
