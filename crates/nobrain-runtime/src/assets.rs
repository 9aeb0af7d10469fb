//! Asset resolution
//!
//! Gives the game one way to load assets by name in both build flavors:
//! - **DiskBacked**: loose files under a development folder (e.g. `rsc/`)
//! - **Embedded**: a blob appended to the running executable as a payload
//!
//! Names are normalized before lookup: forward slashes, no leading `./`.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Component, Path, PathBuf};

use nobrain_pack::blob::{self, BlobReader, Section};
use nobrain_pack::payload::{self, PayloadReader};
use tempfile::TempDir;
use tracing::{debug, info};

use crate::config::AssetsConfig;
use crate::error::AssetError;

/// Where assets are loaded from.
#[derive(Debug)]
pub enum Assets {
    /// Dev mode: files live on disk under this folder, read on demand.
    DiskBacked(PathBuf),

    /// Bundle mode: a blob inside the executable's payload, read lazily.
    Embedded(BlobReader<PayloadReader>),
}

/// Reader over one asset.
#[derive(Debug)]
pub enum AssetReader<'a> {
    File(File),
    Embedded(Section<'a, PayloadReader>),
}

impl Read for AssetReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            AssetReader::File(file) => file.read(buf),
            AssetReader::Embedded(section) => section.read(buf),
        }
    }
}

impl Seek for AssetReader<'_> {
    fn seek(&mut self, from: SeekFrom) -> io::Result<u64> {
        match self {
            AssetReader::File(file) => file.seek(from),
            AssetReader::Embedded(section) => section.seek(from),
        }
    }
}

impl Assets {
    /// Pick the asset source for the running executable.
    ///
    /// Uses the appended payload when there is one and falls back to
    /// `config.dev_dir` otherwise. A payload that is present but malformed
    /// is an error; the game cannot run without its assets.
    pub fn detect(config: &AssetsConfig) -> Result<Self, AssetError> {
        if config.payload {
            if let Some(reader) = payload::open()? {
                return Self::from_payload(reader);
            }
        }
        Ok(Self::disk(&config.dev_dir))
    }

    /// Like [`Assets::detect`] for an arbitrary executable.
    pub fn detect_at(exe: &Path, config: &AssetsConfig) -> Result<Self, AssetError> {
        if config.payload {
            if let Some(reader) = payload::open_at(exe)? {
                return Self::from_payload(reader);
            }
        }
        Ok(Self::disk(&config.dev_dir))
    }

    pub fn disk(root: &Path) -> Self {
        info!(root = %root.display(), "loading assets from disk");
        Assets::DiskBacked(root.to_path_buf())
    }

    /// Open the blob stored in `reader`.
    pub fn from_payload(reader: PayloadReader) -> Result<Self, AssetError> {
        let blob = BlobReader::open(reader)?;
        info!(entries = blob.item_count(), "loading assets from payload");
        Ok(Assets::Embedded(blob))
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self, Assets::Embedded(_))
    }

    /// Open an asset by name.
    ///
    /// Returns `None` if there is no such asset.
    pub fn open(&self, name: &str) -> Result<Option<AssetReader<'_>>, AssetError> {
        let name = normalize_path(name);
        match self {
            Assets::DiskBacked(root) => {
                let path = root.join(safe_relative(&name)?);
                if !path.is_file() {
                    return Ok(None);
                }
                Ok(Some(AssetReader::File(File::open(path)?)))
            }
            Assets::Embedded(blob) => Ok(blob.get_by_id(&name).map(AssetReader::Embedded)),
        }
    }

    /// Read a whole asset into memory.
    pub fn read(&self, name: &str) -> Result<Option<Vec<u8>>, AssetError> {
        let Some(mut reader) = self.open(name)? else {
            return Ok(None);
        };
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Ok(Some(data))
    }

    /// Read an asset as UTF-8 text.
    ///
    /// `None` means there is no such asset; an asset that is not UTF-8 is an
    /// [`AssetError::Utf8`] error.
    pub fn read_text(&self, name: &str) -> Result<Option<String>, AssetError> {
        let text = self.read(name)?.map(String::from_utf8).transpose()?;
        Ok(text)
    }

    pub fn contains(&self, name: &str) -> bool {
        let name = normalize_path(name);
        match self {
            Assets::DiskBacked(root) => safe_relative(&name)
                .map(|relative| root.join(relative).is_file())
                .unwrap_or(false),
            Assets::Embedded(blob) => blob.get_by_id(&name).is_some(),
        }
    }

    /// All asset names, sorted.
    pub fn names(&self) -> Result<Vec<String>, AssetError> {
        let mut names = match self {
            Assets::DiskBacked(root) => {
                if !root.is_dir() {
                    return Ok(Vec::new());
                }
                let mut files = Vec::new();
                blob::pack::collect_files(root, &mut files)?;
                files
                    .iter()
                    .map(|path| blob::pack::relative_id(root, path))
                    .collect()
            }
            Assets::Embedded(blob) => blob
                .entries()
                .iter()
                .map(|entry| entry.id.clone())
                .collect::<Vec<_>>(),
        };
        names.sort();
        names.dedup();
        Ok(names)
    }

    /// Make every asset available as a plain file.
    ///
    /// Embedded assets are copied into a fresh temporary folder whose name
    /// starts with `temp_prefix`; the folder is deleted when the returned
    /// handle is dropped. Disk-backed assets already are files and are not
    /// copied.
    ///
    /// An id that cannot become a file is rejected with
    /// [`AssetError::InvalidId`]: one that escapes the folder, or one that
    /// needs a path another entry uses, as `a` and `a/b` do.
    pub fn extract_all(&self, temp_prefix: &str) -> Result<ExtractedAssets, AssetError> {
        let blob = match self {
            Assets::DiskBacked(root) => {
                return Ok(ExtractedAssets {
                    root: root.clone(),
                    temp_dir: None,
                })
            }
            Assets::Embedded(blob) => blob,
        };

        let dir = tempfile::Builder::new().prefix(temp_prefix).tempdir()?;
        let mut files: HashSet<&str> = HashSet::new();
        let mut folders: HashSet<&str> = HashSet::new();
        for index in 0..blob.item_count() {
            let id = blob.id_at(index);
            // the first entry with an id wins, as in lookups
            if files.contains(id) {
                continue;
            }
            let relative = safe_relative(id)?;
            let parents: Vec<&str> = id.match_indices('/').map(|(at, _)| &id[..at]).collect();
            if folders.contains(id) || parents.iter().any(|parent| files.contains(parent)) {
                return Err(AssetError::InvalidId(id.to_string()));
            }
            files.insert(id);
            folders.extend(parents);

            let Some(mut section) = blob.get_by_index(index) else {
                continue;
            };
            let target = dir.path().join(relative);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut file = File::create(&target)?;
            let copied = io::copy(&mut section, &mut file)?;
            debug!(id, bytes = copied, "extracted asset");
        }

        info!(
            dir = %dir.path().display(),
            entries = blob.item_count(),
            "extracted embedded assets"
        );
        Ok(ExtractedAssets {
            root: dir.path().to_path_buf(),
            temp_dir: Some(dir),
        })
    }
}

/// Assets available as files under one folder.
///
/// Holds the temporary folder alive when the assets were extracted from a
/// payload; dropping the handle removes it.
#[derive(Debug)]
pub struct ExtractedAssets {
    root: PathBuf,
    temp_dir: Option<TempDir>,
}

impl ExtractedAssets {
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File path of the asset called `name`.
    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(normalize_path(name))
    }

    pub fn is_temporary(&self) -> bool {
        self.temp_dir.is_some()
    }
}

/// Normalize an asset name for lookup.
///
/// - Replace backslashes with forward slashes
/// - Remove leading `./`
/// - Remove trailing `/`
pub fn normalize_path(path: &str) -> String {
    let mut p = path.replace('\\', "/");
    while let Some(rest) = p.strip_prefix("./") {
        p = rest.to_string();
    }
    while p.ends_with('/') {
        p.pop();
    }
    p
}

/// Turn an asset id into a relative path that stays inside its root.
fn safe_relative(id: &str) -> Result<PathBuf, AssetError> {
    if id.is_empty() {
        return Err(AssetError::InvalidId(id.to_string()));
    }
    let mut path = PathBuf::new();
    for part in id.split('/') {
        let mut components = Path::new(part).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => path.push(part),
            _ => return Err(AssetError::InvalidId(id.to_string())),
        }
    }
    Ok(path)
}
