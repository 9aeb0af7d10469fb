//! In-memory blob: builder and eager reader

use std::io::{Read, Write};
use std::path::Path;

use tracing::debug;

use super::format::{Entry, Index};
use crate::error::{PackError, Stage};
use crate::fsutil;

/// Named byte slices stored back to back in one buffer.
///
/// Build one with [`Blob::append`] and serialize it with [`Blob::write`], or
/// load a whole serialized blob into memory with [`Blob::read`].
#[derive(Debug, Clone, Default)]
pub struct Blob {
    index: Index,
    data: Vec<u8>,
}

impl Blob {
    /// Create an empty blob.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `data` under `id` after all existing entries.
    ///
    /// Ids are not checked for uniqueness; lookups by id return the first
    /// match. Empty data still takes an index slot.
    pub fn append(&mut self, id: impl Into<String>, data: &[u8]) {
        let entry = self.index.push(id.into(), data.len() as u64);
        debug!(id = %entry.id, len = data.len(), "appended blob entry");
        self.data.extend_from_slice(data);
    }

    pub fn item_count(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Id at `index`, or `""` if `index` is out of range.
    pub fn id_at(&self, index: usize) -> &str {
        self.index.id_at(index)
    }

    /// Data of the first entry named `id`.
    pub fn get_by_id(&self, id: &str) -> Option<&[u8]> {
        self.index.find(id).map(|entry| self.slice(entry))
    }

    pub fn get_by_index(&self, index: usize) -> Option<&[u8]> {
        self.index.get(index).map(|entry| self.slice(entry))
    }

    /// All entries in index order.
    pub fn entries(&self) -> &[Entry] {
        self.index.entries()
    }

    /// Length of the data area in bytes.
    pub fn data_len(&self) -> u64 {
        self.index.data_len()
    }

    /// Iterate over `(id, data)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.index
            .entries()
            .iter()
            .map(|entry| (entry.id.as_str(), self.slice(entry)))
    }

    fn slice(&self, entry: &Entry) -> &[u8] {
        &self.data[entry.start as usize..entry.end as usize]
    }

    /// Serialize the blob to `writer`.
    ///
    /// Ids longer than [`MAX_ID_LEN`](super::MAX_ID_LEN) bytes are rejected
    /// before anything is written. An I/O failure part way through leaves
    /// whatever was already written in `writer`; use
    /// [`Blob::write_to_path`] when the destination is a file.
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<(), PackError> {
        let header = self.index.encode()?;
        let header_len = u32::try_from(header.len()).map_err(|_| {
            PackError::format(
                Stage::WriteHeaderLength,
                format!("header is {} bytes, more than a u32 can hold", header.len()),
            )
        })?;

        writer
            .write_all(&header_len.to_le_bytes())
            .map_err(PackError::io(Stage::WriteHeaderLength))?;
        writer
            .write_all(&header)
            .map_err(PackError::io(Stage::WriteHeader))?;
        writer
            .write_all(&self.data)
            .map_err(PackError::io(Stage::WriteData))?;
        Ok(())
    }

    /// Serialize the blob into a file, replacing it atomically.
    pub fn write_to_path(&self, path: &Path) -> Result<(), PackError> {
        fsutil::write_atomic(path, None, |writer| self.write(writer))?;
        debug!(
            path = %path.display(),
            entries = self.item_count(),
            data_len = self.data.len(),
            "wrote blob"
        );
        Ok(())
    }

    /// Read a whole serialized blob into memory.
    pub fn read<R: Read>(reader: &mut R) -> Result<Self, PackError> {
        let index = Index::read_from(reader)?;
        let expected = index.data_len();

        let mut data = Vec::new();
        if expected > 0 {
            reader
                .by_ref()
                .take(expected)
                .read_to_end(&mut data)
                .map_err(PackError::io(Stage::ReadData))?;
            if (data.len() as u64) < expected {
                return Err(PackError::format(
                    Stage::ReadData,
                    format!(
                        "header declares {} data bytes but only {} are present",
                        expected,
                        data.len()
                    ),
                ));
            }
        }

        debug!(entries = index.len(), data_len = data.len(), "read blob");
        Ok(Self { index, data })
    }
}
