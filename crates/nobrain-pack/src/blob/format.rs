//! Blob header encoding and the shared entry index
//!
//! ```text
//! u32  header length in bytes (of everything up to the data)
//! repeat while header bytes remain {
//!     u16  id length
//!     [u8] id, UTF-8
//!     u64  data length
//! }
//! [u8] data of every entry, back to back, in header order
//! ```
//!
//! All numbers are little endian. Offsets are not stored; an entry starts
//! where the previous one ended.

use std::collections::HashMap;
use std::io::Read;

use crate::error::{PackError, Stage};

/// Maximum byte length of an id that can be written.
pub const MAX_ID_LEN: usize = u16::MAX as usize;

/// Size of the header length prefix.
pub const HEADER_LENGTH_SIZE: usize = 4;

/// One id-to-byte-range record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: String,
    /// Offset of the first byte in the data area
    pub start: u64,
    /// Offset one past the last byte in the data area
    pub end: u64,
}

impl Entry {
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Ordered entries plus a lookup table from id to the first entry using it.
#[derive(Debug, Clone, Default)]
pub struct Index {
    entries: Vec<Entry>,
    first_by_id: HashMap<String, usize>,
    data_len: u64,
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an entry of `len` bytes directly after the previous one.
    pub fn push(&mut self, id: String, len: u64) -> &Entry {
        let start = self.data_len;
        let end = start + len;
        let position = self.entries.len();
        self.first_by_id.entry(id.clone()).or_insert(position);
        self.entries.push(Entry { id, start, end });
        self.data_len = end;
        &self.entries[position]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total length of the data area.
    pub fn data_len(&self) -> u64 {
        self.data_len
    }

    /// Id at `index`, or the empty string when out of range.
    pub fn id_at(&self, index: usize) -> &str {
        self.entries
            .get(index)
            .map(|entry| entry.id.as_str())
            .unwrap_or("")
    }

    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    /// First entry with the given id, in insertion order.
    pub fn find(&self, id: &str) -> Option<&Entry> {
        self.first_by_id.get(id).map(|&index| &self.entries[index])
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Encode the header body (without the length prefix).
    ///
    /// Every id is checked before anything is encoded, so an oversized id
    /// never yields a partial header.
    pub fn encode(&self) -> Result<Vec<u8>, PackError> {
        if let Some(entry) = self.entries.iter().find(|e| e.id.len() > MAX_ID_LEN) {
            return Err(PackError::format(
                Stage::WriteHeader,
                format!(
                    "id is {} bytes long, the maximum is {}",
                    entry.id.len(),
                    MAX_ID_LEN
                ),
            ));
        }

        let size: usize = self.entries.iter().map(|e| 2 + e.id.len() + 8).sum();
        let mut header = Vec::with_capacity(size);
        for entry in &self.entries {
            header.extend_from_slice(&(entry.id.len() as u16).to_le_bytes());
            header.extend_from_slice(entry.id.as_bytes());
            header.extend_from_slice(&entry.len().to_le_bytes());
        }
        Ok(header)
    }

    /// Decode a header body.
    pub fn decode(mut header: &[u8]) -> Result<Self, PackError> {
        let mut index = Index::new();
        while !header.is_empty() {
            let id_len = take(&mut header, 2, Stage::ReadIdLength)?;
            let id_len = u16::from_le_bytes([id_len[0], id_len[1]]) as usize;

            let id = take(&mut header, id_len, Stage::ReadId)?;
            let id = std::str::from_utf8(id)
                .map_err(|e| PackError::format(Stage::ReadId, format!("id is not UTF-8: {e}")))?;

            let data_len = take(&mut header, 8, Stage::ReadDataLength)?;
            let mut raw = [0u8; 8];
            raw.copy_from_slice(data_len);
            let data_len = u64::from_le_bytes(raw);

            if index.data_len.checked_add(data_len).is_none() {
                return Err(PackError::format(
                    Stage::ReadDataLength,
                    "total data length overflows u64",
                ));
            }
            index.push(id.to_string(), data_len);
        }
        Ok(index)
    }

    /// Read the length prefix and header body from `reader`.
    ///
    /// Leaves `reader` positioned at the first data byte.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self, PackError> {
        let mut raw = [0u8; HEADER_LENGTH_SIZE];
        reader
            .read_exact(&mut raw)
            .map_err(PackError::read(Stage::ReadHeaderLength))?;
        let header_len = u32::from_le_bytes(raw) as u64;

        if header_len == 0 {
            return Ok(Index::new());
        }

        let mut header = Vec::new();
        reader
            .by_ref()
            .take(header_len)
            .read_to_end(&mut header)
            .map_err(PackError::io(Stage::ReadHeader))?;
        if (header.len() as u64) < header_len {
            return Err(PackError::format(
                Stage::ReadHeader,
                format!(
                    "header declares {} bytes but only {} are present",
                    header_len,
                    header.len()
                ),
            ));
        }

        Self::decode(&header)
    }
}

fn take<'a>(buf: &mut &'a [u8], n: usize, stage: Stage) -> Result<&'a [u8], PackError> {
    if buf.len() < n {
        return Err(PackError::format(
            stage,
            format!("needs {} bytes but only {} remain in the header", n, buf.len()),
        ));
    }
    let (head, tail) = buf.split_at(n);
    *buf = tail;
    Ok(head)
}
