//! Disk-backed blob reader
//!
//! [`BlobReader`] parses only the header and hands out [`Section`]s that read
//! entry data straight from the underlying stream on demand.
//!
//! Every section borrows the same stream. Reading from several sections one
//! after another (a byte from the first, then the second, then the first
//! again) is fine because each read seeks to its own position first. The
//! stream lives in a `RefCell`, so sections cannot be shared across threads.

use std::cell::RefCell;
use std::io::{Read, Seek};

use tracing::debug;

use super::format::{Entry, Index};
use crate::error::{PackError, Stage};
use crate::window::{SharedCursor, Window};

/// A bounded view of one entry's data.
pub type Section<'a, R> = Window<SharedCursor<'a, R>>;

/// Blob whose data stays in the underlying stream.
#[derive(Debug)]
pub struct BlobReader<R> {
    index: Index,
    source: RefCell<R>,
    zero: u64,
}

impl<R: Read + Seek> BlobReader<R> {
    /// Parse the header at the stream's current position.
    ///
    /// The data area is taken to begin right after the header, so a blob
    /// embedded inside a larger file can be opened by seeking to it first.
    pub fn open(mut source: R) -> Result<Self, PackError> {
        let index = Index::read_from(&mut source)?;
        let zero = source
            .stream_position()
            .map_err(PackError::io(Stage::StreamPosition))?;
        debug!(
            entries = index.len(),
            data_len = index.data_len(),
            zero,
            "opened blob"
        );
        Ok(Self {
            index,
            source: RefCell::new(source),
            zero,
        })
    }
}

impl<R> BlobReader<R> {
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

    pub fn entries(&self) -> &[Entry] {
        self.index.entries()
    }

    /// Reader over the first entry named `id`.
    pub fn get_by_id(&self, id: &str) -> Option<Section<'_, R>> {
        self.index.find(id).map(|entry| self.section(entry))
    }

    pub fn get_by_index(&self, index: usize) -> Option<Section<'_, R>> {
        self.index.get(index).map(|entry| self.section(entry))
    }

    /// Stream offset where the data area begins.
    pub fn data_offset(&self) -> u64 {
        self.zero
    }

    /// Give back the underlying stream.
    pub fn into_inner(self) -> R {
        self.source.into_inner()
    }

    fn section(&self, entry: &Entry) -> Section<'_, R> {
        Window::new(
            SharedCursor::new(&self.source),
            self.zero.saturating_add(entry.start),
            self.zero.saturating_add(entry.end),
        )
    }
}
