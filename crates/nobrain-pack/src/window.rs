//! Bounded windows over a seekable byte source
//!
//! A [`Window`] exposes the byte range `[start, end)` of some larger stream as
//! a stream of its own. Offsets seen through `Seek` always run from `0` to
//! `len()`; the absolute position inside the source is never exposed.
//!
//! Seeking is purely logical. Every `read` positions the source at the
//! window's current absolute offset before reading, so several windows can
//! take turns on one underlying stream.

use std::cell::RefCell;
use std::io::{self, Read, Seek, SeekFrom};

use crate::error::PackError;

/// A byte source that can read from an absolute offset.
pub trait Source {
    /// Read into `buf` starting at absolute offset `pos`.
    fn read_at(&mut self, pos: u64, buf: &mut [u8]) -> io::Result<usize>;
}

/// A stream owned by exactly one window.
#[derive(Debug)]
pub struct Exclusive<R>(pub R);

impl<R> Exclusive<R> {
    pub fn into_inner(self) -> R {
        self.0
    }
}

impl<R: Read + Seek> Source for Exclusive<R> {
    fn read_at(&mut self, pos: u64, buf: &mut [u8]) -> io::Result<usize> {
        self.0.seek(SeekFrom::Start(pos))?;
        self.0.read(buf)
    }
}

/// A stream shared by any number of windows.
///
/// All windows borrowing the same cursor move one underlying position, which
/// is why each read seeks first. Interleaving reads from different windows is
/// fine; the `RefCell` keeps the cursor on a single thread.
#[derive(Debug)]
pub struct SharedCursor<'a, R> {
    cell: &'a RefCell<R>,
}

impl<'a, R> SharedCursor<'a, R> {
    pub fn new(cell: &'a RefCell<R>) -> Self {
        Self { cell }
    }
}

impl<R> Clone for SharedCursor<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for SharedCursor<'_, R> {}

impl<R: Read + Seek> Source for SharedCursor<'_, R> {
    fn read_at(&mut self, pos: u64, buf: &mut [u8]) -> io::Result<usize> {
        let mut inner = self
            .cell
            .try_borrow_mut()
            .map_err(|_| io::Error::other("shared stream is already in use"))?;
        inner.seek(SeekFrom::Start(pos))?;
        inner.read(buf)
    }
}

/// A bounded, independently positioned view over a [`Source`].
#[derive(Debug)]
pub struct Window<S> {
    source: S,
    start: u64,
    pos: u64,
    end: u64,
}

impl<S> Window<S> {
    /// Create a window over `[start, end)` of `source`, positioned at its start.
    pub fn new(source: S, start: u64, end: u64) -> Self {
        let end = end.max(start);
        Self {
            source,
            start,
            pos: start,
            end,
        }
    }

    /// Length of the window in bytes.
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Current offset relative to the start of the window.
    pub fn position(&self) -> u64 {
        self.pos - self.start
    }

    /// Bytes left before the end of the window.
    pub fn remaining(&self) -> u64 {
        self.end - self.pos
    }

    pub fn into_source(self) -> S {
        self.source
    }

    fn seek_target(&self, from: SeekFrom) -> Result<u64, PackError> {
        let target = match from {
            SeekFrom::Start(offset) => self.start as i128 + offset as i128,
            SeekFrom::Current(delta) => self.pos as i128 + delta as i128,
            SeekFrom::End(delta) => self.end as i128 + delta as i128,
        };
        if target < self.start as i128 {
            return Err(PackError::Range {
                target: target - self.start as i128,
            });
        }
        Ok(target.min(self.end as i128) as u64)
    }
}

impl<S: Source> Read for Window<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pos >= self.end || buf.is_empty() {
            return Ok(0);
        }
        let max = (self.end - self.pos).min(buf.len() as u64) as usize;
        let n = self.source.read_at(self.pos, &mut buf[..max])?;
        self.pos += n as u64;
        Ok(n)
    }
}

impl<S> Seek for Window<S> {
    fn seek(&mut self, from: SeekFrom) -> io::Result<u64> {
        self.pos = self.seek_target(from)?;
        Ok(self.pos - self.start)
    }
}
