//! Payload loader
//!
//! Finds the payload appended to the current executable (or any file):
//! 1. Seek to 16 bytes before the end and read the trailer
//! 2. No magic means no payload; that is not an error
//! 3. Check the data start against the trailer position
//! 4. Hand out a bounded reader over the payload bytes

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::ops::Range;
use std::path::Path;

use tracing::debug;

use super::format::{Trailer, TRAILER_SIZE};
use crate::error::{PackError, Stage};
use crate::window::{Exclusive, Window};

/// Bounded reader over an appended payload.
///
/// Offsets seen through `Seek` are relative to the payload start.
#[derive(Debug)]
pub struct PayloadReader<R = File> {
    window: Window<Exclusive<R>>,
    data_start: u64,
}

impl<R> PayloadReader<R> {
    /// Payload length in bytes.
    pub fn len(&self) -> u64 {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// Absolute byte range of the payload inside the combined file.
    pub fn data_range(&self) -> Range<u64> {
        self.data_start..self.data_start + self.window.len()
    }

    /// Release the underlying file.
    pub fn close(self) {
        drop(self.window.into_source());
    }

    pub fn into_inner(self) -> R {
        self.window.into_source().into_inner()
    }
}

impl<R: Read + Seek> Read for PayloadReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.window.read(buf)
    }
}

impl<R> Seek for PayloadReader<R> {
    fn seek(&mut self, from: SeekFrom) -> io::Result<u64> {
        self.window.seek(from)
    }
}

/// Look for a payload in `source`.
///
/// Returns `Ok(None)` when the stream is shorter than a trailer or the magic
/// does not match. A trailer whose data start lies past the trailer itself
/// is malformed and reported as a format error.
pub fn locate<R: Read + Seek>(mut source: R) -> Result<Option<PayloadReader<R>>, PackError> {
    let file_len = source
        .seek(SeekFrom::End(0))
        .map_err(PackError::io(Stage::SeekTrailer))?;
    if file_len < TRAILER_SIZE as u64 {
        debug!(file_len, "too short to carry a payload");
        return Ok(None);
    }

    let data_end = file_len - TRAILER_SIZE as u64;
    source
        .seek(SeekFrom::Start(data_end))
        .map_err(PackError::io(Stage::SeekTrailer))?;
    let mut raw = [0u8; TRAILER_SIZE];
    source
        .read_exact(&mut raw)
        .map_err(PackError::read(Stage::ReadTrailer))?;

    let Some(trailer) = Trailer::from_bytes(&raw) else {
        debug!(file_len, "no payload trailer");
        return Ok(None);
    };

    if trailer.data_start > data_end {
        return Err(PackError::format(
            Stage::DataStart,
            format!(
                "payload starts at {} but the trailer begins at {}",
                trailer.data_start, data_end
            ),
        ));
    }

    source
        .seek(SeekFrom::Start(trailer.data_start))
        .map_err(PackError::io(Stage::SeekPayload))?;

    debug!(data_start = trailer.data_start, data_end, "located payload");
    Ok(Some(PayloadReader {
        window: Window::new(Exclusive(source), trailer.data_start, data_end),
        data_start: trailer.data_start,
    }))
}

/// Open the payload appended to the file at `path`.
pub fn open_at(path: &Path) -> Result<Option<PayloadReader>, PackError> {
    let file = File::open(path).map_err(PackError::io(Stage::OpenFile))?;
    locate(file)
}

/// Open the payload appended to the running executable.
pub fn open() -> Result<Option<PayloadReader>, PackError> {
    let exe = std::env::current_exe().map_err(PackError::io(Stage::LocateExecutable))?;
    open_at(&exe)
}

/// Read the whole payload of the file at `path`.
pub fn read_all_at(path: &Path) -> Result<Option<Vec<u8>>, PackError> {
    open_at(path)?.map(read_to_vec).transpose()
}

/// Read the whole payload of the running executable.
pub fn read_all() -> Result<Option<Vec<u8>>, PackError> {
    open()?.map(read_to_vec).transpose()
}

fn read_to_vec<R: Read + Seek>(mut reader: PayloadReader<R>) -> Result<Vec<u8>, PackError> {
    let mut data = Vec::with_capacity(reader.len() as usize);
    let result = reader.read_to_end(&mut data);
    reader.close();
    result.map_err(PackError::io(Stage::ReadPayload))?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn combined(host: &[u8], data: &[u8]) -> Vec<u8> {
        let mut out = host.to_vec();
        out.extend_from_slice(data);
        out.extend_from_slice(&Trailer::new(host.len() as u64).to_bytes());
        out
    }

    #[test]
    fn test_locate_payload() {
        let mut reader = locate(Cursor::new(combined(b"host", b"payload data")))
            .unwrap()
            .unwrap();
        assert_eq!(reader.len(), 12);
        assert_eq!(reader.data_range(), 4..16);
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"payload data");
    }

    #[test]
    fn test_locate_without_trailer() {
        let found = locate(Cursor::new(b"just an ordinary executable".to_vec())).unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn test_locate_short_file() {
        assert!(locate(Cursor::new(b"tiny".to_vec())).unwrap().is_none());
        assert!(locate(Cursor::new(Vec::new())).unwrap().is_none());
    }

    #[test]
    fn test_locate_empty_payload() {
        let reader = locate(Cursor::new(combined(b"host", b""))).unwrap().unwrap();
        assert!(reader.is_empty());
    }

    #[test]
    fn test_locate_bad_data_start() {
        let mut bytes = b"hostdata".to_vec();
        bytes.extend_from_slice(&Trailer::new(9).to_bytes());
        let err = locate(Cursor::new(bytes)).unwrap_err();
        assert!(err.is_format());
        assert_eq!(err.stage(), Some(Stage::DataStart));
    }

    #[test]
    fn test_payload_seek_is_relative() {
        let mut reader = locate(Cursor::new(combined(b"host", b"0123456789")))
            .unwrap()
            .unwrap();
        assert_eq!(reader.seek(SeekFrom::End(-3)).unwrap(), 7);
        let mut out = String::new();
        reader.read_to_string(&mut out).unwrap();
        assert_eq!(out, "789");

        let err = reader.seek(SeekFrom::Start(0)).and_then(|_| reader.seek(SeekFrom::Current(-1)));
        assert!(PackError::from_io(&err.unwrap_err()).unwrap().is_range());
    }
}
