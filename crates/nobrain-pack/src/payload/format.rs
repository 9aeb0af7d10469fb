//! Payload trailer format
//!
//! ```text
//! ┌─────────────────────────┐
//! │  host file (unchanged)  │  ← usually an executable
//! ├─────────────────────────┤
//! │  payload data           │  ← any bytes, typically a blob
//! ├─────────────────────────┤
//! │  Trailer (16 bytes)     │  ← "payload " + u64 LE data start
//! └─────────────────────────┘
//! ```

use std::io::{self, Write};

/// Magic bytes opening the trailer.
pub const TRAILER_MAGIC: [u8; 8] = *b"payload ";

/// Size of the trailer in bytes.
pub const TRAILER_SIZE: usize = 16;

/// Fixed-size trailer at the very end of a combined file.
///
/// To check whether a file carries a payload, read its last `TRAILER_SIZE`
/// bytes and see whether the magic matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trailer {
    /// Offset from the start of the file where the payload begins.
    /// This equals the size of the original host file.
    pub data_start: u64,
}

impl Trailer {
    pub fn new(data_start: u64) -> Self {
        Self { data_start }
    }

    /// Decode a trailer from the first `TRAILER_SIZE` bytes of `bytes`.
    ///
    /// Returns `None` if there are too few bytes or the magic does not match.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < TRAILER_SIZE || bytes[..8] != TRAILER_MAGIC {
            return None;
        }
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&bytes[8..TRAILER_SIZE]);
        Some(Self {
            data_start: u64::from_le_bytes(raw),
        })
    }

    pub fn to_bytes(&self) -> [u8; TRAILER_SIZE] {
        let mut bytes = [0u8; TRAILER_SIZE];
        bytes[..8].copy_from_slice(&TRAILER_MAGIC);
        bytes[8..].copy_from_slice(&self.data_start.to_le_bytes());
        bytes
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.to_bytes())
    }
}
