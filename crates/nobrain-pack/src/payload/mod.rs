//! Self-locating payloads
//!
//! Appends arbitrary data to a host file (usually an executable) together
//! with a 16-byte trailer, so a program can find its own data at run time:
//! - **format**: the trailer layout
//! - **append**: produces a combined file
//! - **loader**: finds and opens the payload of a combined file

pub mod append;
pub mod format;
pub mod loader;

pub use append::{append_bytes, append_payload, AppendSummary};
pub use format::{Trailer, TRAILER_MAGIC, TRAILER_SIZE};
pub use loader::{locate, open, open_at, read_all, read_all_at, PayloadReader};
