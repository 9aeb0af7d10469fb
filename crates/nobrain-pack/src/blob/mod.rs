//! Indexed blob container
//!
//! A blob maps string ids to byte ranges of one flat data area:
//! - **format**: header layout and the entry index
//! - **memory**: [`Blob`], the builder and eager reader
//! - **lazy**: [`BlobReader`], reads entry data from a seekable stream on demand
//! - **pack**: builds a blob from a file or directory tree

pub mod format;
pub mod lazy;
pub mod memory;
pub mod pack;

pub use format::{Entry, Index, MAX_ID_LEN};
pub use lazy::{BlobReader, Section};
pub use memory::Blob;
pub use pack::pack_path;
