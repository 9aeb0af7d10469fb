//! nobrain packaging formats
//!
//! Two building blocks for shipping a game as a single file:
//! - [`blob`]: an indexed container mapping string ids to byte ranges, read
//!   either fully into memory or lazily from a seekable stream
//! - [`payload`]: data appended to an executable behind a trailer that lets
//!   the running program find it again
//!
//! A typical build packs the asset directory into a blob, appends the blob to
//! the game executable, and at run time opens the blob lazily on top of the
//! payload reader:
//!
//! ```no_run
//! use nobrain_pack::{blob::BlobReader, payload};
//!
//! if let Some(reader) = payload::open()? {
//!     let assets = BlobReader::open(reader)?;
//!     let music = assets.get_by_id("music.wav");
//! }
//! # Ok::<(), nobrain_pack::PackError>(())
//! ```

pub mod blob;
pub mod error;
mod fsutil;
pub mod payload;
pub mod window;

pub use blob::{Blob, BlobReader, Section};
pub use error::{PackError, Stage};
pub use payload::PayloadReader;
pub use window::{Exclusive, SharedCursor, Source, Window};
