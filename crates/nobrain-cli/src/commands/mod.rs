//! Tool commands.

pub mod blob;
pub mod payload;
