//! Build-time tools for shipping a game as one file
//!
//! - `blob`: pack a file or folder into a blob container
//! - `payload`: append a data file to an executable
//!
//! Both binaries share argument handling, logging setup and colored output
//! from this library.

pub mod commands;
pub mod flags;
pub mod logging;
pub mod output;
