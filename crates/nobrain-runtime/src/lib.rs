//! nobrain runtime
//!
//! Resolves asset names to byte sources for the game: loose files in a
//! development folder, or a blob appended to the executable as a payload.

pub mod assets;
pub mod config;
pub mod error;

pub use assets::{normalize_path, AssetReader, Assets, ExtractedAssets};
pub use config::{AssetsConfig, ConfigError, CONFIG_FILE};
pub use error::AssetError;
