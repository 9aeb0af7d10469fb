//! Asset error types.

use nobrain_pack::PackError;

use crate::config::ConfigError;

/// Errors that can occur while locating, reading or extracting assets.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// Malformed blob or payload
    #[error(transparent)]
    Pack(#[from] PackError),

    /// File I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Asset id that would escape its root folder, or that collides with
    /// another entry's folder when extracted
    #[error("Invalid asset id: {0:?}")]
    InvalidId(String),

    /// Asset that is not valid UTF-8 text
    #[error("Asset is not UTF-8 text")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Asset configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),
}
