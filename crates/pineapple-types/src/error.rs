//! Error types for Perfect Pineapple Player.

use std::io;

/// Errors produced by the player framework.
#[derive(Debug, thiserror::Error)]
pub enum PineappleError {
    #[error("backend error: {0}")]
    Backend(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("media error: {0}")]
    Media(String),

    #[error("process error: {0}")]
    Process(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, PineappleError>;
