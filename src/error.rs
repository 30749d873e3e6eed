use std::path::PathBuf;

use thiserror::Error;
use vera_bitmap::ConvertError;

use crate::models::ConversionMode;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to decode PNG {}: {source}", path.display())]
    Png {
        path: PathBuf,
        source: png::DecodingError,
    },

    #[error("Unsupported PNG {}: {detail}", path.display())]
    Unsupported { path: PathBuf, detail: String },

    #[error("Invalid image {}: {source}", path.display())]
    Image {
        path: PathBuf,
        source: ConvertError,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("The width of the image is {width}, it must be either 320 or 640. (Height has no restrictions.)")]
    BitmapWidth { width: u32 },

    #[error("--width and --height are not used when converting to {mode}")]
    UnexpectedTileSize { mode: ConversionMode },

    #[error("--width and --height are required when converting to {mode}")]
    MissingTileSize { mode: ConversionMode },

    #[error("Invalid {mode} {dimension} {value}, valid values are {allowed:?}")]
    InvalidTileSize {
        mode: ConversionMode,
        dimension: &'static str,
        value: u32,
        allowed: &'static [u32],
    },

    #[error("The {dimension} of the image ({size}) is not divisible by {divisor}")]
    DimensionMismatch {
        dimension: &'static str,
        size: u32,
        divisor: u32,
    },
}
