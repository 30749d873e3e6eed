//! Error types for the conversion core.

use crate::color::{Rgba8, VeraColor};

/// Error returned when a color literal cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseColorError {
    /// The literal does not have exactly 8 hex digits.
    #[error("invalid color length: {0} hex digits (expected 8, format $AARRGGBB)")]
    InvalidLength(usize),

    /// The literal contains a character that is not a hex digit.
    #[error("invalid hex color: {0}")]
    InvalidHex(String),
}

/// Error returned by palette building, packing and serialization.
///
/// Every variant is fatal for the conversion that produced it.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// More distinct 12-bit colors than the hardware palette can hold.
    #[error("a conversion would result in {colors} colors, maximum is {max}")]
    CapacityExceeded { colors: usize, max: usize },

    /// The requested transparent color does not occur in the image.
    #[error("the specified transparent color {color} was not found in the image")]
    TransparentColorNotFound { color: Rgba8 },

    /// A tile dimension does not evenly divide the image (or byte) grid.
    #[error("the {dimension} ({size}) is not divisible by {divisor}")]
    DimensionMismatch {
        dimension: &'static str,
        size: u32,
        divisor: u32,
    },

    /// Image dimensions do not fit the 16-bit header fields.
    #[error("image of {width}x{height} pixels is too large for a BMX header")]
    DimensionTooLarge { width: u32, height: u32 },

    /// The palette has more entries than the color mode can address.
    #[error("palette of {colors} colors does not fit a {color_count}-color mode")]
    ModeMismatch { colors: usize, color_count: usize },

    /// A pixel's color is missing from the palette. Indicates a bug.
    #[error("color {color} has no palette index; palette and image are out of sync")]
    InternalConsistency { color: VeraColor },

    #[error("invalid image: {0}")]
    InvalidImage(String),

    #[error("invalid BMX header: {0}")]
    InvalidHeader(String),

    #[error("invalid color: {0}")]
    ParseColor(#[from] ParseColorError),

    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}
