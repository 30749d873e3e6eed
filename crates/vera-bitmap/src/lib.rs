#![allow(clippy::module_inception)]

//! vera-bitmap: indexed bitmaps for the Commander X16 VERA chip
//!
//! This library converts decoded RGBA images into the packed, palette-indexed
//! formats the VERA video chip reads: raw bitmaps, BMX files, tile sets and
//! sprite sets, together with their 12-bit palettes.
//!
//! # Quick Start
//!
//! ```
//! use vera_bitmap::{Converter, PaletteEncoding, Rgba8, SourceImage, TargetKind};
//!
//! let black = Rgba8::opaque(0, 0, 0);
//! let white = Rgba8::opaque(255, 255, 255);
//! let image = SourceImage::new(8, 1, vec![black, white, black, white, black, white, black, white])
//!     .unwrap();
//!
//! let conversion = Converter::new(TargetKind::Image).convert(&image).unwrap();
//! assert_eq!(conversion.pixels(), &[0b0101_0101]);
//!
//! let mut bin = Vec::new();
//! conversion.write_image(&mut bin).unwrap();
//! assert_eq!(bin, vec![0, 0, 0b0101_0101]);
//!
//! let mut palette = Vec::new();
//! conversion.write_palette(&mut palette, PaletteEncoding::Binary).unwrap();
//! assert_eq!(palette, vec![0, 0, 0x00, 0x00, 0xFF, 0x0F]);
//! ```
//!
//! # Pipeline
//!
//! 1. [`PaletteBuilder`] quantizes every color to 12 bits ([`VeraColor`]) and
//!    assigns palette indices. Index 0 is reserved for the transparent color,
//!    see [`TransparencySource`].
//! 2. [`ColorMode::resolve`] picks the smallest bit depth that holds the
//!    palette: 1, 2, 4 or 8 bits per pixel (4 or 8 for sprites).
//! 3. [`PixelPacker`] packs indices MSB-first, optionally tile by tile.
//! 4. The [`format`] writers add the BMX or raw header and serialize the
//!    palette as binary, assembler or BASIC text.
//!
//! # Transparency
//!
//! VERA draws palette index 0 as transparent in sprites and tile layers. Two
//! rules keep transparent pixels on index 0:
//!
//! - the palette puts the selected transparent color at index 0,
//! - the packer writes index 0 for any pixel whose 8-bit alpha is exactly 0,
//!   whatever index its color was given.
//!
//! Partially transparent pixels (alpha 1..=254) count as opaque.

pub mod api;
pub mod color;
pub mod error;
pub mod format;
pub mod image;
pub mod mode;
pub mod pack;
pub mod palette;

#[cfg(test)]
mod domain_tests;

pub use api::{Conversion, Converter};
pub use color::{Rgba8, VeraColor};
pub use error::{ConvertError, ParseColorError};
pub use format::{BmxHeader, PaletteEncoding};
pub use image::SourceImage;
pub use mode::{ColorMode, TargetKind};
pub use pack::{unpack_indices, PixelPacker, TileSize};
pub use palette::{Palette, PaletteBuilder, PaletteDraft, Provenance, TransparencySource};
