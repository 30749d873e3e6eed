//! Palette construction
//!
//! This module turns a [`SourceImage`](crate::SourceImage) into the ordered
//! 12-bit palette the hardware loads, together with a provenance record of
//! which source colors collapsed into each entry.

mod builder;
mod palette;

pub use builder::{PaletteBuilder, PaletteDraft, TransparencySource};
pub use palette::{Palette, Provenance, MAX_COLORS};
