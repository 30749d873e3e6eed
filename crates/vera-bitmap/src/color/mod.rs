//! Color types
//!
//! [`Rgba8`] is the 8-bit-per-channel color handed over by the decoder.
//! [`VeraColor`] is its 12-bit quantization, the unit the palette is built from.

mod rgba;
mod vera_color;

pub use rgba::Rgba8;
pub use vera_color::VeraColor;
