//! Image decoding.
//!
//! Turns PNG files into [`SourceImage`](vera_bitmap::SourceImage)s. Indexed
//! PNGs keep their palette, everything else is expanded to 8-bit RGBA.

pub mod png;

pub use self::png::{decode_png, read_png};
