//! 12-bit VERA color
//!
//! VERA stores each palette entry as 4 bits per channel. [`VeraColor`] is the
//! quantized form of an [`Rgba8`] and is the key of the palette: two source
//! colors that quantize to the same `VeraColor` share one palette index.

use std::fmt;

use super::Rgba8;

/// Alpha flag value for opaque colors.
pub const ALPHA_OPAQUE: u8 = 15;
/// Alpha flag value for fully transparent colors.
pub const ALPHA_TRANSPARENT: u8 = 0;

/// A color quantized to 4 bits per channel plus a binary alpha flag.
///
/// Equality and hashing cover all four fields, so a transparent black and an
/// opaque black are distinct palette entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VeraColor {
    a: u8,
    r: u8,
    g: u8,
    b: u8,
}

impl VeraColor {
    /// Build from 4-bit channel values. Values above 15 are clamped.
    pub fn new(r: u8, g: u8, b: u8, opaque: bool) -> Self {
        Self {
            a: if opaque {
                ALPHA_OPAQUE
            } else {
                ALPHA_TRANSPARENT
            },
            r: r.min(15),
            g: g.min(15),
            b: b.min(15),
        }
    }

    /// Quantize an 8-bit color.
    ///
    /// Each channel becomes `min((v + 8) / 16, 15)`. Any non-zero alpha is
    /// treated as opaque.
    ///
    /// ```
    /// use vera_bitmap::{Rgba8, VeraColor};
    ///
    /// let c = VeraColor::quantize(Rgba8::new(255, 136, 7, 128));
    /// assert_eq!((c.r(), c.g(), c.b(), c.a()), (15, 9, 0, 15));
    /// ```
    #[inline]
    pub fn quantize(color: Rgba8) -> Self {
        Self {
            a: if color.a > 0 {
                ALPHA_OPAQUE
            } else {
                ALPHA_TRANSPARENT
            },
            r: to_4bit(color.r),
            g: to_4bit(color.g),
            b: to_4bit(color.b),
        }
    }

    #[inline]
    pub fn r(self) -> u8 {
        self.r
    }

    #[inline]
    pub fn g(self) -> u8 {
        self.g
    }

    #[inline]
    pub fn b(self) -> u8 {
        self.b
    }

    /// Alpha flag, either 0 or 15.
    #[inline]
    pub fn a(self) -> u8 {
        self.a
    }

    #[inline]
    pub fn is_opaque(self) -> bool {
        self.a == ALPHA_OPAQUE
    }

    /// The two bytes VERA expects for one palette entry: `[GGGGBBBB, 0000RRRR]`.
    #[inline]
    pub fn to_bytes(self) -> [u8; 2] {
        [(self.g << 4) | self.b, self.r]
    }

    /// The palette entry as a little-endian 16-bit word, `0x0RGB`.
    #[inline]
    pub fn to_word(self) -> u16 {
        u16::from_le_bytes(self.to_bytes())
    }
}

impl From<Rgba8> for VeraColor {
    fn from(color: Rgba8) -> Self {
        Self::quantize(color)
    }
}

impl fmt::Display for VeraColor {
    /// Formats as `$0RGB`, the notation used by assemblers for a palette word.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$0{:X}{:X}{:X}", self.r, self.g, self.b)
    }
}

#[inline]
fn to_4bit(value: u8) -> u8 {
    ((value as u16 + 8) / 16).min(15) as u8
}
