//! 8-bit RGBA source color
//!
//! Source pixels and source palette entries are carried as [`Rgba8`] from the
//! decoder to the palette builder. The type also parses the `$AARRGGBB`
//! literal used to request a specific transparent color.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseColorError;

/// A color with 8 bits per channel, straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    /// Create a color from its four channels.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a fully opaque color.
    #[inline]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Returns true if alpha is exactly zero.
    ///
    /// Semi-transparent colors are *not* transparent here; they are packed
    /// with their palette index like any opaque color.
    #[inline]
    pub fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// Pack as `0xRRGGBBAA`. This is the value recorded in the provenance map.
    #[inline]
    pub fn to_rgba_u32(self) -> u32 {
        u32::from_be_bytes([self.r, self.g, self.b, self.a])
    }

    /// Inverse of [`to_rgba_u32`](Self::to_rgba_u32).
    #[inline]
    pub fn from_rgba_u32(value: u32) -> Self {
        let [r, g, b, a] = value.to_be_bytes();
        Self { r, g, b, a }
    }

    /// Pack as `0xAARRGGBB`.
    #[inline]
    pub fn to_argb_u32(self) -> u32 {
        u32::from_be_bytes([self.a, self.r, self.g, self.b])
    }

    /// Unpack from `0xAARRGGBB`.
    #[inline]
    pub fn from_argb_u32(value: u32) -> Self {
        let [a, r, g, b] = value.to_be_bytes();
        Self { r, g, b, a }
    }

    /// Build from a slice of 4 bytes in R, G, B, A order.
    ///
    /// Returns `None` if the slice is not exactly 4 bytes long.
    pub fn from_rgba_slice(bytes: &[u8]) -> Option<Self> {
        match *bytes {
            [r, g, b, a] => Some(Self { r, g, b, a }),
            _ => None,
        }
    }
}

impl fmt::Display for Rgba8 {
    /// Formats as `$AARRGGBB`, the same notation accepted by [`FromStr`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:08X}", self.to_argb_u32())
    }
}

impl FromStr for Rgba8 {
    type Err = ParseColorError;

    /// Parse an ARGB literal.
    ///
    /// Accepts exactly eight hex digits in `AARRGGBB` order, optionally
    /// prefixed by `$`, `#` or `0x`. Parsing is case-insensitive and
    /// surrounding whitespace is ignored.
    ///
    /// ```
    /// use vera_bitmap::Rgba8;
    ///
    /// let c: Rgba8 = "$FF102030".parse().unwrap();
    /// assert_eq!(c, Rgba8::new(0x10, 0x20, 0x30, 0xFF));
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let digits = s
            .strip_prefix('$')
            .or_else(|| s.strip_prefix('#'))
            .or_else(|| s.strip_prefix("0x"))
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);

        if digits.len() != 8 {
            return Err(ParseColorError::InvalidLength(digits.len()));
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseColorError::InvalidHex(digits.to_string()));
        }
        let value = u32::from_str_radix(digits, 16)
            .map_err(|_| ParseColorError::InvalidHex(digits.to_string()))?;
        Ok(Self::from_argb_u32(value))
    }
}
