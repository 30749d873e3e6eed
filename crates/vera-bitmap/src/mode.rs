//! Color mode resolution.
//!
//! VERA supports 1, 2, 4 and 8 bits per pixel for bitmap layers and tiles, but
//! only 4 and 8 for sprites. The mode is the smallest one whose color count
//! covers the realized palette.

use std::fmt;

use crate::error::ConvertError;
use crate::palette::MAX_COLORS;

const BITMAP_COLOR_COUNTS: &[usize] = &[2, 4, 16, 256];
const SPRITE_COLOR_COUNTS: &[usize] = &[16, 256];

/// What the packed pixels are meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// Raw bitmap for a VERA bitmap layer.
    Image,
    /// Bitmap in the BMX container.
    Bmx,
    /// Tile set for a tile layer.
    Tiles,
    /// Sprite set.
    Sprites,
}

impl TargetKind {
    /// Color counts the hardware supports for this target, ascending. The
    /// position in this list is the hardware color-depth code.
    pub fn supported_color_counts(self) -> &'static [usize] {
        match self {
            Self::Sprites => SPRITE_COLOR_COUNTS,
            Self::Image | Self::Bmx | Self::Tiles => BITMAP_COLOR_COUNTS,
        }
    }

    /// Whether pixels are packed per tile rather than per image row.
    #[inline]
    pub fn is_tiled(self) -> bool {
        matches!(self, Self::Tiles | Self::Sprites)
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Image => "image",
            Self::Bmx => "bmx",
            Self::Tiles => "tiles",
            Self::Sprites => "sprites",
        };
        f.write_str(name)
    }
}

/// Bit depth derived from a palette size and target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorMode {
    color_count: usize,
    bits_per_pixel: u8,
    pixels_per_byte: u8,
    color_depth: u8,
}

impl ColorMode {
    /// Pick the smallest supported mode that holds `palette_len` colors.
    ///
    /// A palette of 0 or 1 colors still resolves to the smallest mode.
    ///
    /// ```
    /// use vera_bitmap::{ColorMode, TargetKind};
    ///
    /// let mode = ColorMode::resolve(3, TargetKind::Image).unwrap();
    /// assert_eq!(mode.color_count(), 4);
    /// assert_eq!(mode.bits_per_pixel(), 2);
    /// assert_eq!(mode.pixels_per_byte(), 4);
    /// assert_eq!(mode.color_depth(), 1);
    /// ```
    ///
    /// # Errors
    ///
    /// [`ConvertError::CapacityExceeded`] if `palette_len` is above 256.
    pub fn resolve(palette_len: usize, target: TargetKind) -> Result<Self, ConvertError> {
        let counts = target.supported_color_counts();
        let (depth, &color_count) = counts
            .iter()
            .enumerate()
            .find(|&(_, &count)| count >= palette_len)
            .ok_or(ConvertError::CapacityExceeded {
                colors: palette_len,
                max: MAX_COLORS,
            })?;

        let bits_per_pixel = color_count.trailing_zeros() as u8;
        let mode = Self {
            color_count,
            bits_per_pixel,
            pixels_per_byte: 8 / bits_per_pixel,
            color_depth: depth as u8,
        };
        tracing::debug!(
            palette_len,
            target = %target,
            color_count,
            bits_per_pixel,
            "Color mode resolved"
        );
        Ok(mode)
    }

    /// Number of colors addressable in this mode.
    #[inline]
    pub fn color_count(&self) -> usize {
        self.color_count
    }

    #[inline]
    pub fn bits_per_pixel(&self) -> u8 {
        self.bits_per_pixel
    }

    #[inline]
    pub fn pixels_per_byte(&self) -> u8 {
        self.pixels_per_byte
    }

    /// Hardware color-depth code.
    #[inline]
    pub fn color_depth(&self) -> u8 {
        self.color_depth
    }

    /// Packed size in bytes of `width * height` pixels, rounded up.
    #[inline]
    pub fn packed_len(&self, width: u32, height: u32) -> usize {
        (width as usize * height as usize).div_ceil(self.pixels_per_byte as usize)
    }
}
