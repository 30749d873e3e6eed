//! Pixel packing
//!
//! Packs palette indices MSB-first, `pixels_per_byte` pixels per byte, either
//! as one continuous scan or as a sequence of tiles. Each tile is packed as
//! one run of pixels, so a byte may span two rows of a narrow tile.

use crate::color::{Rgba8, VeraColor};
use crate::error::ConvertError;
use crate::image::SourceImage;
use crate::mode::ColorMode;
use crate::palette::Palette;

/// Width and height of one tile or sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileSize {
    pub width: u32,
    pub height: u32,
}

impl TileSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of pixels in one tile.
    #[inline]
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Packs a [`SourceImage`] into a byte stream using a realized [`Palette`].
///
/// Tiles are emitted row-major across the image. Inside a tile rows run top
/// to bottom. Any pixel with alpha exactly 0 packs as index 0, whatever
/// index its quantized color was assigned.
#[derive(Debug, Clone)]
pub struct PixelPacker<'a> {
    palette: &'a Palette,
    mode: ColorMode,
    tile: Option<TileSize>,
}

impl<'a> PixelPacker<'a> {
    pub fn new(palette: &'a Palette, mode: ColorMode) -> Self {
        Self {
            palette,
            mode,
            tile: None,
        }
    }

    /// Partition the image into tiles of `tile` pixels. `None` packs the
    /// whole image as a single tile.
    pub fn tile_size(mut self, tile: Option<TileSize>) -> Self {
        self.tile = tile;
        self
    }

    /// Pack every pixel of `image`.
    ///
    /// # Errors
    ///
    /// - [`ConvertError::ModeMismatch`] if the palette does not fit the mode.
    /// - [`ConvertError::DimensionMismatch`] if the tile size does not divide
    ///   the image.
    /// - [`ConvertError::InternalConsistency`] if a pixel's color is missing
    ///   from the palette.
    pub fn pack(&self, image: &SourceImage) -> Result<Vec<u8>, ConvertError> {
        if self.palette.len() > self.mode.color_count() {
            return Err(ConvertError::ModeMismatch {
                colors: self.palette.len(),
                color_count: self.mode.color_count(),
            });
        }

        let tile = self
            .tile
            .unwrap_or(TileSize::new(image.width(), image.height()));
        check_divides("image width", image.width(), tile.width)?;
        check_divides("image height", image.height(), tile.height)?;

        let bits = self.mode.bits_per_pixel();
        let pixels_per_byte = self.mode.pixels_per_byte() as usize;
        let mut packed = Vec::with_capacity(self.mode.packed_len(image.width(), image.height()));

        for tile_y in (0..image.height()).step_by(tile.height as usize) {
            for tile_x in (0..image.width()).step_by(tile.width as usize) {
                let mut byte = 0u8;
                let mut slot = 0usize;
                for y in tile_y..tile_y + tile.height {
                    let start = tile_x as usize;
                    for &pixel in &image.row(y)[start..start + tile.width as usize] {
                        let shift = 8 - (slot as u8 + 1) * bits;
                        byte |= self.index_of(pixel)? << shift;
                        slot += 1;
                        if slot == pixels_per_byte {
                            packed.push(byte);
                            byte = 0;
                            slot = 0;
                        }
                    }
                }
                // A tile whose area is not a whole number of bytes ends padded.
                if slot > 0 {
                    packed.push(byte);
                }
            }
        }

        tracing::debug!(
            bytes = packed.len(),
            tile_width = tile.width,
            tile_height = tile.height,
            bits_per_pixel = bits,
            "Pixels packed"
        );
        Ok(packed)
    }

    /// Palette index a pixel packs to.
    pub fn index_of(&self, pixel: Rgba8) -> Result<u8, ConvertError> {
        if pixel.is_transparent() {
            return Ok(0);
        }
        let color = VeraColor::quantize(pixel);
        self.palette
            .index_of(color)
            .ok_or(ConvertError::InternalConsistency { color })
    }
}

fn check_divides(dimension: &'static str, size: u32, divisor: u32) -> Result<(), ConvertError> {
    if divisor == 0 || size % divisor != 0 {
        return Err(ConvertError::DimensionMismatch {
            dimension,
            size,
            divisor,
        });
    }
    Ok(())
}

/// Unpack the first `count` indices from a packed stream, in packing order.
///
/// Returns `None` unless `bits_per_pixel` is 1, 2, 4 or 8.
pub fn unpack_indices(bytes: &[u8], bits_per_pixel: u8, count: usize) -> Option<Vec<u8>> {
    if !matches!(bits_per_pixel, 1 | 2 | 4 | 8) {
        return None;
    }
    let pixels_per_byte = 8 / bits_per_pixel as usize;
    let mask = ((1u16 << bits_per_pixel) - 1) as u8;
    let indices = bytes
        .iter()
        .flat_map(|&byte| {
            (0..pixels_per_byte).map(move |slot| {
                let shift = 8 - (slot as u8 + 1) * bits_per_pixel;
                (byte >> shift) & mask
            })
        })
        .take(count)
        .collect();
    Some(indices)
}
