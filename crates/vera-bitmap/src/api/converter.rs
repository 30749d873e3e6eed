//! Converter builder -- the main entry point of the crate.

use std::io::Write;

use crate::color::Rgba8;
use crate::error::ConvertError;
use crate::format::{write_bmx, write_palette, write_raw, BmxHeader, PaletteEncoding};
use crate::image::SourceImage;
use crate::mode::{ColorMode, TargetKind};
use crate::pack::{PixelPacker, TileSize};
use crate::palette::{Palette, PaletteBuilder, Provenance};

/// Converts a [`SourceImage`] into packed VERA data.
///
/// - Constructor takes the [`TargetKind`]
/// - Configuration methods consume and return `self`
/// - [`convert()`](Self::convert) takes `&self` so one converter can be
///   reused for many images
///
/// # Example
///
/// ```
/// use vera_bitmap::{Converter, Rgba8, SourceImage, TargetKind};
///
/// let red = Rgba8::opaque(255, 0, 0);
/// let green = Rgba8::opaque(0, 255, 0);
/// let blue = Rgba8::opaque(0, 0, 255);
/// let image = SourceImage::new(2, 2, vec![red, red, green, blue]).unwrap();
///
/// let conversion = Converter::new(TargetKind::Image).convert(&image).unwrap();
/// assert_eq!(conversion.palette().len(), 3);
/// assert_eq!(conversion.mode().bits_per_pixel(), 2);
/// assert_eq!(conversion.pixels(), &[0b00_00_01_10]);
/// ```
#[derive(Debug, Clone)]
pub struct Converter {
    target: TargetKind,
    tile: Option<TileSize>,
    transparent: Option<Rgba8>,
}

impl Converter {
    pub fn new(target: TargetKind) -> Self {
        Self {
            target,
            tile: None,
            transparent: None,
        }
    }

    /// Set the tile or sprite size. Only used by tiled targets.
    #[inline]
    pub fn tile_size(mut self, width: u32, height: u32) -> Self {
        self.tile = Some(TileSize::new(width, height));
        self
    }

    /// Request a specific color for palette index 0.
    ///
    /// Indexed sources keep their own entry 0 and ignore this; see
    /// [`PaletteBuilder::transparent_color`](crate::PaletteBuilder::transparent_color).
    #[inline]
    pub fn transparent_color(mut self, color: Rgba8) -> Self {
        self.transparent = Some(color);
        self
    }

    /// Build the palette, resolve the color mode and pack the pixels.
    ///
    /// Nothing is written anywhere; the result holds everything in memory.
    ///
    /// # Errors
    ///
    /// Any [`ConvertError`] from palette building, mode resolution or
    /// packing.
    pub fn convert(&self, image: &SourceImage) -> Result<Conversion, ConvertError> {
        let (palette, provenance) = PaletteBuilder::new(image)
            .transparent_color(self.transparent)
            .build()?;
        let mode = ColorMode::resolve(palette.len(), self.target)?;

        let tile = self.tile.filter(|_| self.target.is_tiled());
        let pixels = PixelPacker::new(&palette, mode)
            .tile_size(tile)
            .pack(image)?;

        tracing::debug!(
            target_kind = %self.target,
            colors = palette.len(),
            bytes = pixels.len(),
            "Conversion finished"
        );

        Ok(Conversion {
            target: self.target,
            width: image.width(),
            height: image.height(),
            tile,
            indexed_source: image.is_indexed(),
            palette,
            provenance,
            mode,
            pixels,
        })
    }
}

/// The result of one conversion.
#[derive(Debug, Clone)]
pub struct Conversion {
    target: TargetKind,
    width: u32,
    height: u32,
    tile: Option<TileSize>,
    indexed_source: bool,
    palette: Palette,
    provenance: Provenance,
    mode: ColorMode,
    pixels: Vec<u8>,
}

impl Conversion {
    #[inline]
    pub fn target(&self) -> TargetKind {
        self.target
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Tile or sprite size, `None` for bitmap targets.
    #[inline]
    pub fn tile(&self) -> Option<TileSize> {
        self.tile
    }

    /// Whether the source image was indexed.
    #[inline]
    pub fn indexed_source(&self) -> bool {
        self.indexed_source
    }

    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    #[inline]
    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    #[inline]
    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    /// Packed pixel data without any header.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Number of tiles, 1 for bitmap targets.
    pub fn tile_count(&self) -> usize {
        match self.tile {
            Some(tile) => (self.width / tile.width * (self.height / tile.height)) as usize,
            None => 1,
        }
    }

    /// Packed size of one tile in bytes.
    pub fn tile_bytes(&self) -> usize {
        self.pixels.len() / self.tile_count()
    }

    /// Write the image file: BMX for [`TargetKind::Bmx`], raw otherwise.
    pub fn write_image<W: Write>(&self, out: W) -> Result<usize, ConvertError> {
        match self.target {
            TargetKind::Bmx => {
                let header =
                    BmxHeader::new(&self.mode, self.width, self.height, self.palette.len())?;
                write_bmx(out, &header, &self.palette, &self.pixels)
            }
            TargetKind::Image | TargetKind::Tiles | TargetKind::Sprites => {
                write_raw(out, &self.pixels)
            }
        }
    }

    /// Write the palette in `encoding`.
    pub fn write_palette<W: Write>(
        &self,
        out: W,
        encoding: PaletteEncoding,
    ) -> Result<usize, ConvertError> {
        write_palette(out, &self.palette, encoding)
    }
}
