use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use vera_bitmap::{PaletteEncoding, Rgba8, TargetKind, TileSize};

use crate::error::ValidationError;

/// Image widths a VERA bitmap layer can display.
pub const BITMAP_WIDTHS: &[u32] = &[320, 640];
/// Valid tile widths and heights.
pub const TILE_SIZES: &[u32] = &[8, 16];
/// Valid sprite widths and heights.
pub const SPRITE_SIZES: &[u32] = &[8, 16, 32, 64];

/// What to convert the image into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ConversionMode {
    /// Raw bitmap image with a separate palette file
    Image,
    /// BMX file with embedded palette
    Bmx,
    /// Tile set (8 or 16 pixels per side)
    Tiles,
    /// Sprite set (8, 16, 32 or 64 pixels per side)
    Sprites,
}

impl ConversionMode {
    pub fn target(self) -> TargetKind {
        match self {
            Self::Image => TargetKind::Image,
            Self::Bmx => TargetKind::Bmx,
            Self::Tiles => TargetKind::Tiles,
            Self::Sprites => TargetKind::Sprites,
        }
    }

    pub fn is_tiled(self) -> bool {
        self.target().is_tiled()
    }

    /// Valid tile/sprite sizes, empty for bitmaps.
    pub fn tile_sizes(self) -> &'static [u32] {
        match self {
            Self::Tiles => TILE_SIZES,
            Self::Sprites => SPRITE_SIZES,
            Self::Image | Self::Bmx => &[],
        }
    }
}

impl fmt::Display for ConversionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.target(), f)
    }
}

/// Palette file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PaletteFormat {
    /// Binary file, loadable into VERA palette RAM
    Bin,
    /// Assembler source with .word directives
    Asm,
    /// BASIC DATA statements
    Bas,
}

impl PaletteFormat {
    pub fn encoding(self) -> PaletteEncoding {
        match self {
            Self::Bin => PaletteEncoding::Binary,
            Self::Asm => PaletteEncoding::Assembly,
            Self::Bas => PaletteEncoding::Basic,
        }
    }
}

/// A conversion as requested on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub input: PathBuf,
    pub mode: ConversionMode,
    /// Tile/sprite width
    pub width: Option<u32>,
    /// Tile/sprite height
    pub height: Option<u32>,
    /// Color that must receive palette index 0
    pub transparent: Option<Rgba8>,
    /// Requested palette format; `None` means the mode's default
    pub palette: Option<PaletteFormat>,
    pub demo: bool,
    /// Output directory; defaults to the input file's directory
    pub out_dir: Option<PathBuf>,
}

impl ConversionRequest {
    pub fn new(input: impl Into<PathBuf>, mode: ConversionMode) -> Self {
        Self {
            input: input.into(),
            mode,
            width: None,
            height: None,
            transparent: None,
            palette: None,
            demo: false,
            out_dir: None,
        }
    }

    /// Check the request against the decoded image size.
    ///
    /// Returns the tile size for tile and sprite modes, `None` for bitmaps.
    pub fn validate(
        &self,
        image_width: u32,
        image_height: u32,
    ) -> Result<Option<TileSize>, ValidationError> {
        if !self.mode.is_tiled() {
            if self.width.is_some() || self.height.is_some() {
                return Err(ValidationError::UnexpectedTileSize { mode: self.mode });
            }
            if !BITMAP_WIDTHS.contains(&image_width) {
                return Err(ValidationError::BitmapWidth { width: image_width });
            }
            return Ok(None);
        }

        let (Some(width), Some(height)) = (self.width, self.height) else {
            return Err(ValidationError::MissingTileSize { mode: self.mode });
        };
        let allowed = self.mode.tile_sizes();
        for (dimension, value) in [("width", width), ("height", height)] {
            if !allowed.contains(&value) {
                return Err(ValidationError::InvalidTileSize {
                    mode: self.mode,
                    dimension,
                    value,
                    allowed,
                });
            }
        }
        for (dimension, size, divisor) in [
            ("width", image_width, width),
            ("height", image_height, height),
        ] {
            if size % divisor != 0 {
                return Err(ValidationError::DimensionMismatch {
                    dimension,
                    size,
                    divisor,
                });
            }
        }
        Ok(Some(TileSize::new(width, height)))
    }

    /// Palette format actually written as a separate file, if any.
    ///
    /// BMX embeds its palette, so only an explicit request produces a file.
    pub fn palette_format(&self) -> Option<PaletteFormat> {
        match (self.mode, self.palette) {
            (ConversionMode::Bmx, requested) => requested,
            (_, requested) => Some(requested.unwrap_or(PaletteFormat::Bin)),
        }
    }
}

/// Sizes from `candidates` that divide `size`.
pub fn sizes_dividing(size: u32, candidates: &[u32]) -> Vec<u32> {
    candidates
        .iter()
        .copied()
        .filter(|&c| size % c == 0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tiled(mode: ConversionMode, width: u32, height: u32) -> ConversionRequest {
        ConversionRequest {
            width: Some(width),
            height: Some(height),
            ..ConversionRequest::new("img.png", mode)
        }
    }

    #[test]
    fn test_bitmap_width_must_be_320_or_640() {
        let request = ConversionRequest::new("img.png", ConversionMode::Image);
        assert_eq!(request.validate(320, 7), Ok(None));
        assert_eq!(request.validate(640, 480), Ok(None));
        assert_eq!(
            request.validate(256, 240),
            Err(ValidationError::BitmapWidth { width: 256 })
        );

        let bmx = ConversionRequest::new("img.png", ConversionMode::Bmx);
        assert!(bmx.validate(100, 100).is_err());
    }

    #[test]
    fn test_bitmap_rejects_tile_size() {
        let request = tiled(ConversionMode::Image, 8, 8);
        assert_eq!(
            request.validate(320, 240),
            Err(ValidationError::UnexpectedTileSize {
                mode: ConversionMode::Image
            })
        );
    }

    #[test]
    fn test_tiles_require_size() {
        let request = ConversionRequest::new("img.png", ConversionMode::Tiles);
        assert_eq!(
            request.validate(64, 64),
            Err(ValidationError::MissingTileSize {
                mode: ConversionMode::Tiles
            })
        );
    }

    #[test]
    fn test_tile_sizes() {
        assert_eq!(
            tiled(ConversionMode::Tiles, 16, 8).validate(64, 64),
            Ok(Some(TileSize::new(16, 8)))
        );
        assert!(matches!(
            tiled(ConversionMode::Tiles, 32, 8).validate(64, 64),
            Err(ValidationError::InvalidTileSize { value: 32, .. })
        ));
    }

    #[test]
    fn test_sprite_sizes() {
        assert_eq!(
            tiled(ConversionMode::Sprites, 64, 32).validate(128, 64),
            Ok(Some(TileSize::new(64, 32)))
        );
        assert!(matches!(
            tiled(ConversionMode::Sprites, 24, 8).validate(48, 8),
            Err(ValidationError::InvalidTileSize {
                dimension: "width",
                ..
            })
        ));
    }

    #[test]
    fn test_size_must_divide_image() {
        assert_eq!(
            tiled(ConversionMode::Sprites, 16, 16).validate(64, 40),
            Err(ValidationError::DimensionMismatch {
                dimension: "height",
                size: 40,
                divisor: 16
            })
        );
    }

    #[test]
    fn test_palette_format_defaults() {
        let mut request = ConversionRequest::new("img.png", ConversionMode::Image);
        assert_eq!(request.palette_format(), Some(PaletteFormat::Bin));
        request.palette = Some(PaletteFormat::Asm);
        assert_eq!(request.palette_format(), Some(PaletteFormat::Asm));

        let mut bmx = ConversionRequest::new("img.png", ConversionMode::Bmx);
        assert_eq!(bmx.palette_format(), None);
        bmx.palette = Some(PaletteFormat::Bas);
        assert_eq!(bmx.palette_format(), Some(PaletteFormat::Bas));
    }

    #[test]
    fn test_sizes_dividing() {
        assert_eq!(sizes_dividing(48, SPRITE_SIZES), vec![8, 16]);
        assert_eq!(sizes_dividing(128, SPRITE_SIZES), vec![8, 16, 32, 64]);
        assert!(sizes_dividing(12, TILE_SIZES).is_empty());
    }
}
