//! Transparency selection and index assignment.
//!
//! Index 0 is reserved for the color the hardware treats as transparent.
//! Which color lands there is decided by a short list of rules tried in
//! order:
//!
//! 1. an indexed source keeps its own entry 0,
//! 2. otherwise an explicit override color, which must occur in the image,
//! 3. otherwise the first fully transparent pixel in row-major order,
//! 4. otherwise the top-left pixel.
//!
//! Every other color receives the next free index in order of first
//! appearance.

use std::collections::HashMap;
use std::fmt;

use super::palette::{Palette, Provenance, MAX_COLORS};
use crate::color::{Rgba8, VeraColor};
use crate::error::ConvertError;
use crate::image::SourceImage;

/// Which rule selected the index-0 color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransparencySource {
    /// Entry 0 of the source image's own palette.
    SourcePalette,
    /// The caller's explicit override color.
    Override,
    /// The first pixel with alpha 0.
    FirstTransparentPixel { x: u32, y: u32 },
    /// The pixel at (0, 0).
    TopLeftPixel,
}

impl fmt::Display for TransparencySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SourcePalette => f.write_str("first entry of the source palette"),
            Self::Override => f.write_str("specified transparent color"),
            Self::FirstTransparentPixel { x, y } => {
                write!(f, "first transparent pixel at ({x}, {y})")
            }
            Self::TopLeftPixel => f.write_str("top-left pixel"),
        }
    }
}

/// Order in which the selection rules are tried.
const STRATEGIES: [Strategy; 4] = [
    Strategy::SourcePalette,
    Strategy::Override,
    Strategy::FirstTransparentPixel,
    Strategy::TopLeftPixel,
];

#[derive(Debug, Clone, Copy)]
enum Strategy {
    SourcePalette,
    Override,
    FirstTransparentPixel,
    TopLeftPixel,
}

/// Builds a [`Palette`] and [`Provenance`] from a source image.
///
/// # Example
///
/// ```
/// use vera_bitmap::{PaletteBuilder, Rgba8, SourceImage, TransparencySource};
///
/// let red = Rgba8::opaque(255, 0, 0);
/// let blue = Rgba8::opaque(0, 0, 255);
/// let image = SourceImage::new(2, 1, vec![red, blue]).unwrap();
///
/// let (palette, _) = PaletteBuilder::new(&image).build().unwrap();
/// assert_eq!(palette.len(), 2);
/// assert_eq!(palette.selected_by(), TransparencySource::TopLeftPixel);
/// ```
#[derive(Debug, Clone)]
pub struct PaletteBuilder<'a> {
    image: &'a SourceImage,
    transparent: Option<Rgba8>,
}

impl<'a> PaletteBuilder<'a> {
    pub fn new(image: &'a SourceImage) -> Self {
        Self {
            image,
            transparent: None,
        }
    }

    /// Request a specific color for index 0.
    ///
    /// Ignored for indexed sources, whose own entry 0 always wins. The
    /// override is not looked up in the source palette either: moving a
    /// palette entry to index 0 would put two source entries on one index
    /// and redraw every pixel that used the old entry 0. A warning is
    /// logged instead, and an override missing from the source palette is
    /// not an error.
    pub fn transparent_color(mut self, color: Option<Rgba8>) -> Self {
        self.transparent = color;
        self
    }

    /// Build and enforce the [`MAX_COLORS`] limit.
    ///
    /// # Errors
    ///
    /// - [`ConvertError::TransparentColorNotFound`] if the override color is
    ///   not in the image.
    /// - [`ConvertError::CapacityExceeded`] if more than 256 distinct
    ///   quantized colors are found.
    pub fn build(&self) -> Result<(Palette, Provenance), ConvertError> {
        self.draft()?.finish()
    }

    /// Assign indices without enforcing the color limit.
    ///
    /// Analysis uses this to report on images that cannot be converted.
    pub fn draft(&self) -> Result<PaletteDraft, ConvertError> {
        let (transparent, selected_by) = self.select_transparent()?;

        let mut draft = PaletteDraft {
            colors: Vec::new(),
            lookup: HashMap::new(),
            provenance: Provenance::new(),
            selected_by,
        };
        draft.add(transparent);

        match self.image.source_palette() {
            Some(entries) => entries.iter().for_each(|&c| draft.add(c)),
            None => self.image.pixels().iter().for_each(|&c| draft.add(c)),
        }

        tracing::debug!(
            colors = draft.len(),
            original_colors = draft.provenance.original_color_count(),
            selected_by = %selected_by,
            "Palette assigned"
        );
        Ok(draft)
    }

    fn select_transparent(&self) -> Result<(Rgba8, TransparencySource), ConvertError> {
        if let (Some(color), true) = (self.transparent, self.image.is_indexed()) {
            tracing::warn!(
                color = %color,
                "Transparent color ignored, indexed image keeps its first palette entry"
            );
        }

        for strategy in STRATEGIES {
            if let Some(selection) = self.try_strategy(strategy)? {
                return Ok(selection);
            }
        }
        // TopLeftPixel always matches on a non-empty image.
        Err(ConvertError::InvalidImage("image has no pixels".to_string()))
    }

    fn try_strategy(
        &self,
        strategy: Strategy,
    ) -> Result<Option<(Rgba8, TransparencySource)>, ConvertError> {
        let image = self.image;
        let selection = match strategy {
            Strategy::SourcePalette => image
                .source_palette()
                .and_then(|p| p.first().copied())
                .map(|c| (c, TransparencySource::SourcePalette)),
            Strategy::Override => match self.transparent {
                None => None,
                Some(wanted) => {
                    if !image.pixels().contains(&wanted) {
                        return Err(ConvertError::TransparentColorNotFound { color: wanted });
                    }
                    Some((wanted, TransparencySource::Override))
                }
            },
            Strategy::FirstTransparentPixel => image
                .pixels()
                .iter()
                .position(|p| p.is_transparent())
                .map(|i| {
                    let x = (i % image.width() as usize) as u32;
                    let y = (i / image.width() as usize) as u32;
                    (
                        image.pixels()[i],
                        TransparencySource::FirstTransparentPixel { x, y },
                    )
                }),
            Strategy::TopLeftPixel => image
                .pixels()
                .first()
                .map(|&c| (c, TransparencySource::TopLeftPixel)),
        };
        Ok(selection)
    }
}

/// Index assignment before the capacity check.
#[derive(Debug, Clone)]
pub struct PaletteDraft {
    colors: Vec<VeraColor>,
    lookup: HashMap<VeraColor, usize>,
    provenance: Provenance,
    selected_by: TransparencySource,
}

impl PaletteDraft {
    fn add(&mut self, color: Rgba8) {
        let quantized = self.provenance.record(color);
        if !self.lookup.contains_key(&quantized) {
            self.lookup.insert(quantized, self.colors.len());
            self.colors.push(quantized);
        }
    }

    /// Number of distinct quantized colors.
    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Colors in index order, possibly more than [`MAX_COLORS`].
    #[inline]
    pub fn colors(&self) -> &[VeraColor] {
        &self.colors
    }

    #[inline]
    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    #[inline]
    pub fn selected_by(&self) -> TransparencySource {
        self.selected_by
    }

    /// Whether the draft fits the hardware palette.
    #[inline]
    pub fn fits(&self) -> bool {
        self.colors.len() <= MAX_COLORS
    }

    /// Turn the draft into a [`Palette`].
    ///
    /// # Errors
    ///
    /// [`ConvertError::CapacityExceeded`] if there are more than
    /// [`MAX_COLORS`] colors.
    pub fn finish(self) -> Result<(Palette, Provenance), ConvertError> {
        if !self.fits() {
            return Err(ConvertError::CapacityExceeded {
                colors: self.colors.len(),
                max: MAX_COLORS,
            });
        }
        Ok((
            Palette::from_ordered(self.colors, self.selected_by),
            self.provenance,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba8 = Rgba8::new(255, 0, 0, 255);
    const GREEN: Rgba8 = Rgba8::new(0, 255, 0, 255);
    const BLUE: Rgba8 = Rgba8::new(0, 0, 255, 255);
    const CLEAR: Rgba8 = Rgba8::new(0, 0, 0, 0);

    /// A color whose quantized form differs for every `i` below 512.
    fn distinct_color(i: u32) -> Rgba8 {
        let r = (i % 16 * 16) as u8;
        let g = (i / 16 % 16 * 16) as u8;
        let b = if i >= 256 { 255 } else { 0 };
        Rgba8::opaque(r, g, b)
    }

    fn image(width: u32, pixels: Vec<Rgba8>) -> SourceImage {
        let height = pixels.len() as u32 / width;
        SourceImage::new(width, height, pixels).unwrap()
    }

    #[test]
    fn test_top_left_when_nothing_transparent() {
        let img = image(3, vec![GREEN, RED, BLUE]);
        let (palette, _) = PaletteBuilder::new(&img).build().unwrap();
        assert_eq!(palette.selected_by(), TransparencySource::TopLeftPixel);
        assert_eq!(palette.transparent_color(), VeraColor::quantize(GREEN));
        assert_eq!(palette.index_of(VeraColor::quantize(RED)), Some(1));
        assert_eq!(palette.index_of(VeraColor::quantize(BLUE)), Some(2));
    }

    #[test]
    fn test_first_transparent_pixel_wins() {
        let clear_white = Rgba8::new(255, 255, 255, 0);
        let img = image(2, vec![RED, GREEN, CLEAR, clear_white]);
        let (palette, _) = PaletteBuilder::new(&img).build().unwrap();
        assert_eq!(
            palette.selected_by(),
            TransparencySource::FirstTransparentPixel { x: 0, y: 1 }
        );
        assert_eq!(palette.transparent_color(), VeraColor::quantize(CLEAR));
        assert_eq!(palette.index_of(VeraColor::quantize(RED)), Some(1));
        assert_eq!(palette.index_of(VeraColor::quantize(GREEN)), Some(2));
        assert_eq!(palette.index_of(VeraColor::quantize(clear_white)), Some(3));
    }

    #[test]
    fn test_override_beats_transparent_pixel() {
        let img = image(3, vec![RED, CLEAR, BLUE]);
        let (palette, _) = PaletteBuilder::new(&img)
            .transparent_color(Some(BLUE))
            .build()
            .unwrap();
        assert_eq!(palette.selected_by(), TransparencySource::Override);
        assert_eq!(palette.transparent_color(), VeraColor::quantize(BLUE));
        assert_eq!(palette.index_of(VeraColor::quantize(RED)), Some(1));
        assert_eq!(palette.index_of(VeraColor::quantize(CLEAR)), Some(2));
    }

    #[test]
    fn test_override_must_match_exactly() {
        // Quantizes like RED but is a different 8-bit color.
        let near_red = Rgba8::opaque(250, 0, 0);
        let img = image(2, vec![RED, GREEN]);
        let err = PaletteBuilder::new(&img)
            .transparent_color(Some(near_red))
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConvertError::TransparentColorNotFound { color } if color == near_red
        ));
    }

    #[test]
    fn test_source_palette_entry_zero_wins_over_override() {
        let palette_in = vec![BLUE, RED, GREEN];
        let img = SourceImage::indexed(2, 1, &[1, 2], palette_in).unwrap();
        let (palette, provenance) = PaletteBuilder::new(&img)
            .transparent_color(Some(RED))
            .build()
            .unwrap();
        assert_eq!(palette.selected_by(), TransparencySource::SourcePalette);
        // Entry 0 is selected even though no pixel uses it.
        assert_eq!(palette.colors()[0], VeraColor::quantize(BLUE));
        assert_eq!(palette.len(), 3);
        assert_eq!(provenance.original_color_count(), 3);
    }

    #[test]
    fn test_override_absent_from_indexed_source_is_not_an_error() {
        let img = SourceImage::indexed(2, 1, &[0, 1], vec![BLUE, RED]).unwrap();
        let (palette, _) = PaletteBuilder::new(&img)
            .transparent_color(Some(GREEN))
            .build()
            .unwrap();
        assert_eq!(palette.selected_by(), TransparencySource::SourcePalette);
        assert_eq!(palette.index_of(VeraColor::quantize(GREEN)), None);
        assert_eq!(palette.colors()[0], VeraColor::quantize(BLUE));
    }

    #[test]
    fn test_near_colors_share_an_index() {
        let img = image(3, vec![RED, Rgba8::opaque(250, 3, 2), GREEN]);
        let (palette, provenance) = PaletteBuilder::new(&img).build().unwrap();
        assert_eq!(palette.len(), 2);
        assert_eq!(provenance.original_color_count(), 3);
        assert_eq!(provenance.originals(VeraColor::quantize(RED)).len(), 2);
    }

    #[test]
    fn test_capacity_exceeded() {
        let pixels: Vec<Rgba8> = (0..272u32).map(distinct_color).collect();
        let img = image(16, pixels);

        let draft = PaletteBuilder::new(&img).draft().unwrap();
        assert_eq!(draft.len(), 272);
        assert!(!draft.fits());

        let err = draft.finish().unwrap_err();
        assert!(matches!(
            err,
            ConvertError::CapacityExceeded { colors: 272, max: 256 }
        ));
    }

    #[test]
    fn test_exactly_256_colors_fit() {
        let pixels: Vec<Rgba8> = (0..256u32).map(distinct_color).collect();
        let img = image(16, pixels);
        let (palette, _) = PaletteBuilder::new(&img).build().unwrap();
        assert_eq!(palette.len(), 256);
        assert_eq!(palette.index_of(palette.colors()[255]), Some(255));
    }
}
