//! Decoded source image.

use crate::color::Rgba8;
use crate::error::ConvertError;

/// A fully decoded image as handed over by the decoder layer.
///
/// Pixels are stored row-major. Indexed sources also carry their original
/// palette, which takes part in transparent-color selection and palette order.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceImage {
    width: u32,
    height: u32,
    pixels: Vec<Rgba8>,
    palette: Option<Vec<Rgba8>>,
}

impl SourceImage {
    /// Create a true-color image.
    ///
    /// # Errors
    ///
    /// [`ConvertError::InvalidImage`] if a dimension is zero or the pixel
    /// count does not match `width * height`.
    pub fn new(width: u32, height: u32, pixels: Vec<Rgba8>) -> Result<Self, ConvertError> {
        if width == 0 || height == 0 {
            return Err(ConvertError::InvalidImage(format!(
                "image has zero size ({width}x{height})"
            )));
        }
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(ConvertError::InvalidImage(format!(
                "expected {expected} pixels for {width}x{height}, got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
            palette: None,
        })
    }

    /// Create a true-color image from tightly packed RGBA bytes.
    pub fn from_rgba_bytes(width: u32, height: u32, bytes: &[u8]) -> Result<Self, ConvertError> {
        if bytes.len() % 4 != 0 {
            return Err(ConvertError::InvalidImage(format!(
                "RGBA buffer length {} is not a multiple of 4",
                bytes.len()
            )));
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|p| Rgba8::new(p[0], p[1], p[2], p[3]))
            .collect();
        Self::new(width, height, pixels)
    }

    /// Create an indexed image, expanding `indices` through `palette`.
    ///
    /// # Errors
    ///
    /// [`ConvertError::InvalidImage`] if the palette is empty, an index points
    /// past the end of the palette, or the dimensions do not match.
    pub fn indexed(
        width: u32,
        height: u32,
        indices: &[u8],
        palette: Vec<Rgba8>,
    ) -> Result<Self, ConvertError> {
        if palette.is_empty() {
            return Err(ConvertError::InvalidImage(
                "indexed image has an empty palette".to_string(),
            ));
        }
        let pixels = indices
            .iter()
            .map(|&i| {
                palette.get(i as usize).copied().ok_or_else(|| {
                    ConvertError::InvalidImage(format!(
                        "pixel index {i} is outside the {}-entry palette",
                        palette.len()
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let mut image = Self::new(width, height, pixels)?;
        image.palette = Some(palette);
        Ok(image)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// All pixels, row-major.
    #[inline]
    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }

    /// The pixel at `(x, y)`. Panics if out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Rgba8 {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// One row of pixels. Panics if `y` is out of bounds.
    #[inline]
    pub fn row(&self, y: u32) -> &[Rgba8] {
        let start = y as usize * self.width as usize;
        &self.pixels[start..start + self.width as usize]
    }

    /// The original palette of an indexed source.
    #[inline]
    pub fn source_palette(&self) -> Option<&[Rgba8]> {
        self.palette.as_deref()
    }

    #[inline]
    pub fn is_indexed(&self) -> bool {
        self.palette.is_some()
    }
}
