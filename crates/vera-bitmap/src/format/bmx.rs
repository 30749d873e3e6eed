//! BMX container and raw image files.
//!
//! A BMX file is a 32-byte header, the palette at 2 bytes per entry, then the
//! packed pixels:
//!
//! | offset | size | field                                  |
//! |--------|------|----------------------------------------|
//! | 0      | 3    | magic `BMX`                            |
//! | 3      | 1    | version, always 1                      |
//! | 4      | 1    | bits per pixel                         |
//! | 5      | 1    | VERA color depth code                  |
//! | 6      | 2    | width, little-endian                   |
//! | 8      | 2    | height, little-endian                  |
//! | 10     | 1    | palette entries used, 0 means 256      |
//! | 11     | 1    | palette start index, always 0          |
//! | 12     | 2    | offset of the pixel data, little-endian|
//! | 14     | 1    | compression, always 0                  |
//! | 15     | 1    | border color, always 0                 |
//! | 16     | 16   | reserved                               |

use std::io::Write;

use crate::error::ConvertError;
use crate::mode::ColorMode;
use crate::palette::{Palette, MAX_COLORS};

pub const BMX_MAGIC: [u8; 3] = *b"BMX";
pub const BMX_VERSION: u8 = 1;
pub const BMX_HEADER_LEN: usize = 32;

/// Load-address header of a raw `.BIN` file.
pub const RAW_HEADER: [u8; 2] = [0, 0];

/// The fixed 32-byte BMX header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BmxHeader {
    pub bits_per_pixel: u8,
    pub color_depth: u8,
    pub width: u16,
    pub height: u16,
    /// Palette entries stored in the file, 1 to 256.
    pub palette_len: u16,
    /// Offset of the pixel data from the start of the file.
    pub data_offset: u16,
}

impl BmxHeader {
    /// Header for an image of `width` x `height` pixels.
    ///
    /// # Errors
    ///
    /// - [`ConvertError::DimensionTooLarge`] if a dimension exceeds 65535.
    /// - [`ConvertError::CapacityExceeded`] if `palette_len` is above 256.
    /// - [`ConvertError::InvalidHeader`] if `palette_len` is 0.
    pub fn new(
        mode: &ColorMode,
        width: u32,
        height: u32,
        palette_len: usize,
    ) -> Result<Self, ConvertError> {
        let too_large = || ConvertError::DimensionTooLarge { width, height };
        let width16 = u16::try_from(width).map_err(|_| too_large())?;
        let height16 = u16::try_from(height).map_err(|_| too_large())?;

        if palette_len == 0 {
            return Err(ConvertError::InvalidHeader("empty palette".to_string()));
        }
        if palette_len > MAX_COLORS {
            return Err(ConvertError::CapacityExceeded {
                colors: palette_len,
                max: MAX_COLORS,
            });
        }

        Ok(Self {
            bits_per_pixel: mode.bits_per_pixel(),
            color_depth: mode.color_depth(),
            width: width16,
            height: height16,
            palette_len: palette_len as u16,
            data_offset: (palette_len * 2 + BMX_HEADER_LEN) as u16,
        })
    }

    pub fn to_bytes(&self) -> [u8; BMX_HEADER_LEN] {
        let mut bytes = [0u8; BMX_HEADER_LEN];
        bytes[0..3].copy_from_slice(&BMX_MAGIC);
        bytes[3] = BMX_VERSION;
        bytes[4] = self.bits_per_pixel;
        bytes[5] = self.color_depth;
        bytes[6..8].copy_from_slice(&self.width.to_le_bytes());
        bytes[8..10].copy_from_slice(&self.height.to_le_bytes());
        // 256 wraps to 0
        bytes[10] = self.palette_len as u8;
        bytes[12..14].copy_from_slice(&self.data_offset.to_le_bytes());
        bytes
    }

    /// Read a header from the start of a BMX file.
    ///
    /// # Errors
    ///
    /// [`ConvertError::InvalidHeader`] if the data is shorter than 32 bytes or
    /// the magic or version do not match.
    pub fn parse(bytes: &[u8]) -> Result<Self, ConvertError> {
        if bytes.len() < BMX_HEADER_LEN {
            return Err(ConvertError::InvalidHeader(format!(
                "expected at least {BMX_HEADER_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        if bytes[0..3] != BMX_MAGIC {
            return Err(ConvertError::InvalidHeader("missing BMX magic".to_string()));
        }
        if bytes[3] != BMX_VERSION {
            return Err(ConvertError::InvalidHeader(format!(
                "unsupported version {}",
                bytes[3]
            )));
        }
        let palette_len = match bytes[10] {
            0 => MAX_COLORS as u16,
            n => u16::from(n),
        };
        Ok(Self {
            bits_per_pixel: bytes[4],
            color_depth: bytes[5],
            width: u16::from_le_bytes([bytes[6], bytes[7]]),
            height: u16::from_le_bytes([bytes[8], bytes[9]]),
            palette_len,
            data_offset: u16::from_le_bytes([bytes[12], bytes[13]]),
        })
    }
}

/// Write a BMX file: header, palette, pixels.
pub fn write_bmx<W: Write>(
    mut out: W,
    header: &BmxHeader,
    palette: &Palette,
    pixels: &[u8],
) -> Result<usize, ConvertError> {
    let header_bytes = header.to_bytes();
    let palette_bytes = palette.to_bytes();
    out.write_all(&header_bytes)?;
    out.write_all(&palette_bytes)?;
    out.write_all(pixels)?;
    out.flush()?;
    Ok(header_bytes.len() + palette_bytes.len() + pixels.len())
}

/// Write a raw image file: 2-byte zero header, pixels.
pub fn write_raw<W: Write>(mut out: W, pixels: &[u8]) -> Result<usize, ConvertError> {
    out.write_all(&RAW_HEADER)?;
    out.write_all(pixels)?;
    out.flush()?;
    Ok(RAW_HEADER.len() + pixels.len())
}
