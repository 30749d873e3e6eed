use std::fs;
use std::io::Cursor;
use std::path::Path;

use png::{BitDepth, ColorType, Transformations};
use vera_bitmap::{Rgba8, SourceImage};

use crate::error::DecodeError;

/// Read and decode a PNG file.
pub fn read_png(path: &Path) -> Result<SourceImage, DecodeError> {
    let bytes = fs::read(path).map_err(|source| DecodeError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    decode_png(&bytes, path)
}

/// Decode PNG data. `path` is only used in error messages.
pub fn decode_png(bytes: &[u8], path: &Path) -> Result<SourceImage, DecodeError> {
    let header = png::Decoder::new(Cursor::new(bytes))
        .read_info()
        .map_err(|e| png_error(path, e))?;
    let color_type = header.info().color_type;
    drop(header);

    let image = if color_type == ColorType::Indexed {
        decode_indexed(bytes, path)?
    } else {
        decode_rgba(bytes, path)?
    };
    tracing::debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        indexed = image.is_indexed(),
        "PNG decoded"
    );
    Ok(image)
}

/// Indexed PNG: keep indices and the PLTE/tRNS palette.
fn decode_indexed(bytes: &[u8], path: &Path) -> Result<SourceImage, DecodeError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(Transformations::IDENTITY);
    let mut reader = decoder.read_info().map_err(|e| png_error(path, e))?;

    let info = reader.info();
    let bits = info.bit_depth as u8;
    let plte = info
        .palette
        .as_deref()
        .ok_or_else(|| unsupported(path, "indexed PNG without PLTE chunk"))?;
    let trns = info.trns.as_deref();
    let palette: Vec<Rgba8> = plte
        .chunks_exact(3)
        .enumerate()
        .map(|(i, rgb)| {
            let alpha = trns.and_then(|t| t.get(i).copied()).unwrap_or(255);
            Rgba8::new(rgb[0], rgb[1], rgb[2], alpha)
        })
        .collect();

    let mut buf = vec![0u8; reader.output_buffer_size()];
    let frame = reader
        .next_frame(&mut buf)
        .map_err(|e| png_error(path, e))?;

    let width = frame.width as usize;
    let mut indices = Vec::with_capacity(width * frame.height as usize);
    for row in buf[..frame.buffer_size()].chunks(frame.line_size) {
        indices.extend(unpack_samples(row, width, bits));
    }

    SourceImage::indexed(frame.width, frame.height, &indices, palette).map_err(|source| {
        DecodeError::Image {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Any other color type, expanded to 8-bit samples.
fn decode_rgba(bytes: &[u8], path: &Path) -> Result<SourceImage, DecodeError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
    let mut reader = decoder.read_info().map_err(|e| png_error(path, e))?;

    let mut buf = vec![0u8; reader.output_buffer_size()];
    let frame = reader
        .next_frame(&mut buf)
        .map_err(|e| png_error(path, e))?;
    let data = &buf[..frame.buffer_size()];

    let to_rgba: fn(&[u8]) -> Rgba8 = match (frame.color_type, frame.bit_depth) {
        (ColorType::Rgba, BitDepth::Eight) => |p| Rgba8::new(p[0], p[1], p[2], p[3]),
        (ColorType::Rgb, BitDepth::Eight) => |p| Rgba8::opaque(p[0], p[1], p[2]),
        (ColorType::GrayscaleAlpha, BitDepth::Eight) => |p| Rgba8::new(p[0], p[0], p[0], p[1]),
        (ColorType::Grayscale, BitDepth::Eight) => |p| Rgba8::opaque(p[0], p[0], p[0]),
        (color_type, bit_depth) => {
            return Err(unsupported(
                path,
                &format!("{color_type:?} at {bit_depth:?} bits after expansion"),
            ))
        }
    };

    let channels = frame.color_type.samples();
    let row_len = frame.width as usize * channels;
    let mut pixels = Vec::with_capacity(frame.width as usize * frame.height as usize);
    for row in data.chunks(frame.line_size) {
        pixels.extend(row[..row_len].chunks_exact(channels).map(to_rgba));
    }

    SourceImage::new(frame.width, frame.height, pixels).map_err(|source| DecodeError::Image {
        path: path.to_path_buf(),
        source,
    })
}

/// Unpack `count` samples of `bits` bits each, MSB first.
fn unpack_samples(row: &[u8], count: usize, bits: u8) -> impl Iterator<Item = u8> + '_ {
    let per_byte = (8 / bits) as usize;
    let mask = ((1u16 << bits) - 1) as u8;
    (0..count).map(move |x| {
        let shift = 8 - bits * ((x % per_byte) as u8 + 1);
        (row[x / per_byte] >> shift) & mask
    })
}

fn png_error(path: &Path, source: png::DecodingError) -> DecodeError {
    DecodeError::Png {
        path: path.to_path_buf(),
        source,
    }
}

fn unsupported(path: &Path, detail: &str) -> DecodeError {
    DecodeError::Unsupported {
        path: path.to_path_buf(),
        detail: detail.to_string(),
    }
}
