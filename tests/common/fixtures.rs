//! Test fixtures: colors, pixel patterns and PNG encoding.

use png::{BitDepth, ColorType};
use vera_bitmap::Rgba8;

/// Colors used across tests
pub mod colors {
    use vera_bitmap::Rgba8;

    pub const RED: Rgba8 = Rgba8::opaque(255, 0, 0);
    pub const GREEN: Rgba8 = Rgba8::opaque(0, 255, 0);
    pub const BLUE: Rgba8 = Rgba8::opaque(0, 0, 255);
    pub const WHITE: Rgba8 = Rgba8::opaque(255, 255, 255);
    pub const CLEAR: Rgba8 = Rgba8::new(0, 0, 0, 0);
}

/// Checkerboard of two colors, `a` at (0, 0)
pub fn checker(width: u32, height: u32, a: Rgba8, b: Rgba8) -> Vec<Rgba8> {
    (0..height)
        .flat_map(|y| (0..width).map(move |x| if (x + y) % 2 == 0 { a } else { b }))
        .collect()
}

/// `count` colors that stay distinct after quantizing to 4 bits per channel
pub fn distinct_colors(count: u32) -> Vec<Rgba8> {
    (0..count)
        .map(|i| {
            Rgba8::opaque(
                (i % 16 * 16) as u8,
                (i / 16 % 16 * 16) as u8,
                (i / 256 % 16 * 16) as u8,
            )
        })
        .collect()
}

/// Encode pixels as an 8-bit RGBA PNG
pub fn rgba_png(width: u32, height: u32, pixels: &[Rgba8]) -> Vec<u8> {
    let data: Vec<u8> = pixels
        .iter()
        .flat_map(|p| [p.r, p.g, p.b, p.a])
        .collect();
    encode(width, height, ColorType::Rgba, BitDepth::Eight, &data, None)
}

/// Encode pixels as an 8-bit RGB PNG, dropping alpha
pub fn rgb_png(width: u32, height: u32, pixels: &[Rgba8]) -> Vec<u8> {
    let data: Vec<u8> = pixels.iter().flat_map(|p| [p.r, p.g, p.b]).collect();
    encode(width, height, ColorType::Rgb, BitDepth::Eight, &data, None)
}

/// Encode an 8-bit indexed PNG. Palette alpha goes into a tRNS chunk when
/// any entry is not opaque.
pub fn indexed_png(width: u32, height: u32, palette: &[Rgba8], indices: &[u8]) -> Vec<u8> {
    let plte: Vec<u8> = palette.iter().flat_map(|c| [c.r, c.g, c.b]).collect();
    let trns: Option<Vec<u8>> = palette
        .iter()
        .any(|c| c.a != 255)
        .then(|| palette.iter().map(|c| c.a).collect());
    encode(
        width,
        height,
        ColorType::Indexed,
        BitDepth::Eight,
        indices,
        Some((plte, trns)),
    )
}

fn encode(
    width: u32,
    height: u32,
    color: ColorType,
    depth: BitDepth,
    data: &[u8],
    palette: Option<(Vec<u8>, Option<Vec<u8>>)>,
) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(color);
        encoder.set_depth(depth);
        if let Some((plte, trns)) = palette {
            encoder.set_palette(plte);
            if let Some(trns) = trns {
                encoder.set_trns(trns);
            }
        }
        let mut writer = encoder.write_header().expect("PNG header");
        writer.write_image_data(data).expect("PNG data");
    }
    out
}
