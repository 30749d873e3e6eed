//! Domain-critical regression tests for vera-bitmap.
//!
//! Each test names the class of bug it guards against.

#[cfg(test)]
mod domain_tests {
    use crate::api::Converter;
    use crate::color::{Rgba8, VeraColor};
    use crate::error::ConvertError;
    use crate::format::{BmxHeader, BMX_HEADER_LEN};
    use crate::image::SourceImage;
    use crate::mode::{ColorMode, TargetKind};
    use crate::pack::{unpack_indices, PixelPacker, TileSize};
    use crate::palette::{PaletteBuilder, TransparencySource, MAX_COLORS};

    const RED: Rgba8 = Rgba8::new(255, 0, 0, 255);
    const GREEN: Rgba8 = Rgba8::new(0, 255, 0, 255);
    const BLUE: Rgba8 = Rgba8::new(0, 0, 255, 255);
    const CLEAR: Rgba8 = Rgba8::new(0, 0, 0, 0);

    /// Deterministic pseudo-random image, `colors` distinct 8-bit values.
    fn noise_image(width: u32, height: u32, colors: u32, seed: u32) -> SourceImage {
        let mut state = seed.wrapping_mul(2_654_435_761).max(1);
        let pixels = (0..width * height)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                let c = state % colors;
                Rgba8::opaque((c * 37 % 256) as u8, (c * 91 % 256) as u8, (c * 13 % 256) as u8)
            })
            .collect();
        SourceImage::new(width, height, pixels).unwrap()
    }

    // ========================================================================
    // Quantization
    // ========================================================================

    /// If this breaks, the rounding rule changed and palettes built from the
    /// same image would no longer match files produced earlier.
    #[test]
    fn test_quantization_is_pure_and_rounds_half_up() {
        for v in 0..=255u8 {
            let c = Rgba8::new(v, v, v, v);
            let q = VeraColor::quantize(c);
            assert_eq!(q, VeraColor::quantize(c));
            assert_eq!(q.r(), ((v as u16 + 8) / 16).min(15) as u8, "channel {v}");
            assert_eq!(q.is_opaque(), v > 0);
        }
    }

    // ========================================================================
    // Transparency protocol: each of the four rules
    // ========================================================================

    /// If this breaks, indexed images lost their own index-0 color, which
    /// breaks sprites drawn against an existing palette layout.
    #[test]
    fn test_rule_1_source_palette() {
        let image = SourceImage::indexed(2, 1, &[1, 1], vec![GREEN, RED]).unwrap();
        let (palette, _) = PaletteBuilder::new(&image).build().unwrap();
        assert_eq!(palette.selected_by(), TransparencySource::SourcePalette);
        assert_eq!(palette.index_of(VeraColor::quantize(GREEN)), Some(0));
    }

    #[test]
    fn test_rule_2_override() {
        let image = SourceImage::new(3, 1, vec![RED, CLEAR, BLUE]).unwrap();
        let (palette, _) = PaletteBuilder::new(&image)
            .transparent_color(Some(BLUE))
            .build()
            .unwrap();
        assert_eq!(palette.selected_by(), TransparencySource::Override);
        assert_eq!(palette.index_of(VeraColor::quantize(BLUE)), Some(0));
    }

    #[test]
    fn test_rule_3_first_transparent_pixel_row_major() {
        let second_clear = Rgba8::new(0x80, 0x80, 0x80, 0);
        let image = SourceImage::new(2, 2, vec![RED, GREEN, CLEAR, second_clear]).unwrap();
        let (palette, _) = PaletteBuilder::new(&image).build().unwrap();
        assert_eq!(
            palette.selected_by(),
            TransparencySource::FirstTransparentPixel { x: 0, y: 1 }
        );
        assert_eq!(palette.index_of(VeraColor::quantize(CLEAR)), Some(0));
    }

    #[test]
    fn test_rule_4_top_left() {
        let image = SourceImage::new(2, 1, vec![BLUE, RED]).unwrap();
        let (palette, _) = PaletteBuilder::new(&image).build().unwrap();
        assert_eq!(palette.selected_by(), TransparencySource::TopLeftPixel);
        assert_eq!(palette.index_of(VeraColor::quantize(BLUE)), Some(0));
    }

    /// If this breaks, a mistyped override silently fell back to another rule
    /// instead of stopping the conversion.
    #[test]
    fn test_missing_override_fails_before_packing() {
        let image = SourceImage::new(2, 1, vec![RED, GREEN]).unwrap();
        let err = Converter::new(TargetKind::Image)
            .transparent_color("$FF102030".parse().unwrap())
            .convert(&image)
            .unwrap_err();
        assert!(matches!(
            err,
            ConvertError::TransparentColorNotFound { color } if color == Rgba8::new(0x10, 0x20, 0x30, 0xFF)
        ));
    }

    // ========================================================================
    // Palette capacity
    // ========================================================================

    #[test]
    fn test_palettes_never_exceed_256() {
        for (colors, seed) in [(3, 1), (40, 2), (200, 3), (600, 4)] {
            let image = noise_image(32, 32, colors, seed);
            match PaletteBuilder::new(&image).build() {
                Ok((palette, _)) => assert!(palette.len() <= MAX_COLORS),
                Err(ConvertError::CapacityExceeded { colors, max }) => {
                    assert!(colors > max);
                }
                Err(other) => panic!("unexpected error {other}"),
            }
        }
    }

    // ========================================================================
    // Packing
    // ========================================================================

    /// If this breaks, the packed size no longer matches what the loader on
    /// the target machine expects.
    #[test]
    fn test_packed_length_for_every_mode() {
        for (colors, target) in [
            (2, TargetKind::Image),
            (4, TargetKind::Image),
            (16, TargetKind::Image),
            (200, TargetKind::Image),
            (16, TargetKind::Sprites),
        ] {
            let image = noise_image(64, 16, colors, colors);
            let conversion = Converter::new(target)
                .tile_size(16, 16)
                .convert(&image)
                .unwrap();
            let ppb = conversion.mode().pixels_per_byte() as usize;
            assert_eq!(conversion.pixels().len(), 64 * 16 / ppb, "{colors} colors");
        }
    }

    /// If this breaks, packing and unpacking disagree on bit order.
    #[test]
    fn test_unpack_recovers_indices() {
        for colors in [2, 3, 9, 100] {
            let image = noise_image(32, 4, colors, 7);
            let conversion = Converter::new(TargetKind::Image).convert(&image).unwrap();
            let palette = conversion.palette();
            let expected: Vec<u8> = image
                .pixels()
                .iter()
                .map(|&p| palette.index_of(VeraColor::quantize(p)).unwrap())
                .collect();
            let unpacked = unpack_indices(
                conversion.pixels(),
                conversion.mode().bits_per_pixel(),
                expected.len(),
            )
            .unwrap();
            assert_eq!(unpacked, expected, "{colors} colors");
        }
    }

    /// If this breaks, tiles are emitted column-major or interleaved.
    #[test]
    fn test_unpack_recovers_tile_order() {
        let image = noise_image(32, 16, 12, 9);
        let conversion = Converter::new(TargetKind::Tiles)
            .tile_size(8, 8)
            .convert(&image)
            .unwrap();
        let palette = conversion.palette();

        let mut expected = Vec::new();
        for tile_y in (0..16).step_by(8) {
            for tile_x in (0..32).step_by(8) {
                for y in tile_y..tile_y + 8 {
                    for x in tile_x..tile_x + 8 {
                        let color = VeraColor::quantize(image.pixel(x, y));
                        expected.push(palette.index_of(color).unwrap());
                    }
                }
            }
        }
        let bits = conversion.mode().bits_per_pixel();
        let unpacked = unpack_indices(conversion.pixels(), bits, expected.len()).unwrap();
        assert_eq!(unpacked, expected);
    }

    /// If this breaks, fully transparent pixels of a color that also appears
    /// opaque elsewhere are drawn instead of being see-through.
    #[test]
    fn test_alpha_zero_always_packs_to_index_zero() {
        let clear_green = Rgba8::new(0, 255, 0, 0);
        let image = SourceImage::new(4, 1, vec![RED, clear_green, GREEN, clear_green]).unwrap();
        let (palette, _) = PaletteBuilder::new(&image)
            .transparent_color(Some(RED))
            .build()
            .unwrap();
        assert_ne!(palette.index_of(VeraColor::quantize(clear_green)), Some(0));

        let mode = ColorMode::resolve(palette.len(), TargetKind::Image).unwrap();
        let packed = PixelPacker::new(&palette, mode).pack(&image).unwrap();
        let indices = unpack_indices(&packed, mode.bits_per_pixel(), 4).unwrap();
        assert_eq!(indices[1], 0);
        assert_eq!(indices[3], 0);
        assert_ne!(indices[2], 0);
    }

    // ========================================================================
    // Concrete scenarios
    // ========================================================================

    #[test]
    fn test_two_by_two_three_colors() {
        let image = SourceImage::new(2, 2, vec![RED, RED, GREEN, BLUE]).unwrap();
        let conversion = Converter::new(TargetKind::Image).convert(&image).unwrap();

        assert_eq!(conversion.palette().len(), 3);
        assert_eq!(conversion.mode().color_count(), 4);
        assert_eq!(conversion.mode().bits_per_pixel(), 2);
        assert_eq!(conversion.mode().pixels_per_byte(), 4);
        assert_eq!(conversion.palette().transparent_color(), VeraColor::quantize(RED));
        assert_eq!(conversion.pixels().len(), 1);
    }

    #[test]
    fn test_bmx_header_320x200_16_colors() {
        let mode = ColorMode::resolve(16, TargetKind::Bmx).unwrap();
        let bytes = BmxHeader::new(&mode, 320, 200, 16).unwrap().to_bytes();
        assert_eq!(bytes.len(), BMX_HEADER_LEN);
        assert_eq!(bytes[4], 4);
        assert_eq!(bytes[5], 2);
        assert_eq!(u16::from_le_bytes([bytes[6], bytes[7]]), 320);
        assert_eq!(u16::from_le_bytes([bytes[8], bytes[9]]), 200);
        assert_eq!(bytes[10], 16);
        assert_eq!(u16::from_le_bytes([bytes[12], bytes[13]]), 64);
    }

    /// If this breaks, the BMX image offset no longer points past the palette.
    #[test]
    fn test_bmx_file_offset_points_at_pixels() {
        let image = noise_image(32, 2, 5, 11);
        let conversion = Converter::new(TargetKind::Bmx).convert(&image).unwrap();
        let mut file = Vec::new();
        conversion.write_image(&mut file).unwrap();

        let header = BmxHeader::parse(&file).unwrap();
        let offset = header.data_offset as usize;
        assert_eq!(offset, BMX_HEADER_LEN + conversion.palette().len() * 2);
        assert_eq!(&file[offset..], conversion.pixels());
    }

    #[test]
    fn test_sprite_tile_size_applies() {
        let image = noise_image(16, 16, 3, 5);
        let conversion = Converter::new(TargetKind::Sprites)
            .tile_size(8, 16)
            .convert(&image)
            .unwrap();
        assert_eq!(conversion.tile(), Some(TileSize::new(8, 16)));
        assert_eq!(conversion.tile_count(), 2);
        assert_eq!(conversion.tile_bytes(), 64);
    }
}
