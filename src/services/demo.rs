//! BASIC demo programs.
//!
//! The generated program loads the converted files into the X16 emulator and
//! shows them until a key is pressed, then restores the text screen.

use std::fmt;

use vera_bitmap::{Conversion, TargetKind};

/// Largest packed image (in bytes) a demo is generated for.
pub const DEMO_MAX_BYTES: usize = 110 * 1024;

/// BMX demos load the file to banked RAM first, which only works for 320 wide images.
pub const BMX_DEMO_WIDTH: u32 = 320;

/// The first 16 default colors, restored when a demo exits.
const DEFAULT_PALETTE_DATA: [&str; 2] = [
    "DATA $00,$00,$FF,$0F,$00,$08,$FE,$0A,$4C,$0C,$C5,$00,$0A,$00,$E7,$0E",
    "DATA $85,$0D,$40,$06,$77,$0F,$33,$03,$77,$07,$F6,$0A,$8F,$00,$BB,$0B",
];

/// Why no demo program was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    TooLarge { bytes: usize },
    BmxWidth { width: u32 },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::TooLarge { .. } => f.write_str(
                "No demo program in BASIC has been created, a size of 110 KB is maximum for this.",
            ),
            SkipReason::BmxWidth { .. } => f.write_str(
                "No demo program in BASIC has been created, only BMX images with a width of 320 pixels are supported.",
            ),
        }
    }
}

/// Generate the demo program for `conversion`. `name` is the upper-case base
/// name of the output files, e.g. `LOGO` for `LOGO.BIN`.
pub fn basic_program(conversion: &Conversion, name: &str) -> Result<String, SkipReason> {
    let lines = match conversion.target() {
        TargetKind::Bmx => {
            if conversion.width() != BMX_DEMO_WIDTH {
                return Err(SkipReason::BmxWidth {
                    width: conversion.width(),
                });
            }
            bmx_program(conversion, name)
        }
        target => {
            let bytes = conversion.pixels().len();
            if bytes > DEMO_MAX_BYTES {
                return Err(SkipReason::TooLarge { bytes });
            }
            match target {
                TargetKind::Tiles => tiles_program(conversion, name),
                TargetKind::Sprites => sprites_program(conversion, name),
                _ => image_program(conversion, name),
            }
        }
    };
    let mut program = lines.join("\n");
    program.push('\n');
    Ok(program)
}

fn bmx_program(conversion: &Conversion, name: &str) -> Vec<String> {
    let bpp = conversion.mode().bits_per_pixel();
    let mut lines = vec![
        "100 REM *** LOAD IMAGE TO BANKED RAM ***".to_string(),
        "110 REM".to_string(),
        format!("120 BLOAD \"{name}.BMX\", 8, 1,$A000"),
        "130 BANK 1:REM SET BANK TO BEGINNING OF DATA".to_string(),
        "140 CD = PEEK($A005): REM GET VERA COLOR DEPTH (0-3)".to_string(),
        "150 CL = PEEK($A00A): REM GET NUMBER OF COLORS".to_string(),
        "160 DL = PEEK($A00C): REM GET START OF IMAGE LO BYTE".to_string(),
        "170 DH = PEEK($A00D): REM GET START OF IMAGE HI BYTE".to_string(),
        "180 OF = DH*256+DL  : REM CALCULATE IMAGE DATA OFFSET".to_string(),
        "190 REM".to_string(),
        "200 REM *** SET PALETTE ***".to_string(),
        "210 REM".to_string(),
        "220 IF CL=0 THEN CL=256".to_string(),
        "230 FOR I=0 TO CL*2-1".to_string(),
        "240 VPOKE 1,$FA00+I, PEEK($A020+I)".to_string(),
        "250 NEXT".to_string(),
        "260 REM".to_string(),
        "270 REM *** LOAD IMAGE AGAIN TO VRAM ***".to_string(),
        "280 REM".to_string(),
        format!("290 BVLOAD \"{name}.BMX\", 8, 0,$800-OF"),
        "300 SCREEN 3:REM SET SCREEN TO 320X240".to_string(),
        "310 POKE $9F29, 16+1:REM SWITCH TO LAYER 0, VGA OUTPUT".to_string(),
        format!("320 POKE $9F2D, 4+CD:REM BITMAP MODE, BPP={bpp}"),
        "330 POKE $9F2F, 4:REM IMAGE BASE=$800, WIDTH=320".to_string(),
        "340 GET A$:IF A$=\"\" THEN 340".to_string(),
        "350 REM".to_string(),
        "360 REM *** RESTORE SCREEN ***".to_string(),
        "370 REM".to_string(),
        "380 COLOR 1, 6:REM FG=WHITE, BG=BLUE".to_string(),
        "390 POKE $9F29, 32+1: REM SWITCH BACK TO LAYER 1, VGA OUTPUT".to_string(),
        "400 REM".to_string(),
        "410 REM *** RESTORE FIRST 16 COLORS ***".to_string(),
        "420 REM".to_string(),
    ];
    lines.extend(restore_palette(430, "SCREEN 0:CLS"));
    lines.extend(palette_data(480));
    lines
}

fn image_program(conversion: &Conversion, name: &str) -> Vec<String> {
    let mode = conversion.mode();
    let (bpp, depth) = (mode.bits_per_pixel(), mode.color_depth());
    let wide = conversion.width() == 640;

    let mut lines = vec![
        "100 REM LOAD BINARY FILES".to_string(),
        format!("110 VLOAD \"{name}.BIN\",8,0,$4000"),
        format!("120 VLOAD \"{name}-PALETTE.BIN\",8,1,$FA00"),
        "130 REM".to_string(),
        "140 REM SETUP SCREEN".to_string(),
    ];

    // 640 wide images keep the default screen mode, so line numbers shift by one
    let mut body = Vec::new();
    if !wide {
        body.push("SCREEN 3:REM SET SCREEN TO 320X240".to_string());
    }
    body.push("POKE $9F29,16+1:REM SWITCH TO LAYER 0, VGA OUTPUT".to_string());
    body.push(format!("POKE $9F2D,4+{depth}:REM BITMAP MODE, BPP={bpp}"));
    body.push(if wide {
        "POKE $9F2F,32+1:REM IMAGE BASE=$4000, BITMAP WIDTH=640".to_string()
    } else {
        "POKE $9F2F,32+0:REM TILE (IMAGE) BASE=$4000, BITMAP WIDTH=320".to_string()
    });
    let wait = 150 + 10 * body.len() as u32;
    body.push(format!("GET A$:IF A$=\"\" THEN {wait}"));
    body.extend(
        [
            "REM",
            "REM RESTORE SCREEN",
            "COLOR 1,6:REM FG=WHITE, BG=BLUE",
            "POKE $9F29,32+1: REM SWITCH BACK TO LAYER 1, VGA OUTPUT",
            "REM",
            "REM RESTORE CHAR SET IN CASE IT HAS BEEN OVERWRITTEN",
            "PRINT CHR$($8E):REM SET UPPER CASE WHICH CAUSES UPLOAD OF CHAR SET",
            "REM",
            "REM RESTORE FIRST 16 COLORS",
        ]
        .map(String::from),
    );

    let mut number = 150;
    for text in body {
        lines.push(format!("{number} {text}"));
        number += 10;
    }

    let clear = if wide { "CLS" } else { "SCREEN 0:CLS" };
    lines.extend(restore_palette(number, clear));
    lines.extend(palette_data(number + 50));
    lines
}

fn tiles_program(conversion: &Conversion, name: &str) -> Vec<String> {
    let mode = conversion.mode();
    let (bpp, depth) = (mode.bits_per_pixel(), mode.color_depth());
    let tile = conversion.tile().unwrap_or(vera_bitmap::TileSize::new(8, 8));
    let last_index = conversion.tile_count().saturating_sub(1);
    let size_bits = if tile.height == 16 { 2 } else { 0 } + if tile.width == 16 { 1 } else { 0 };

    let mut lines = vec![
        "100 REM LOAD BINARY FILES".to_string(),
        format!("110 VLOAD \"{name}.BIN\",8,0,$4000"),
        format!("120 VLOAD \"{name}-PALETTE.BIN\",8,1,$FA00"),
        "130 REM".to_string(),
        "140 REM SETUP SCREEN".to_string(),
        "150 SCREEN 3:REM SET SCREEN TO 320X240".to_string(),
        "160 POKE $9F29,16+1:REM SWITCH TO LAYER 0, VGA OUTPUT".to_string(),
        format!("170 POKE $9F2D,{depth}:REM MAP HEIGHT=32, MAP WIDTH=32, BPP={bpp}"),
        "180 POKE $9F2E,16+8:REM MAP BASE=$3000".to_string(),
        format!(
            "190 POKE $9F2F,32+{size_bits}:REM TILE BASE=$4000, TILE HEIGHT={}, TILE WIDTH={}",
            tile.height, tile.width
        ),
        "200 REM".to_string(),
        "210 REM CREATE MAP".to_string(),
        "220 I=0".to_string(),
        "230 FOR ROW=0 TO 31".to_string(),
        "240 FOR COL=0 TO 31".to_string(),
        "250 ADDR=$3000+ROW*64+COL*2".to_string(),
        "260 VPOKE 0,ADDR,I:REM TILE INDEX".to_string(),
        "270 VPOKE 0,ADDR+1,0:REM PALETTE INDEX 0, NO FLIPS".to_string(),
        format!("280 I=I+1:IF I>{last_index} THEN I=0"),
        "290 NEXT COL".to_string(),
        "300 NEXT ROW".to_string(),
        "310 GET A$:IF A$=\"\" THEN 310".to_string(),
        "320 REM".to_string(),
        "330 REM RESTORE SCREEN".to_string(),
        "340 SCREEN 0:REM SET SCREEN TO 640X480".to_string(),
        "350 COLOR 1,6:REM FG = WHITE, BG = BLUE".to_string(),
        "360 POKE $9F29,32+1: REM SWITCH BACK TO LAYER 1, VGA OUTPUT".to_string(),
        "370 REM".to_string(),
        "380 REM RESTORE CHAR SET IN CASE IT HAS BEEN OVERWRITTEN".to_string(),
        "390 PRINT CHR$($8E):REM SET UPPER CASE WHICH CAUSES UPLOAD OF CHAR SET".to_string(),
        "400 REM".to_string(),
        "410 REM RESTORE FIRST 16 COLORS".to_string(),
    ];
    lines.extend(restore_palette(420, "CLS"));
    lines.push("470 REM ORIGINAL PALETTE".to_string());
    lines.extend(palette_data(480));
    lines
}

fn sprites_program(conversion: &Conversion, name: &str) -> Vec<String> {
    let mode = conversion.mode();
    let sprite = conversion.tile().unwrap_or(vera_bitmap::TileSize::new(8, 8));
    let full_palette = mode.color_count() == 256;
    let (palette_hex, palette_offset, mode_bit) = if full_palette {
        ("00", 0, 128)
    } else {
        ("20", 1, 0)
    };
    let height_bits = size_bits(sprite.height);
    let width_bits = size_bits(sprite.width);
    let sprite_bytes = conversion.tile_bytes();
    let last_index = conversion.tile_count().saturating_sub(1);
    let (w, h) = (sprite.width, sprite.height);

    [
        "100 REM LOAD BINARY FILES".to_string(),
        "110 ADDR=$4000".to_string(),
        format!("120 VLOAD \"{name}.BIN\",8,0,ADDR"),
        format!(
            "130 VLOAD \"{name}-PALETTE.BIN\",8,1,$FA{palette_hex}:REM TO PALETTE OFFSET {palette_offset}"
        ),
        "140 REM".to_string(),
        "150 REM SETUP SCREEN".to_string(),
        "160 SCREEN 3:REM SET SCREEN TO 320X240".to_string(),
        "170 POKE $9F29,PEEK($9F29) OR %01000000:REM ENABLE SPRITES".to_string(),
        "180 REM".to_string(),
        "190 REM SET UP SPRITES".to_string(),
        "200 REG=$FC00".to_string(),
        "210 X=0:Y=0".to_string(),
        format!("220 FOR I=0 TO {last_index}:REM LOOP THROUGH ALL SPRITES"),
        "230 VPOKE 1,REG,ADDR/32 AND 255:REM ADDRESS BITS 12:5".to_string(),
        format!("240 VPOKE 1,REG+1,{mode_bit}+ADDR/8192:REM COLOR MODE + ADDRESS BITS 16:13"),
        "250 VPOKE 1,REG+2,X AND 255".to_string(),
        "260 VPOKE 1,REG+3,X/256".to_string(),
        "270 VPOKE 1,REG+4,Y AND 255".to_string(),
        "280 VPOKE 1,REG+5,Y/256".to_string(),
        "290 VPOKE 1,REG+6,%00001100:REM SET Z-DEPTH".to_string(),
        format!(
            "300 VPOKE 1,REG+7,%{height_bits}{width_bits}{palette_offset:04b}:REM HEIGHT={h}, WIDTH={w}, PALETTE OFFSET={palette_offset}"
        ),
        "310 REG=REG+8".to_string(),
        format!("320 ADDR=ADDR+{sprite_bytes}:REM ADD SIZE OF SPRITE IN BYTES"),
        format!("330 X=X+{w}"),
        format!("340 IF X=320 THEN Y=Y+{h}"),
        "350 IF X=320 THEN X=0".to_string(),
        format!("360 IF Y>=240-{h} THEN 380"),
        "370 NEXT".to_string(),
        "380 GET A$:IF A$=\"\" THEN 380".to_string(),
        "390 REM".to_string(),
        "400 REM RESTORE SCREEN".to_string(),
        "410 POKE $9F29,PEEK($9F29) AND %10111111:REM DISABLE SPRITES".to_string(),
        "420 SCREEN 0:REM SET SCREEN TO 640X480".to_string(),
        "430 REM RESTORE ORIGINAL CHAR SET THAT MIGHT HAVE BEEN OVERWRITTEN".to_string(),
        "440 PRINT CHR$($8E):REM SET UPPER CASE (CAUSES UPLOAD OF CHAR SET)".to_string(),
    ]
    .into()
}

/// Two-bit sprite size code: 8, 16, 32, 64 pixels map to 00, 01, 10, 11.
fn size_bits(pixels: u32) -> String {
    format!("{:02b}", (pixels / 8).max(1).trailing_zeros())
}

/// Loop that reloads the 16 default colors from DATA lines, starting at line `first`.
fn restore_palette(first: u32, clear: &str) -> Vec<String> {
    vec![
        format!("{first} FOR I = 0 TO 31"),
        format!("{} READ C", first + 10),
        format!("{} VPOKE 1,$FA00+I,C", first + 20),
        format!("{} NEXT", first + 30),
        format!("{} {clear}", first + 40),
    ]
}

fn palette_data(first: u32) -> Vec<String> {
    DEFAULT_PALETTE_DATA
        .iter()
        .zip((first..).step_by(10))
        .map(|(data, number)| format!("{number} {data}"))
        .collect()
}
