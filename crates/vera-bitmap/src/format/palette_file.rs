//! Palette files.
//!
//! All three encodings are derived from [`VeraColor::to_bytes`]:
//!
//! - binary: 2-byte zero header, then `[GB, 0R]` per entry,
//! - assembly: `.word $0RGB, ...`, 16 words per line,
//! - BASIC: `1000 DATA $GB,$0R,...`, 8 entries per line, numbered in steps of 10.

use std::fmt::Write as _;
use std::io::Write;

use super::bmx::RAW_HEADER;
use crate::color::VeraColor;
use crate::error::ConvertError;
use crate::palette::Palette;

/// Line number of the first BASIC `DATA` line.
pub const BASIC_FIRST_LINE: u32 = 1000;
/// Line number increment between BASIC `DATA` lines.
pub const BASIC_LINE_STEP: u32 = 10;

const ASM_WORDS_PER_LINE: usize = 16;
const BASIC_COLORS_PER_LINE: usize = 8;

/// Palette file encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PaletteEncoding {
    /// Binary, loadable straight into VERA palette RAM.
    #[default]
    Binary,
    /// Assembler `.word` directives.
    Assembly,
    /// BASIC `DATA` statements.
    Basic,
}

/// Write `palette` in the given encoding.
pub fn write_palette<W: Write>(
    mut out: W,
    palette: &Palette,
    encoding: PaletteEncoding,
) -> Result<usize, ConvertError> {
    let bytes = match encoding {
        PaletteEncoding::Binary => {
            let mut bytes = RAW_HEADER.to_vec();
            bytes.extend(palette.to_bytes());
            bytes
        }
        PaletteEncoding::Assembly => assembly_text(palette).into_bytes(),
        PaletteEncoding::Basic => basic_text(palette).into_bytes(),
    };
    out.write_all(&bytes)?;
    out.flush()?;
    Ok(bytes.len())
}

/// Render the palette as assembler `.word` lines.
pub fn assembly_text(palette: &Palette) -> String {
    let mut text = String::new();
    for line in palette.colors().chunks(ASM_WORDS_PER_LINE) {
        let words: Vec<String> = line.iter().map(|c| format!("${:04X}", c.to_word())).collect();
        let _ = writeln!(text, ".word {}", words.join(", "));
    }
    text
}

/// Render the palette as numbered BASIC `DATA` lines.
pub fn basic_text(palette: &Palette) -> String {
    let mut text = String::new();
    let mut number = BASIC_FIRST_LINE;
    for line in palette.colors().chunks(BASIC_COLORS_PER_LINE) {
        let values: Vec<String> = line.iter().map(|&c| basic_pair(c)).collect();
        let _ = writeln!(text, "{number} DATA {}", values.join(","));
        number += BASIC_LINE_STEP;
    }
    text
}

fn basic_pair(color: VeraColor) -> String {
    let [low, high] = color.to_bytes();
    format!("${low:02X},${high:02X}")
}
