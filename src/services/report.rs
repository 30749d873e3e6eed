//! Analysis and conversion reports.
//!
//! Reports are plain data. `Display` renders the text printed by the binary,
//! `Serialize` the `--json` form.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use vera_bitmap::palette::MAX_COLORS;
use vera_bitmap::{
    ColorMode, Conversion, PaletteDraft, Provenance, SourceImage, TargetKind, VeraColor,
};

use crate::models::{
    display_name, sizes_dividing, ConversionMode, BITMAP_WIDTHS, SPRITE_SIZES, TILE_SIZES,
};

/// Free VRAM on the X16. Larger images get a warning.
pub const VRAM_FREE_BYTES: usize = 126 * 1024;

/// Palettes up to this size are listed one entry per line.
const SHORT_LIST_COLORS: usize = 16;
/// Longer palettes are only listed when they have at most this many source colors.
const MAX_LISTED_ORIGINALS: usize = 2048;
/// Columns shown in the palette grid and in the tile table.
const COLUMNS: usize = 16;
/// The tile table stops after the row that reaches this many tiles.
const MAX_TABLE_TILES: usize = 1000;

const RULE: &str = "----------------------------------------";

#[derive(Debug, Clone, Serialize)]
pub struct SourceInfo {
    pub file: String,
    pub width: u32,
    pub height: u32,
    /// Distinct 8-bit colors in the source image.
    pub colors: usize,
    pub indexed: bool,
}

/// Which conversions an image of this size allows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidOptions {
    pub bitmap: bool,
    pub sprite_widths: Vec<u32>,
    pub sprite_heights: Vec<u32>,
    pub tile_widths: Vec<u32>,
    pub tile_heights: Vec<u32>,
}

impl ValidOptions {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            bitmap: BITMAP_WIDTHS.contains(&width),
            sprite_widths: sizes_dividing(width, SPRITE_SIZES),
            sprite_heights: sizes_dividing(height, SPRITE_SIZES),
            tile_widths: sizes_dividing(width, TILE_SIZES),
            tile_heights: sizes_dividing(height, TILE_SIZES),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModeInfo {
    /// Palette entries actually used.
    pub colors: usize,
    pub color_count: usize,
    pub bits_per_pixel: u8,
    pub pixels_per_byte: u8,
    pub color_depth: u8,
}

impl ModeInfo {
    pub fn new(colors: usize, mode: ColorMode) -> Self {
        Self {
            colors,
            color_count: mode.color_count(),
            bits_per_pixel: mode.bits_per_pixel(),
            pixels_per_byte: mode.pixels_per_byte(),
            color_depth: mode.color_depth(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaletteEntry {
    pub index: usize,
    /// `$0RGB`
    pub color: String,
    /// The two bytes written to palette files.
    pub bytes: [u8; 2],
    /// Source colors as `$AARRGGBB`.
    pub originals: Vec<String>,
}

/// Tile or sprite layout of a tiled conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TileInfo {
    pub width: u32,
    pub height: u32,
    pub columns: u32,
    pub rows: u32,
    pub count: usize,
    pub bytes_each: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Image,
    Palette,
    Demo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenFile {
    pub kind: FileKind,
    pub path: PathBuf,
    pub bytes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DemoNote {
    NotRequested,
    Written { path: PathBuf },
    Skipped { reason: String },
}

/// Report of `analyze`: what the image allows, nothing written.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub source: SourceInfo,
    pub options: ValidOptions,
    /// Entries the palette would have, possibly above 256.
    pub palette_colors: usize,
    pub index_zero: String,
    /// Bitmap color mode, `None` when the palette is too large.
    pub conversion: Option<ModeInfo>,
    pub palette: Option<Vec<PaletteEntry>>,
}

impl AnalysisReport {
    pub fn new(input: &Path, image: &SourceImage, draft: &PaletteDraft) -> Self {
        let provenance = draft.provenance();
        let conversion = ColorMode::resolve(draft.len(), TargetKind::Image)
            .ok()
            .map(|mode| ModeInfo::new(draft.len(), mode));

        Self {
            source: SourceInfo {
                file: display_name(input),
                width: image.width(),
                height: image.height(),
                colors: provenance.original_color_count(),
                indexed: image.is_indexed(),
            },
            options: ValidOptions::new(image.width(), image.height()),
            palette_colors: draft.len(),
            index_zero: draft.selected_by().to_string(),
            conversion,
            palette: palette_entries(draft.colors(), provenance),
        }
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_source(f, &self.source)?;

        writeln!(f, "Valid options:")?;
        writeln!(f, "{RULE}")?;
        if self.palette_colors > MAX_COLORS {
            writeln!(
                f,
                "FATAL PROBLEM: The image has to be color reduced before conversion, With the current number of colors the conversion would result in {} colors, maximum is {MAX_COLORS}.",
                self.palette_colors
            )?;
        }
        if self.options.bitmap {
            writeln!(
                f,
                "Conversion to a bitmap image is possible because the width is {}.",
                self.source.width
            )?;
        } else {
            writeln!(f, "Conversion to a bitmap image is not possible because the width is not 320 or 640. (Height has no restrictions.)")?;
        }
        writeln!(f)?;

        let options = &self.options;
        if options.sprite_widths.is_empty() || options.sprite_heights.is_empty() {
            writeln!(f, "The image cannot be converted to tiles or sprites. Width and height must be divisible by 8.")?;
            writeln!(f, "This is because sprites can be 8, 16, 32 or 64 pixels wide/high and tiles can be 8 or 16.")?;
        } else {
            writeln!(f, "If converting to sprites, valid sizes are:")?;
            writeln!(f, "Width : {}", number_list(&options.sprite_widths))?;
            writeln!(f, "Height: {}", number_list(&options.sprite_heights))?;
            writeln!(f, "If converting to tiles, valid sizes are:")?;
            writeln!(f, "Width : {}", number_list(&options.tile_widths))?;
            writeln!(f, "Height: {}", number_list(&options.tile_heights))?;
        }
        writeln!(f)?;

        writeln!(f, "Conversion:")?;
        writeln!(f, "{RULE}")?;
        if let Some(mode) = &self.conversion {
            write_mode(f, mode)?;
        }
        writeln!(f, "Transparent color    : {}", self.index_zero)?;
        writeln!(f)?;
        if let Some(entries) = &self.palette {
            write_palette(f, entries)?;
        }
        Ok(())
    }
}

/// Report of `convert`.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    pub source: SourceInfo,
    pub mode: ConversionMode,
    pub tiles: Option<TileInfo>,
    pub index_zero: String,
    pub conversion: ModeInfo,
    pub palette: Option<Vec<PaletteEntry>>,
    /// Packed image size without headers.
    pub image_bytes: usize,
    pub files: Vec<WrittenFile>,
    pub vram_warning: bool,
    pub demo: DemoNote,
}

impl ConversionReport {
    pub fn new(
        input: &Path,
        mode: ConversionMode,
        conversion: &Conversion,
        files: Vec<WrittenFile>,
        demo: DemoNote,
    ) -> Self {
        let palette = conversion.palette();
        let tiles = conversion.tile().map(|tile| TileInfo {
            width: tile.width,
            height: tile.height,
            columns: conversion.width() / tile.width,
            rows: conversion.height() / tile.height,
            count: conversion.tile_count(),
            bytes_each: conversion.tile_bytes(),
        });
        let image_bytes = conversion.pixels().len();

        Self {
            source: SourceInfo {
                file: display_name(input),
                width: conversion.width(),
                height: conversion.height(),
                colors: conversion.provenance().original_color_count(),
                indexed: conversion.indexed_source(),
            },
            mode,
            tiles,
            index_zero: palette.selected_by().to_string(),
            conversion: ModeInfo::new(palette.len(), conversion.mode()),
            palette: palette_entries(palette.colors(), conversion.provenance()),
            image_bytes,
            files,
            vram_warning: image_bytes > VRAM_FREE_BYTES,
            demo,
        }
    }

    fn files_of(&self, kind: FileKind) -> impl Iterator<Item = &WrittenFile> {
        self.files.iter().filter(move |file| file.kind == kind)
    }
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "The file {} was successfully converted.", self.source.file)?;
        writeln!(f)?;
        write_source(f, &self.source)?;

        writeln!(f, "Conversion:")?;
        writeln!(f, "{RULE}")?;
        let plural = self.mode.to_string();
        let singular = plural.trim_end_matches('s');
        if let Some(tiles) = &self.tiles {
            let title = capitalize(singular);
            writeln!(f, "{title} width       : {}", tiles.width)?;
            writeln!(f, "{title} height      : {}", tiles.height)?;
            writeln!(f, "Number of {plural}  : {}", tiles.count)?;
            writeln!(f, "Size of each {singular}: {} bytes", tiles.bytes_each)?;
            writeln!(f)?;
        }
        write_mode(f, &self.conversion)?;
        writeln!(f, "Transparent color    : {}", self.index_zero)?;
        writeln!(f)?;
        if let Some(entries) = &self.palette {
            write_palette(f, entries)?;
        }
        if let Some(tiles) = &self.tiles {
            writeln!(f)?;
            writeln!(
                f,
                "The {plural} were read from the original image in the following order:"
            )?;
            writeln!(f)?;
            write_tile_table(f, tiles.columns as usize, tiles.rows as usize)?;
        }

        writeln!(f)?;
        writeln!(f, "File information:")?;
        for image in self.files_of(FileKind::Image) {
            let name = display_name(&image.path);
            if self.mode == ConversionMode::Bmx {
                writeln!(f, "{} bytes were written to {name}.", image.bytes)?;
                writeln!(f, "The file format is BMX version 1.0 and the file contains:")?;
                writeln!(f, "1. A header of 32 bytes.")?;
                writeln!(
                    f,
                    "2. A palette of {} colors (2 bytes each).",
                    self.conversion.colors
                )?;
                writeln!(f, "3. {} bytes of image data.", self.image_bytes)?;
            } else {
                writeln!(
                    f,
                    "Size of image : {} bytes (height * width / pixels per byte).",
                    self.image_bytes
                )?;
                writeln!(
                    f,
                    "Data written  : {} bytes were written to {name} including a header of 2 bytes.",
                    image.bytes
                )?;
            }
        }
        for palette in self.files_of(FileKind::Palette) {
            writeln!(
                f,
                "Colors written: {} colors were written to {}.",
                self.conversion.colors,
                display_name(&palette.path)
            )?;
        }
        if self.vram_warning {
            writeln!(f)?;
            writeln!(f, "WARNING: The amount of free VRAM is 126 KB, the converted image is larger.")?;
        }

        match &self.demo {
            DemoNote::NotRequested => {}
            DemoNote::Skipped { reason } => {
                writeln!(f)?;
                writeln!(f, "Demo:")?;
                writeln!(f, "NOTE: {reason}")?;
            }
            DemoNote::Written { path } => {
                let name = display_name(path);
                writeln!(f)?;
                writeln!(f, "Demo:")?;
                writeln!(
                    f,
                    "The program {name} is a simple BASIC program to display the {}.",
                    self.mode
                )?;
                writeln!(
                    f,
                    "Start the emulator with \"x16emu -bas {name} -run\" to load and run it."
                )?;
            }
        }
        Ok(())
    }
}

/// Palette listing, or `None` when it would be too long to be useful.
fn palette_entries(colors: &[VeraColor], provenance: &Provenance) -> Option<Vec<PaletteEntry>> {
    if colors.len() > MAX_COLORS
        || (colors.len() > SHORT_LIST_COLORS
            && provenance.original_color_count() > MAX_LISTED_ORIGINALS)
    {
        return None;
    }
    let entries = colors
        .iter()
        .enumerate()
        .map(|(index, &color)| PaletteEntry {
            index,
            color: color.to_string(),
            bytes: color.to_bytes(),
            originals: provenance
                .originals(color)
                .iter()
                .map(ToString::to_string)
                .collect(),
        })
        .collect();
    Some(entries)
}

fn write_source(f: &mut fmt::Formatter<'_>, source: &SourceInfo) -> fmt::Result {
    writeln!(f, "Original image:")?;
    writeln!(f, "{RULE}")?;
    writeln!(f, "Image width     : {}", source.width)?;
    writeln!(f, "Image height    : {}", source.height)?;
    writeln!(f, "Number of colors: {}", source.colors)?;
    if source.indexed {
        writeln!(f, "Color type      : Indexed (each pixel has a color taken from a limited palette)")?;
    } else {
        writeln!(f, "Color type      : Full-color (each pixel has its own ARGB value)")?;
    }
    writeln!(f)
}

fn write_mode(f: &mut fmt::Formatter<'_>, mode: &ModeInfo) -> fmt::Result {
    writeln!(f, "Number of colors     : {}", mode.colors)?;
    writeln!(f, "Bits per pixel (BPP) : {}", mode.bits_per_pixel)?;
    writeln!(f, "Pixels per byte      : {}", mode.pixels_per_byte)?;
    writeln!(f, "Color depth          : {}", mode.color_depth)
}

fn write_palette(f: &mut fmt::Formatter<'_>, entries: &[PaletteEntry]) -> fmt::Result {
    writeln!(f, "Palette:")?;
    if entries.len() <= SHORT_LIST_COLORS {
        writeln!(f, "Index  VERA colors  Original colors")?;
        for entry in entries {
            writeln!(
                f,
                "{:>5}  {}        {}",
                entry.index,
                entry.color,
                entry.originals.join(", ")
            )?;
        }
        return Ok(());
    }

    // one block per 16 entries: VERA colors on top, source colors below
    writeln!(f, "At the top of each column is the 12-bit VERA color, below corresponding color(s) in the original image.")?;
    writeln!(f, "{RULE}")?;
    for block in entries.chunks(COLUMNS) {
        let first = block[0].index;
        let last = first + block.len() - 1;
        write!(f, "{:>8}", format!("{first}-{last} "))?;
        for entry in block {
            write!(f, "  {}   ", entry.color)?;
        }
        writeln!(f)?;

        let depth = block.iter().map(|e| e.originals.len()).max().unwrap_or(0);
        for row in 0..depth {
            write!(f, "        ")?;
            for entry in block {
                match entry.originals.get(row) {
                    Some(original) => write!(f, "{original} ")?,
                    None => write!(f, ".         ")?,
                }
            }
            writeln!(f)?;
        }
    }
    Ok(())
}

/// Table of tile indices in reading order. Wide tables show the first 16
/// columns and the last one, long tables stop after about 1000 tiles.
fn write_tile_table(f: &mut fmt::Formatter<'_>, columns: usize, rows: usize) -> fmt::Result {
    let truncated = columns > COLUMNS;
    let shown: Vec<usize> = if truncated {
        (0..COLUMNS).chain([columns - 1]).collect()
    } else {
        (0..columns).collect()
    };

    let mut row = 0;
    while row < rows && (row + 1) * columns <= MAX_TABLE_TILES {
        let mut border = String::new();
        let mut numbers = String::new();
        for &col in &shown {
            if truncated && col == columns - 1 {
                border.push_str("|     ");
                numbers.push_str("| ... ");
            }
            border.push_str("|-----");
            numbers.push_str(&format!("| {:>3} ", row * columns + col));
        }
        writeln!(f, "{border}|")?;
        writeln!(f, "{numbers}|")?;
        row += 1;
    }

    let mut bottom = "|-----".repeat(columns.min(COLUMNS));
    if truncated {
        bottom.push_str("|     |-----");
    }
    writeln!(f, "{bottom}|")?;

    if row < rows {
        let mut dots = "   .  ".repeat(columns.min(COLUMNS));
        if truncated {
            dots.push_str("         .  ");
        }
        writeln!(f, "{dots}")?;
        writeln!(f, "{dots}")?;
    }
    Ok(())
}

fn number_list(values: &[u32]) -> String {
    values
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
