//! Output file formats
//!
//! Writers for the BMX container, the raw `.BIN` image and the palette files.
//! All writers take a [`std::io::Write`] sink and return the number of bytes
//! written.

mod bmx;
mod palette_file;

pub use bmx::{write_bmx, write_raw, BmxHeader, BMX_HEADER_LEN, BMX_MAGIC, BMX_VERSION, RAW_HEADER};
pub use palette_file::{
    assembly_text, basic_text, write_palette, PaletteEncoding, BASIC_FIRST_LINE, BASIC_LINE_STEP,
};
