pub mod file_names;
pub mod request;

pub use file_names::{display_name, OutputNames};
pub use request::{
    sizes_dividing, ConversionMode, ConversionRequest, PaletteFormat, BITMAP_WIDTHS, SPRITE_SIZES,
    TILE_SIZES,
};
