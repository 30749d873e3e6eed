use std::path::{Path, PathBuf};

use super::request::PaletteFormat;

/// Paths of every file a conversion can produce.
///
/// For `dir/name.png`:
///
/// | file           | name                     |
/// |----------------|--------------------------|
/// | raw image      | `NAME.BIN`               |
/// | BMX image      | `NAME.BMX`               |
/// | binary palette | `NAME-PALETTE.BIN`       |
/// | asm palette    | `name_palette.asm`       |
/// | BASIC palette  | `name_BASIC_palette.txt` |
/// | BASIC demo     | `name_demo.txt`          |
///
/// Binary files are upper case so the X16 `LOAD` commands can name them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNames {
    pub raw_image: PathBuf,
    pub bmx_image: PathBuf,
    pub bin_palette: PathBuf,
    pub asm_palette: PathBuf,
    pub basic_palette: PathBuf,
    pub demo: PathBuf,
}

impl OutputNames {
    /// Derive output names from the input path. Files go to `out_dir` when
    /// given, else next to the input.
    pub fn new(input: &Path, out_dir: Option<&Path>) -> Self {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let upper = stem.to_uppercase();
        let dir = out_dir
            .map(Path::to_path_buf)
            .or_else(|| input.parent().map(Path::to_path_buf))
            .unwrap_or_default();

        Self {
            raw_image: dir.join(format!("{upper}.BIN")),
            bmx_image: dir.join(format!("{upper}.BMX")),
            bin_palette: dir.join(format!("{upper}-PALETTE.BIN")),
            asm_palette: dir.join(format!("{stem}_palette.asm")),
            basic_palette: dir.join(format!("{stem}_BASIC_palette.txt")),
            demo: dir.join(format!("{stem}_demo.txt")),
        }
    }

    /// Path of the palette file in `format`.
    pub fn palette(&self, format: PaletteFormat) -> &Path {
        match format {
            PaletteFormat::Bin => &self.bin_palette,
            PaletteFormat::Asm => &self.asm_palette,
            PaletteFormat::Bas => &self.basic_palette,
        }
    }

    /// Base name used inside the demo program, e.g. `NAME`.
    pub fn program_name(&self) -> String {
        self.raw_image
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// File name without directories, for reports.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
