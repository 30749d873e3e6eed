use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use vera_bitmap::{Conversion, Converter, PaletteBuilder, PaletteEncoding, Rgba8, SourceImage};

use crate::decode::read_png;
use crate::error::AppError;
use crate::models::{ConversionMode, ConversionRequest, OutputNames, PaletteFormat};
use crate::services::demo;
use crate::services::report::{AnalysisReport, ConversionReport, DemoNote, FileKind, WrittenFile};

/// A file rendered in memory, not yet on disk
#[derive(Debug, Clone)]
struct Artifact {
    kind: FileKind,
    path: PathBuf,
    bytes: Vec<u8>,
}

/// Conversion pipeline: decode → validate → convert → render → write
///
/// Every output file is rendered into memory before the first one is
/// written, so a failing conversion leaves the output directory untouched.
pub struct ConversionPipeline {
    request: ConversionRequest,
    names: OutputNames,
}

impl ConversionPipeline {
    pub fn new(request: ConversionRequest) -> Self {
        let names = OutputNames::new(&request.input, request.out_dir.as_deref());
        Self { request, names }
    }

    /// Decode the input file and convert it
    pub fn run(&self) -> Result<ConversionReport, AppError> {
        let image = read_png(&self.request.input)?;
        self.convert(&image)
    }

    /// Convert an already decoded image
    pub fn convert(&self, image: &SourceImage) -> Result<ConversionReport, AppError> {
        let request = &self.request;
        let tile = request.validate(image.width(), image.height())?;

        let mut converter = Converter::new(request.mode.target());
        if let Some(tile) = tile {
            converter = converter.tile_size(tile.width, tile.height);
        }
        if let Some(color) = request.transparent {
            converter = converter.transparent_color(color);
        }
        let conversion = converter.convert(image)?;

        tracing::debug!(
            input = %request.input.display(),
            mode = %request.mode,
            colors = conversion.palette().len(),
            bytes = conversion.pixels().len(),
            "Image converted"
        );

        let (artifacts, demo) = self.render(&conversion)?;
        let files = write_artifacts(artifacts)?;

        Ok(ConversionReport::new(
            &request.input,
            request.mode,
            &conversion,
            files,
            demo,
        ))
    }

    /// Render all output files into memory
    fn render(&self, conversion: &Conversion) -> Result<(Vec<Artifact>, DemoNote), AppError> {
        let request = &self.request;
        let names = &self.names;
        let mut artifacts = Vec::new();

        let image_path = match request.mode {
            ConversionMode::Bmx => &names.bmx_image,
            _ => &names.raw_image,
        };
        let mut bytes = Vec::new();
        conversion.write_image(&mut bytes)?;
        artifacts.push(Artifact {
            kind: FileKind::Image,
            path: image_path.clone(),
            bytes,
        });

        let format = request.palette_format();
        if let Some(format) = format {
            let path = names.palette(format);
            artifacts.push(palette_artifact(conversion, path, format.encoding())?);
        }
        // The demo loads the binary palette; BMX demos read it from the image
        let needs_binary = request.demo
            && request.mode != ConversionMode::Bmx
            && format != Some(PaletteFormat::Bin);
        if needs_binary {
            artifacts.push(palette_artifact(
                conversion,
                &names.bin_palette,
                PaletteEncoding::Binary,
            )?);
        }

        let demo = if request.demo {
            match demo::basic_program(conversion, &names.program_name()) {
                Ok(program) => {
                    artifacts.push(Artifact {
                        kind: FileKind::Demo,
                        path: names.demo.clone(),
                        bytes: program.into_bytes(),
                    });
                    DemoNote::Written {
                        path: names.demo.clone(),
                    }
                }
                Err(reason) => {
                    tracing::warn!(reason = %reason, "Demo program skipped");
                    DemoNote::Skipped {
                        reason: reason.to_string(),
                    }
                }
            }
        } else {
            DemoNote::NotRequested
        };

        Ok((artifacts, demo))
    }
}

/// Analyze an image file without writing anything
pub fn analyze(input: &Path, transparent: Option<Rgba8>) -> Result<AnalysisReport, AppError> {
    let image = read_png(input)?;
    analyze_image(input, &image, transparent)
}

/// Analyze an already decoded image
pub fn analyze_image(
    input: &Path,
    image: &SourceImage,
    transparent: Option<Rgba8>,
) -> Result<AnalysisReport, AppError> {
    let draft = PaletteBuilder::new(image)
        .transparent_color(transparent)
        .draft()?;
    tracing::debug!(
        input = %input.display(),
        colors = draft.len(),
        fits = draft.fits(),
        "Image analyzed"
    );
    Ok(AnalysisReport::new(input, image, &draft))
}

fn palette_artifact(
    conversion: &Conversion,
    path: &Path,
    encoding: PaletteEncoding,
) -> Result<Artifact, AppError> {
    let mut bytes = Vec::new();
    conversion.write_palette(&mut bytes, encoding)?;
    Ok(Artifact {
        kind: FileKind::Palette,
        path: path.to_path_buf(),
        bytes,
    })
}

/// Write every artifact or none of them.
///
/// Each file is staged as a temporary sibling of its target and renamed
/// into place only once all of them are staged. A failed rename removes the
/// targets already renamed, and any directory created here is removed again
/// if it is left empty.
fn write_artifacts(artifacts: Vec<Artifact>) -> Result<Vec<WrittenFile>, AppError> {
    let mut created_dirs = Vec::new();
    let result = stage_and_persist(artifacts, &mut created_dirs);
    if result.is_err() {
        // Deepest first; non-empty directories stay.
        for dir in &created_dirs {
            let _ = fs::remove_dir(dir);
        }
    }
    result
}

fn stage_and_persist(
    artifacts: Vec<Artifact>,
    created_dirs: &mut Vec<PathBuf>,
) -> Result<Vec<WrittenFile>, AppError> {
    let mut staged = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let dir = match artifact.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        create_missing_dirs(&dir, created_dirs)?;

        let mut file = NamedTempFile::new_in(&dir).map_err(|source| AppError::Io {
            path: dir.clone(),
            source,
        })?;
        file.write_all(&artifact.bytes).map_err(|source| AppError::Io {
            path: artifact.path.clone(),
            source,
        })?;
        staged.push((artifact, file));
    }

    let mut written: Vec<WrittenFile> = Vec::with_capacity(staged.len());
    for (artifact, file) in staged {
        if let Err(error) = file.persist(&artifact.path) {
            for file in &written {
                if let Err(e) = fs::remove_file(&file.path) {
                    tracing::warn!(
                        path = %file.path.display(),
                        error = %e,
                        "Cannot remove partial output"
                    );
                }
            }
            return Err(AppError::Io {
                path: artifact.path,
                source: error.error,
            });
        }
        written.push(WrittenFile {
            kind: artifact.kind,
            path: artifact.path,
            bytes: artifact.bytes.len(),
        });
    }

    for file in &written {
        tracing::info!(path = %file.path.display(), bytes = file.bytes, "Wrote file");
    }
    Ok(written)
}

/// Create `dir` and record every directory that did not exist before.
fn create_missing_dirs(dir: &Path, created: &mut Vec<PathBuf>) -> Result<(), AppError> {
    let missing: Vec<PathBuf> = dir
        .ancestors()
        .take_while(|d| !d.as_os_str().is_empty() && !d.exists())
        .map(Path::to_path_buf)
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|source| AppError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    created.extend(missing);
    Ok(())
}
