//! Temporary directory holding test input files and conversion output.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use veraconv::models::{ConversionMode, ConversionRequest};

pub struct TestWorkspace {
    dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Directory conversion output goes to
    pub fn out_dir(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    /// Write an input file and return its path
    pub fn write_input(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, bytes).expect("Failed to write input file");
        path
    }

    /// Request converting `input` into [`Self::out_dir`]
    pub fn request(&self, input: &Path, mode: ConversionMode) -> ConversionRequest {
        ConversionRequest {
            out_dir: Some(self.out_dir()),
            ..ConversionRequest::new(input, mode)
        }
    }

    /// Read an output file
    pub fn output(&self, name: &str) -> Vec<u8> {
        let path = self.out_dir().join(name);
        std::fs::read(&path).unwrap_or_else(|e| panic!("Cannot read {}: {e}", path.display()))
    }

    pub fn output_text(&self, name: &str) -> String {
        String::from_utf8(self.output(name)).expect("Output is not UTF-8")
    }
}
