pub mod demo;
pub mod pipeline;
pub mod report;

pub use demo::{basic_program, SkipReason};
pub use pipeline::{analyze, analyze_image, ConversionPipeline};
pub use report::{AnalysisReport, ConversionReport, DemoNote, FileKind, WrittenFile};
