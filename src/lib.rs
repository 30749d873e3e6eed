//! veraconv - PNG to VERA converter
//!
//! Converts PNG images into bitmaps, BMX files, tile sets and sprite sets for
//! the Commander X16. The conversion itself lives in the `vera-bitmap` crate;
//! this library adds PNG decoding, request validation, output files and
//! reports, and is exposed for integration testing.

pub mod decode;
pub mod error;
pub mod models;
pub mod services;
