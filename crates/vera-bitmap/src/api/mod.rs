//! Public API for the vera-bitmap crate.
//!
//! [`Converter`] runs the whole pipeline and hands back a [`Conversion`]
//! that can be inspected and serialized.

mod converter;

pub use converter::{Conversion, Converter};
