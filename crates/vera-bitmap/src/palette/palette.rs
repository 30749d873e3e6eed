//! Ordered palette and provenance map.

use std::collections::{HashMap, HashSet};

use super::builder::TransparencySource;
use crate::color::{Rgba8, VeraColor};

/// Number of entries the VERA palette can hold.
pub const MAX_COLORS: usize = 256;

/// An ordered mapping from [`VeraColor`] to palette index.
///
/// Indices are assigned in insertion order. Index 0 always holds the color
/// chosen by the transparency protocol, recorded in [`Palette::selected_by`].
///
/// A `Palette` never holds more than [`MAX_COLORS`] entries; it is only
/// produced by [`PaletteDraft::finish`](super::PaletteDraft::finish), which
/// enforces that limit.
#[derive(Debug, Clone)]
pub struct Palette {
    colors: Vec<VeraColor>,
    lookup: HashMap<VeraColor, u8>,
    selected_by: TransparencySource,
}

impl Palette {
    /// Caller guarantees `colors` is non-empty, duplicate-free and at most
    /// [`MAX_COLORS`] long.
    pub(super) fn from_ordered(colors: Vec<VeraColor>, selected_by: TransparencySource) -> Self {
        let lookup = colors
            .iter()
            .enumerate()
            .map(|(index, &color)| (color, index as u8))
            .collect();
        Self {
            colors,
            lookup,
            selected_by,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Palette index of a quantized color.
    #[inline]
    pub fn index_of(&self, color: VeraColor) -> Option<u8> {
        self.lookup.get(&color).copied()
    }

    /// Color at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<VeraColor> {
        self.colors.get(index).copied()
    }

    /// All colors in index order.
    #[inline]
    pub fn colors(&self) -> &[VeraColor] {
        &self.colors
    }

    /// The color bound to index 0.
    #[inline]
    pub fn transparent_color(&self) -> VeraColor {
        self.colors[0]
    }

    /// Which rule picked the index-0 color.
    #[inline]
    pub fn selected_by(&self) -> TransparencySource {
        self.selected_by
    }

    /// The binary encoding of every entry, 2 bytes each, in index order.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.colors.iter().flat_map(|c| c.to_bytes()).collect()
    }
}

/// Which source colors quantized to each palette color.
///
/// Each source color is recorded once, under the entry it quantizes to, in
/// order of first appearance. Only reporting reads this; packing never does.
#[derive(Debug, Clone, Default)]
pub struct Provenance {
    originals: HashMap<VeraColor, Vec<Rgba8>>,
    seen: HashSet<Rgba8>,
}

impl Provenance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a source color. Returns its quantized form.
    pub fn record(&mut self, color: Rgba8) -> VeraColor {
        let quantized = VeraColor::quantize(color);
        if self.seen.insert(color) {
            self.originals.entry(quantized).or_default().push(color);
        }
        quantized
    }

    /// Source colors that collapsed into `color`, in order of first appearance.
    pub fn originals(&self, color: VeraColor) -> &[Rgba8] {
        self.originals.get(&color).map_or(&[], Vec::as_slice)
    }

    /// Number of distinct source colors seen.
    #[inline]
    pub fn original_color_count(&self) -> usize {
        self.seen.len()
    }
}
