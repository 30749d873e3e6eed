//! Assertion helpers for tests.

use std::path::Path;

use pretty_assertions::assert_eq;
use vera_bitmap::unpack_indices;

/// Assert the directory contains exactly these file names, in any order
pub fn assert_files(dir: &Path, expected: &[&str]) {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap_or_else(|e| panic!("Cannot list {}: {e}", dir.display()))
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    let mut expected: Vec<String> = expected.iter().map(|s| s.to_string()).collect();
    expected.sort();
    assert_eq!(names, expected, "Unexpected files in {}", dir.display());
}

/// Assert the directory is empty or does not exist
pub fn assert_no_files(dir: &Path) {
    if dir.exists() {
        assert_files(dir, &[]);
    }
}

/// Assert a raw image file: 2-byte zero header, then pixels that unpack to `indices`
pub fn assert_raw_image(bytes: &[u8], bits_per_pixel: u8, indices: &[u8]) {
    assert!(bytes.len() >= 2, "Raw image too short: {} bytes", bytes.len());
    assert_eq!(&bytes[..2], &[0, 0], "Raw image header");
    assert_eq!(
        unpack_indices(&bytes[2..], bits_per_pixel, indices.len()),
        Some(indices.to_vec()),
        "Packed pixel indices"
    );
}

/// Assert a binary palette file holds these `$0RGB` words
pub fn assert_binary_palette(bytes: &[u8], words: &[u16]) {
    assert_eq!(&bytes[..2], &[0, 0], "Palette header");
    let actual: Vec<u16> = bytes[2..]
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    assert_eq!(actual, words, "Palette entries");
}
