//! Shared helpers for integration tests.

use std::fs;
use std::path::Path;

use image::{DynamicImage, GrayImage, Luma};

/// Synthetic grayscale gradient where every pixel is a function of its
/// absolute position, so any crop can be checked against expectation.
pub fn gradient_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageLuma8(GrayImage::from_fn(width, height, |x, y| {
        Luma([((x * 3 + y * 7) % 251) as u8])
    }))
}

/// Sorted filenames within a directory.
pub fn dir_entries(path: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(path)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
