//! Montage composition scenarios.

use std::path::Path;

use image::{ImageBuffer, Luma};
use plate_tiler::montage::EMPTY_FOV_BACKGROUND;
use plate_tiler::{
    tiles_directory, IntensityWindow, MontageBuilder, PlateGeometry, PyramidBuilder,
};
use tempfile::TempDir;

use super::test_utils::dir_entries;

/// Tiny plate for tests: one well of 2x2 FOVs, 8x8 px each.
fn small_geometry() -> PlateGeometry {
    PlateGeometry {
        plate_columns: 1,
        plate_rows: 1,
        well_columns: 2,
        well_rows: 2,
        fov_width: 8,
        fov_height: 8,
        ..PlateGeometry::default()
    }
}

/// Write a uniform 16-bit FOV frame.
fn write_fov(dir: &Path, name: &str, width: u32, height: u32, value: u16) {
    let frame: ImageBuffer<Luma<u16>, Vec<u16>> =
        ImageBuffer::from_pixel(width, height, Luma([value]));
    frame.save(dir.join(name)).unwrap();
}

#[test]
fn test_compose_with_missing_fov() {
    let tmp = TempDir::new().unwrap();
    let geometry = small_geometry();
    let window = IntensityWindow { min: 250, max: 3000 };
    let builder = MontageBuilder::new(geometry, window).with_extension("tiff");

    // FOVs 0, 1, 3 exist; FOV 2 is missing and gets a blank.
    write_fov(tmp.path(), "A01f00d0.tiff", 8, 8, 250); // windows to 0
    write_fov(tmp.path(), "A01f01d0.tiff", 8, 8, 3000); // windows to 255
    write_fov(tmp.path(), "A01f03d0.tiff", 8, 8, 3000);

    let montage = builder.compose(tmp.path()).unwrap();

    // 2 * 8 + 1 * 5 padding
    assert_eq!((montage.width(), montage.height()), (21, 21));

    // FOV 0 at (0, 0) windows to black
    assert_eq!(montage.get_pixel(0, 0)[0], 0);
    // FOV 1 at (13, 0) windows to white
    assert_eq!(montage.get_pixel(13, 0)[0], 255);
    // FOV 2 (missing) at (0, 13) is the substituted blank
    assert_eq!(montage.get_pixel(0, 13)[0], EMPTY_FOV_BACKGROUND);
    // FOV 3 at (13, 13)
    assert_eq!(montage.get_pixel(13, 13)[0], 255);
    // Padding between FOVs keeps the well background
    assert_eq!(montage.get_pixel(10, 0)[0], 255);
}

#[test]
fn test_compose_substitutes_blank_for_wrong_dimensions() {
    let tmp = TempDir::new().unwrap();
    let geometry = small_geometry();
    let builder =
        MontageBuilder::new(geometry, IntensityWindow::default()).with_extension("tiff");

    // Frame exists but has the wrong shape; treated like a corrupt file.
    write_fov(tmp.path(), "A01f00d0.tiff", 4, 4, 3000);

    let montage = builder.compose(tmp.path()).unwrap();
    assert_eq!(montage.get_pixel(0, 0)[0], EMPTY_FOV_BACKGROUND);
}

#[test]
fn test_compose_inverted() {
    let tmp = TempDir::new().unwrap();
    let geometry = small_geometry();
    let window = IntensityWindow { min: 250, max: 3000 };
    let builder = MontageBuilder::new(geometry, window)
        .with_extension("tiff")
        .with_invert(true);

    write_fov(tmp.path(), "A01f00d0.tiff", 8, 8, 3000);

    let montage = builder.compose(tmp.path()).unwrap();
    // White windows to 255, inverted to 0
    assert_eq!(montage.get_pixel(0, 0)[0], 0);
    // Inverted well background behind the missing FOVs
    assert_eq!(montage.get_pixel(10, 0)[0], 100);
}

#[test]
fn test_montage_to_pyramid_end_to_end() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("input");
    std::fs::create_dir(&input).unwrap();

    let geometry = small_geometry();
    let builder =
        MontageBuilder::new(geometry, IntensityWindow::default()).with_extension("tiff");
    for name in ["A01f00d0.tiff", "A01f01d0.tiff", "A01f02d0.tiff", "A01f03d0.tiff"] {
        write_fov(&input, name, 8, 8, 1500);
    }

    let montage = builder.compose(&input).unwrap();
    let destination = tmp.path().join("plate.dzi");
    let descriptor = PyramidBuilder::new()
        .build(&image::DynamicImage::ImageLuma8(montage), &destination, 2)
        .unwrap();

    // 21x21 canvas: ceil(log2(21)) + 1 = 6 levels, one tile per level
    assert_eq!(descriptor.num_levels(), 6);
    assert_eq!(descriptor.width(), 21);
    assert_eq!(descriptor.height(), 21);

    let files_root = tiles_directory(&destination);
    for level in 0..6 {
        assert_eq!(dir_entries(&files_root.join(level.to_string())), vec!["0_0.png"]);
    }
}
