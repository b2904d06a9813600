//! Descriptor geometry and document scenarios.

use std::fs;

use plate_tiler::{PyramidDescriptor, TileFormat};
use tempfile::TempDir;

#[test]
fn test_level_count_formula() {
    // Exact powers of two: floor(log2) + 1 levels
    for (dim, expected) in [(1u32, 1usize), (2, 2), (4, 3), (256, 9), (1024, 11)] {
        let d = PyramidDescriptor::new(dim, dim, 254, 1, TileFormat::Png).unwrap();
        assert_eq!(d.num_levels(), expected, "dim {dim}");
    }
    // Otherwise ceil(log2) + 1
    for (dim, expected) in [(3u32, 3usize), (100, 8), (508, 10), (1000, 11)] {
        let d = PyramidDescriptor::new(dim, dim, 254, 1, TileFormat::Png).unwrap();
        assert_eq!(d.num_levels(), expected, "dim {dim}");
    }
}

#[test]
fn test_level_count_uses_larger_dimension() {
    let wide = PyramidDescriptor::new(1000, 10, 254, 1, TileFormat::Png).unwrap();
    let tall = PyramidDescriptor::new(10, 1000, 254, 1, TileFormat::Png).unwrap();
    assert_eq!(wide.num_levels(), 11);
    assert_eq!(tall.num_levels(), 11);
}

#[test]
fn test_508_scenario() {
    // 508x508, tile 254, overlap 1: the top level has a 2x2 grid and the
    // interior tile leads with overlap, clamping at the image boundary.
    let d = PyramidDescriptor::new(508, 508, 254, 1, TileFormat::Png).unwrap();
    let top = d.num_levels() - 1;
    assert_eq!(d.get_dimensions(top).unwrap(), (508, 508));
    assert_eq!(d.get_num_tiles(top).unwrap(), (2, 2));

    let bounds = d.get_tile_bounds(top, 1, 1).unwrap();
    assert_eq!(
        (bounds.x, bounds.y, bounds.right(), bounds.bottom()),
        (253, 253, 508, 508)
    );
}

#[test]
fn test_tile_grid_covers_level_exactly() {
    let d = PyramidDescriptor::new(1000, 600, 254, 1, TileFormat::Png).unwrap();
    for level in 0..d.num_levels() {
        let (width, height) = d.get_dimensions(level).unwrap();
        let (columns, rows) = d.get_num_tiles(level).unwrap();
        // The last tile in each axis reaches the level boundary exactly.
        let last = d.get_tile_bounds(level, columns - 1, rows - 1).unwrap();
        assert_eq!(last.right(), width);
        assert_eq!(last.bottom(), height);
    }
}

#[test]
fn test_saved_document_contents() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("plate.dzi");

    let d = PyramidDescriptor::new(27461, 18221, 254, 1, TileFormat::Jpg).unwrap();
    d.save(&path).unwrap();

    let xml = fs::read_to_string(&path).unwrap();
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(xml.contains("xmlns=\"http://schemas.microsoft.com/deepzoom/2008\""));
    assert!(xml.contains("TileSize=\"254\""));
    assert!(xml.contains("Overlap=\"1\""));
    assert!(xml.contains("Format=\"jpg\""));
    // Original source dimensions, not any level's
    assert!(xml.contains("Width=\"27461\""));
    assert!(xml.contains("Height=\"18221\""));
}

#[test]
fn test_save_to_unwritable_path_fails() {
    let tmp = TempDir::new().unwrap();
    let d = PyramidDescriptor::new(100, 100, 254, 1, TileFormat::Png).unwrap();
    let result = d.save(&tmp.path().join("missing").join("plate.dzi"));
    assert!(result.is_err());
}
