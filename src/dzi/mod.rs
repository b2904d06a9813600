//! Deep Zoom geometry layer.
//!
//! Everything here is pure computation: level counts, per-level scaled
//! dimensions, tile grid shapes, and per-tile pixel bounds, plus the DZI
//! XML descriptor document. No pixels are touched; the [`crate::pyramid`]
//! module consumes this geometry to materialize the tile tree.

mod coords;
mod descriptor;
mod format;

pub use coords::{TileBounds, TileCoords};
pub use descriptor::{
    PyramidDescriptor, DEFAULT_TILE_OVERLAP, DEFAULT_TILE_SIZE, MAX_TILE_OVERLAP, NS_DEEPZOOM,
};
pub use format::{
    clamp_quality, jpeg_quality, png_compression_level, png_compression_type, ResizeFilter,
    TileFormat, DEFAULT_IMAGE_QUALITY, DEFAULT_TILE_FORMAT,
};
