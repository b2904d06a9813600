//! Deep Zoom pyramid geometry.
//!
//! A [`PyramidDescriptor`] is pure geometry: given source dimensions and
//! tiling parameters it derives the level count, per-level scaled
//! dimensions, per-level tile grid shape, and per-tile pixel bounds. It is
//! immutable once constructed and serializes itself to the DZI XML
//! descriptor document.
//!
//! # Level numbering
//!
//! Deep Zoom counts levels from the smallest representation upward:
//! - level 0 is the ~1x1 representation
//! - level `num_levels - 1` reproduces the source dimensions exactly
//!
//! Each level doubles the previous one; `num_levels =
//! ceil(log2(max(width, height))) + 1`.
//!
//! # Descriptor document
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <Image xmlns="http://schemas.microsoft.com/deepzoom/2008"
//!        TileSize="254"
//!        Overlap="1"
//!        Format="png">
//!   <Size Width="27461" Height="18221" />
//! </Image>
//! ```

use std::fs;
use std::path::Path;

use crate::error::{BuildError, GeometryError};

use super::coords::{TileBounds, TileCoords};
use super::format::TileFormat;

/// Deep Zoom XML namespace.
pub const NS_DEEPZOOM: &str = "http://schemas.microsoft.com/deepzoom/2008";

/// Default tile edge length in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 254;

/// Default overlap between adjacent tiles in pixels.
pub const DEFAULT_TILE_OVERLAP: u32 = 1;

/// Maximum accepted tile overlap; larger requests are clamped.
pub const MAX_TILE_OVERLAP: u32 = 10;

// =============================================================================
// Pyramid Descriptor
// =============================================================================

/// Geometry of a Deep Zoom pyramid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PyramidDescriptor {
    width: u32,
    height: u32,
    tile_size: u32,
    tile_overlap: u32,
    tile_format: TileFormat,
    num_levels: usize,
}

impl PyramidDescriptor {
    /// Create a descriptor for a source image of `width` x `height` pixels.
    ///
    /// `tile_overlap` is clamped into `[0, MAX_TILE_OVERLAP]`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidDimensions`] if either dimension is
    /// zero and [`GeometryError::InvalidTileSize`] if `tile_size` is zero.
    pub fn new(
        width: u32,
        height: u32,
        tile_size: u32,
        tile_overlap: u32,
        tile_format: TileFormat,
    ) -> Result<Self, GeometryError> {
        if width == 0 || height == 0 {
            return Err(GeometryError::InvalidDimensions { width, height });
        }
        if tile_size == 0 {
            return Err(GeometryError::InvalidTileSize(tile_size));
        }

        let max_dimension = width.max(height) as f64;
        let num_levels = max_dimension.log2().ceil() as usize + 1;

        Ok(Self {
            width,
            height,
            tile_size,
            tile_overlap: tile_overlap.min(MAX_TILE_OVERLAP),
            tile_format,
            num_levels,
        })
    }

    /// Original source width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Original source height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Tile edge length in pixels (excluding overlap).
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Overlap between adjacent tiles in pixels.
    pub fn tile_overlap(&self) -> u32 {
        self.tile_overlap
    }

    /// Encoded tile format.
    pub fn tile_format(&self) -> TileFormat {
        self.tile_format
    }

    /// Number of levels in the pyramid.
    pub fn num_levels(&self) -> usize {
        self.num_levels
    }

    fn check_level(&self, level: usize) -> Result<(), GeometryError> {
        if level >= self.num_levels {
            return Err(GeometryError::InvalidLevel {
                level,
                num_levels: self.num_levels,
            });
        }
        Ok(())
    }

    /// Scale of a pyramid level relative to the source: `0.5^(max_level - level)`.
    ///
    /// The scale of the top level is exactly `1.0`.
    pub fn get_scale(&self, level: usize) -> Result<f64, GeometryError> {
        self.check_level(level)?;
        let max_level = self.num_levels - 1;
        Ok(0.5f64.powi((max_level - level) as i32))
    }

    /// Dimensions of a level as `(width, height)`.
    ///
    /// Both dimensions are `ceil(source_dim * scale)`; neither is ever zero.
    pub fn get_dimensions(&self, level: usize) -> Result<(u32, u32), GeometryError> {
        let scale = self.get_scale(level)?;
        let width = (self.width as f64 * scale).ceil() as u32;
        let height = (self.height as f64 * scale).ceil() as u32;
        Ok((width, height))
    }

    /// Tile grid shape of a level as `(columns, rows)`.
    pub fn get_num_tiles(&self, level: usize) -> Result<(u32, u32), GeometryError> {
        let (width, height) = self.get_dimensions(level)?;
        Ok((
            width.div_ceil(self.tile_size),
            height.div_ceil(self.tile_size),
        ))
    }

    /// Pixel bounds of a tile within its level's image.
    ///
    /// Tiles at column/row 0 carry one band of overlap on their trailing
    /// edge only; interior tiles carry overlap on both edges. Bounds are
    /// clamped so they never extend past the level's dimensions. The
    /// asymmetric rule gives adjacent tiles a shared border for seamless
    /// stitching without doubled overlap at the image boundary.
    pub fn get_tile_bounds(
        &self,
        level: usize,
        column: u32,
        row: u32,
    ) -> Result<TileBounds, GeometryError> {
        let (columns, rows) = self.get_num_tiles(level)?;
        if column >= columns || row >= rows {
            return Err(GeometryError::InvalidTileCoordinate {
                level,
                column,
                row,
                columns,
                rows,
            });
        }

        let (level_width, level_height) = self.get_dimensions(level)?;

        let offset_x = if column == 0 { 0 } else { self.tile_overlap };
        let offset_y = if row == 0 { 0 } else { self.tile_overlap };
        let x = (column * self.tile_size).saturating_sub(offset_x);
        let y = (row * self.tile_size).saturating_sub(offset_y);

        let bands_x = if column == 0 { 1 } else { 2 };
        let bands_y = if row == 0 { 1 } else { 2 };
        let width = (self.tile_size + bands_x * self.tile_overlap).min(level_width - x);
        let height = (self.tile_size + bands_y * self.tile_overlap).min(level_height - y);

        Ok(TileBounds {
            x,
            y,
            width,
            height,
        })
    }

    /// Replayable column-major enumeration of a level's tile coordinates.
    pub fn tiles(&self, level: usize) -> Result<TileCoords, GeometryError> {
        let (columns, rows) = self.get_num_tiles(level)?;
        Ok(TileCoords::new(columns, rows))
    }

    /// Render the DZI XML descriptor document.
    pub fn to_xml(&self) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<Image xmlns="{NS_DEEPZOOM}"
       TileSize="{tile_size}"
       Overlap="{overlap}"
       Format="{format}">
  <Size Width="{width}" Height="{height}" />
</Image>
"#,
            tile_size = self.tile_size,
            overlap = self.tile_overlap,
            format = self.tile_format,
            width = self.width,
            height = self.height,
        )
    }

    /// Write the descriptor document to `path` as UTF-8.
    pub fn save(&self, path: &Path) -> Result<(), BuildError> {
        fs::write(path, self.to_xml()).map_err(|e| BuildError::io(path, e))
    }
}

// =============================================================================
// Tests
// =============================================================================
