//! # Plate Tiler
//!
//! Deep Zoom pyramid tiler for multi-well plate microscopy montages.
//!
//! This library composes per-well, per-field-of-view microscopy images into
//! one large plate montage and converts it into a navigable multi-resolution
//! Deep Zoom tile set: a hierarchy of progressively half-scaled versions of
//! the image, each level cut into fixed-size, slightly overlapping tiles,
//! plus a small XML descriptor recording geometry.
//!
//! ## Architecture
//!
//! - [`dzi`] - Pure pyramid geometry: level counts, per-level dimensions,
//!   tile grids, per-tile pixel bounds, and the DZI descriptor document
//! - [`pyramid`] - Build orchestration: per-level resampling, tile
//!   cropping/encoding/writing, two-phase parallel dispatch
//! - [`montage`] - Plate canvas composition from field-of-view images
//! - [`config`] - CLI and configuration types
//! - [`error`] - Error types per concern
//!
//! ## Example
//!
//! ```rust,no_run
//! use image::DynamicImage;
//! use plate_tiler::{PyramidBuilder, TileFormat};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let montage: DynamicImage = image::open("plate.png")?;
//!
//!     let descriptor = PyramidBuilder::new()
//!         .with_format(TileFormat::Png)
//!         .with_quality(0.8)
//!         .build(&montage, Path::new("out/plate.dzi"), 4)?;
//!
//!     println!("{} levels", descriptor.num_levels());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod dzi;
pub mod error;
pub mod montage;
pub mod pyramid;

// Re-export commonly used types
pub use config::Config;
pub use dzi::{PyramidDescriptor, ResizeFilter, TileBounds, TileCoords, TileFormat};
pub use error::{BuildError, GeometryError, MontageError};
pub use montage::{IntensityWindow, MontageBuilder, PlateGeometry};
pub use pyramid::{tiles_directory, CancelToken, PyramidBuilder, TileEncoder};
