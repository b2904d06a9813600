//! Plate montage layer.
//!
//! Builds the single large input canvas for the pyramid builder from
//! per-well, per-field-of-view microscopy images: intensity windowing,
//! 16-to-8-bit reduction, optional inversion, blank substitution for
//! missing frames, and compositing into a padded grid.

mod builder;
mod geometry;
mod intensity;

pub use builder::{MontageBuilder, EMPTY_FOV_BACKGROUND};
pub use geometry::{PlateGeometry, DEFAULT_FOV_PADDING, DEFAULT_WELL_PADDING};
pub use intensity::IntensityWindow;
