//! Configuration for the plate tiler.
//!
//! Command-line arguments via clap, with environment fallbacks under the
//! `PLATE_` prefix and sensible defaults for everything but the input
//! directory.
//!
//! # Environment Variables
//!
//! - `PLATE_OUT_DIR` - Output directory for the pyramid (default: dzi)
//! - `PLATE_OUT_FILE` - Basename of the descriptor file (default: dzi)
//! - `PLATE_CORES` - Worker count for the level-granularity phase (default: 4)
//! - `PLATE_TILE_SIZE` - Tile edge length (default: 254)
//! - `PLATE_QUALITY` - Image quality in [0, 1] (default: 0.8)

use std::path::PathBuf;

use clap::Parser;

use crate::dzi::{ResizeFilter, TileFormat, DEFAULT_TILE_OVERLAP, DEFAULT_TILE_SIZE};
use crate::montage::{IntensityWindow, PlateGeometry};

/// Default worker count for the level-granularity phase.
pub const DEFAULT_CORES: usize = 4;

/// Default image quality.
pub const DEFAULT_QUALITY: f64 = 0.8;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Plate Tiler - Deep Zoom pyramids from multi-well plate montages.
///
/// Finds per-well, per-field-of-view images in the input directory by naming
/// convention, composites them into one large plate montage, and cuts the
/// montage into a Deep Zoom tile pyramid.
#[derive(Parser, Debug, Clone)]
#[command(name = "plate-tiler")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Input directory with field-of-view images.
    pub input_dir: PathBuf,

    // =========================================================================
    // Output Configuration
    // =========================================================================
    /// Output directory for the descriptor and tile tree.
    #[arg(short = 'o', long, default_value = "dzi", env = "PLATE_OUT_DIR")]
    pub out_dir: PathBuf,

    /// Basename of the output descriptor file.
    #[arg(short = 'f', long, default_value = "dzi", env = "PLATE_OUT_FILE")]
    pub out_file: String,

    // =========================================================================
    // Plate Geometry
    // =========================================================================
    /// Plate dimensions as wells across and down.
    #[arg(short = 'p', long, num_args = 2, value_names = ["COLS", "ROWS"], default_values_t = [24, 16])]
    pub plate_dim: Vec<u32>,

    /// Well dimensions as fields of view across and down.
    #[arg(short = 'w', long, num_args = 2, value_names = ["COLS", "ROWS"], default_values_t = [4, 4])]
    pub well_dim: Vec<u32>,

    /// Field-of-view image dimensions in pixels.
    #[arg(short = 'm', long, num_args = 2, value_names = ["WIDTH", "HEIGHT"], default_values_t = [1104, 1104])]
    pub fov_dim: Vec<u32>,

    // =========================================================================
    // Intensity Handling
    // =========================================================================
    /// Intensity window for rescaling raw 16-bit samples.
    #[arg(short = 'I', long, num_args = 2, value_names = ["MIN", "MAX"], default_values_t = [250, 3000])]
    pub intensity: Vec<u16>,

    /// Invert the output image.
    #[arg(short = 'i', long, default_value_t = false)]
    pub invert: bool,

    /// Channel digit of the images to process.
    #[arg(short = 'c', long, default_value_t = 0)]
    pub channel: u8,

    /// File extension of the images to process.
    #[arg(short = 'x', long, default_value = "TIFF")]
    pub extension: String,

    // =========================================================================
    // Tiling Configuration
    // =========================================================================
    /// Tile edge length in pixels.
    #[arg(short = 't', long, default_value_t = DEFAULT_TILE_SIZE, env = "PLATE_TILE_SIZE")]
    pub tile_size: u32,

    /// Overlap between adjacent tiles in pixels (clamped to 0-10).
    #[arg(long, default_value_t = DEFAULT_TILE_OVERLAP)]
    pub overlap: u32,

    /// Tile format.
    #[arg(long, value_enum, default_value_t = TileFormat::Png)]
    pub format: TileFormat,

    /// Image quality in [0, 1]: JPEG quality for jpg, inverse compression
    /// effort for png.
    #[arg(short = 'q', long, default_value_t = DEFAULT_QUALITY, env = "PLATE_QUALITY")]
    pub quality: f64,

    /// Resampling filter for level downscaling.
    #[arg(long, value_enum, default_value_t = ResizeFilter::Lanczos)]
    pub resize_filter: ResizeFilter,

    /// Worker count for the level-granularity phase.
    #[arg(short = 'r', long, default_value_t = DEFAULT_CORES, env = "PLATE_CORES")]
    pub cores: usize,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        let [plate_columns, plate_rows] = two(&self.plate_dim);
        let [well_columns, well_rows] = two(&self.well_dim);
        let [fov_width, fov_height] = two(&self.fov_dim);

        if plate_columns == 0 || plate_rows == 0 {
            return Err("plate dimensions must both be positive".to_string());
        }
        if plate_rows > 26 {
            return Err("plate rows are lettered A-Z; at most 26 supported".to_string());
        }
        if well_columns == 0 || well_rows == 0 {
            return Err("well dimensions must both be positive".to_string());
        }
        if fov_width == 0 || fov_height == 0 {
            return Err("field-of-view dimensions must both be positive".to_string());
        }

        let [min, max] = two(&self.intensity);
        if max <= min {
            return Err("intensity window max must exceed min".to_string());
        }

        if self.tile_size == 0 {
            return Err("tile_size must be greater than 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.quality) {
            return Err("quality must be between 0 and 1".to_string());
        }
        if self.cores == 0 {
            return Err("cores must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Plate geometry assembled from the dimension arguments.
    pub fn plate_geometry(&self) -> PlateGeometry {
        let [plate_columns, plate_rows] = two(&self.plate_dim);
        let [well_columns, well_rows] = two(&self.well_dim);
        let [fov_width, fov_height] = two(&self.fov_dim);
        PlateGeometry {
            plate_columns,
            plate_rows,
            well_columns,
            well_rows,
            fov_width,
            fov_height,
            ..PlateGeometry::default()
        }
    }

    /// Intensity window assembled from the intensity arguments.
    pub fn intensity_window(&self) -> IntensityWindow {
        let [min, max] = two(&self.intensity);
        IntensityWindow { min, max }
    }

    /// Path of the output descriptor document.
    pub fn descriptor_path(&self) -> PathBuf {
        self.out_dir.join(format!("{}.dzi", self.out_file))
    }
}

/// First two elements of a clap `num_args = 2` argument.
fn two<T: Copy>(values: &[T]) -> [T; 2] {
    [values[0], values[1]]
}

// =============================================================================
// Tests
// =============================================================================
