//! Pyramid build orchestration.
//!
//! [`PyramidBuilder`] holds the tiling configuration, derives a
//! [`PyramidDescriptor`] from the source image's pixel dimensions, resamples
//! the source to each level's dimensions, crops each level into tiles per
//! the descriptor's bounds, encodes, and writes the level-indexed file tree.
//! The descriptor document is saved only after every tile write has
//! completed.
//!
//! # Work partitioning
//!
//! The low levels of a pyramid are tiny (a handful of tiles each) and are
//! dominated by per-file write overhead; the top few levels carry orders of
//! magnitude more tiles. Work is therefore dispatched in two phases:
//!
//! - **Phase A** (levels `0 .. num_levels - 3`): one worker owns one whole
//!   level: resample once, then crop and write its tiles serially. Pool
//!   width is the caller's parallelism hint.
//! - **Phase B** (the last 3 levels): the level is resampled once, then its
//!   tile jobs fan out across a fixed pool of [`TILE_POOL_WIDTH`] workers.
//!
//! The split affects wall-clock time only; filenames and pixel content are
//! fully determined by `(level, column, row)` regardless of interleaving.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use image::DynamicImage;
use rayon::prelude::*;
use tracing::debug;

use crate::dzi::{
    PyramidDescriptor, ResizeFilter, TileFormat, DEFAULT_IMAGE_QUALITY, DEFAULT_TILE_FORMAT,
    DEFAULT_TILE_OVERLAP, DEFAULT_TILE_SIZE,
};
use crate::error::BuildError;

use super::cancel::CancelToken;
use super::encoder::TileEncoder;

/// Width of the fixed tile-granularity pool used for the top levels.
///
/// Tuned empirically: past this width the per-tile crop/encode/write jobs
/// contend on the filesystem rather than scale.
pub const TILE_POOL_WIDTH: usize = 6;

/// Number of top levels dispatched at tile granularity.
pub const TILE_PARALLEL_LEVELS: usize = 3;

/// Derive the tile tree directory from the descriptor path.
///
/// The descriptor's extension is replaced by a `_files` suffix, as a sibling
/// directory: `plate.dzi` -> `plate_files/`.
pub fn tiles_directory(descriptor_path: &Path) -> PathBuf {
    let stem = descriptor_path.file_stem().unwrap_or_default();
    let mut name = stem.to_os_string();
    name.push("_files");
    descriptor_path.with_file_name(name)
}

// =============================================================================
// Pyramid Builder
// =============================================================================

/// Builds a Deep Zoom pyramid from an in-memory source image.
#[derive(Debug, Clone)]
pub struct PyramidBuilder {
    tile_size: u32,
    tile_overlap: u32,
    tile_format: TileFormat,
    image_quality: f64,
    resize_filter: ResizeFilter,
}

impl Default for PyramidBuilder {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            tile_overlap: DEFAULT_TILE_OVERLAP,
            tile_format: DEFAULT_TILE_FORMAT,
            image_quality: DEFAULT_IMAGE_QUALITY,
            resize_filter: ResizeFilter::default(),
        }
    }
}

impl PyramidBuilder {
    /// Create a builder with the default tiling parameters (254 px tiles,
    /// 1 px overlap, png, quality 0.8, lanczos resampling).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }

    pub fn with_tile_overlap(mut self, tile_overlap: u32) -> Self {
        self.tile_overlap = tile_overlap;
        self
    }

    pub fn with_format(mut self, format: TileFormat) -> Self {
        self.tile_format = format;
        self
    }

    /// Set the image quality in [0, 1]; clamped at encode time.
    pub fn with_quality(mut self, image_quality: f64) -> Self {
        self.image_quality = image_quality;
        self
    }

    pub fn with_resize_filter(mut self, filter: ResizeFilter) -> Self {
        self.resize_filter = filter;
        self
    }

    /// Build the full pyramid for `source`, writing the tile tree and the
    /// descriptor document at `destination`.
    ///
    /// `parallelism` is the worker count for the level-granularity phase
    /// (values below 1 are treated as 1). Returns the derived descriptor on
    /// success. On failure the partial output tree is left on disk and must
    /// be treated as invalid.
    pub fn build(
        &self,
        source: &DynamicImage,
        destination: &Path,
        parallelism: usize,
    ) -> Result<PyramidDescriptor, BuildError> {
        self.build_with_cancel(source, destination, parallelism, &CancelToken::new())
    }

    /// Like [`build`](Self::build), checking `cancel` between jobs.
    ///
    /// In-flight jobs finish; no new jobs start after cancellation and the
    /// build returns [`BuildError::Cancelled`] without saving a descriptor.
    pub fn build_with_cancel(
        &self,
        source: &DynamicImage,
        destination: &Path,
        parallelism: usize,
        cancel: &CancelToken,
    ) -> Result<PyramidDescriptor, BuildError> {
        let descriptor = PyramidDescriptor::new(
            source.width(),
            source.height(),
            self.tile_size,
            self.tile_overlap,
            self.tile_format,
        )?;
        let encoder = TileEncoder::new(self.tile_format, self.image_quality);

        let files_root = tiles_directory(destination);
        fs::create_dir_all(&files_root).map_err(|e| BuildError::io(&files_root, e))?;

        let num_levels = descriptor.num_levels();
        let tile_phase_start = num_levels.saturating_sub(TILE_PARALLEL_LEVELS);

        // Phase A: each worker owns one whole level.
        let level_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(parallelism.max(1))
            .build()
            .map_err(|e| BuildError::ThreadPool(e.to_string()))?;
        level_pool.install(|| {
            (0..tile_phase_start)
                .into_par_iter()
                .try_for_each(|level| {
                    if cancel.is_cancelled() {
                        return Err(BuildError::Cancelled);
                    }
                    self.write_level(source, &descriptor, &encoder, &files_root, level, cancel)
                })
        })?;

        // Phase B: resample serially, fan tile jobs across a fixed pool.
        let tile_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(TILE_POOL_WIDTH)
            .build()
            .map_err(|e| BuildError::ThreadPool(e.to_string()))?;
        for level in tile_phase_start..num_levels {
            if cancel.is_cancelled() {
                return Err(BuildError::Cancelled);
            }
            let level_image = self.level_image(source, &descriptor, level)?;
            let level_dir = create_level_dir(&files_root, level)?;
            let coords: Vec<(u32, u32)> = descriptor.tiles(level)?.collect();
            debug!(level, tiles = coords.len(), "dispatching tile jobs");
            tile_pool.install(|| {
                coords.par_iter().try_for_each(|&(column, row)| {
                    if cancel.is_cancelled() {
                        return Err(BuildError::Cancelled);
                    }
                    write_tile(
                        &level_image,
                        &descriptor,
                        &encoder,
                        &level_dir,
                        level,
                        column,
                        row,
                    )
                })
            })?;
        }

        descriptor.save(destination)?;
        Ok(descriptor)
    }

    /// Resample the original source to a level's dimensions.
    ///
    /// The full-resolution level borrows the source unresampled, avoiding
    /// redundant work and resampling-induced drift on the top tier. Lower
    /// levels are always resampled from the original source, never from a
    /// cascade of prior resamples.
    fn level_image<'a>(
        &self,
        source: &'a DynamicImage,
        descriptor: &PyramidDescriptor,
        level: usize,
    ) -> Result<Cow<'a, DynamicImage>, BuildError> {
        let (width, height) = descriptor.get_dimensions(level)?;
        if width == descriptor.width() && height == descriptor.height() {
            return Ok(Cow::Borrowed(source));
        }
        debug!(level, width, height, "resampling level");
        Ok(Cow::Owned(source.resize_exact(
            width,
            height,
            self.resize_filter.to_filter_type(),
        )))
    }

    /// Phase A level job: resample, then crop and write all tiles serially.
    fn write_level(
        &self,
        source: &DynamicImage,
        descriptor: &PyramidDescriptor,
        encoder: &TileEncoder,
        files_root: &Path,
        level: usize,
        cancel: &CancelToken,
    ) -> Result<(), BuildError> {
        let level_image = self.level_image(source, descriptor, level)?;
        let level_dir = create_level_dir(files_root, level)?;
        for (column, row) in descriptor.tiles(level)? {
            if cancel.is_cancelled() {
                return Err(BuildError::Cancelled);
            }
            write_tile(
                &level_image,
                descriptor,
                encoder,
                &level_dir,
                level,
                column,
                row,
            )?;
        }
        Ok(())
    }
}

/// Create a level directory on demand; existing directories are not an error.
fn create_level_dir(files_root: &Path, level: usize) -> Result<PathBuf, BuildError> {
    let level_dir = files_root.join(level.to_string());
    fs::create_dir_all(&level_dir).map_err(|e| BuildError::io(&level_dir, e))?;
    Ok(level_dir)
}

/// Crop, encode, and write a single tile.
fn write_tile(
    level_image: &DynamicImage,
    descriptor: &PyramidDescriptor,
    encoder: &TileEncoder,
    level_dir: &Path,
    level: usize,
    column: u32,
    row: u32,
) -> Result<(), BuildError> {
    let bounds = descriptor.get_tile_bounds(level, column, row)?;
    let tile = level_image.crop_imm(bounds.x, bounds.y, bounds.width, bounds.height);
    let data = encoder
        .encode(&tile)
        .map_err(|message| BuildError::Encode {
            level,
            column,
            row,
            message,
        })?;
    let tile_path = level_dir.join(format!(
        "{}_{}.{}",
        column,
        row,
        descriptor.tile_format().extension()
    ));
    fs::write(&tile_path, &data).map_err(|e| BuildError::io(&tile_path, e))
}

// =============================================================================
// Tests
// =============================================================================
