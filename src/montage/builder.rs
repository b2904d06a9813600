//! Plate montage composition.
//!
//! Locates per-well, per-field-of-view images in an input directory by
//! naming convention and composites them into one large 8-bit grayscale
//! plate canvas. A missing or undecodable FOV is substituted with a uniform
//! blank and reported through the log; it never aborts the montage. That is
//! the only place a bad source image is papered over; everything downstream
//! of the composed canvas fails fast.
//!
//! # File naming convention
//!
//! ```text
//! A02f03d2.TIFF
//! │ │  │  │ └── extension
//! │ │  │  └──── channel
//! │ │  └─────── field of view, zero-based
//! │ └────────── well column, one-based
//! └──────────── well row letter
//! ```

use std::path::Path;

use image::{GrayImage, Luma};
use tracing::{debug, warn};

use crate::error::MontageError;

use super::geometry::PlateGeometry;
use super::intensity::IntensityWindow;

/// Background of a substituted blank FOV (0.7 of full scale).
pub const EMPTY_FOV_BACKGROUND: u8 = 178;

/// Well canvas background, normal and inverted.
const WELL_BACKGROUND: u8 = u8::MAX;
const WELL_BACKGROUND_INVERTED: u8 = 100;

/// Plate canvas background, normal and inverted.
const PLATE_BACKGROUND: u8 = u8::MAX;
const PLATE_BACKGROUND_INVERTED: u8 = 10;

// =============================================================================
// Montage Builder
// =============================================================================

/// Composes the plate canvas from field-of-view images on disk.
#[derive(Debug, Clone)]
pub struct MontageBuilder {
    geometry: PlateGeometry,
    window: IntensityWindow,
    channel: u8,
    extension: String,
    invert: bool,
}

impl Default for MontageBuilder {
    fn default() -> Self {
        Self {
            geometry: PlateGeometry::default(),
            window: IntensityWindow::default(),
            channel: 0,
            extension: "TIFF".to_string(),
            invert: false,
        }
    }
}

impl MontageBuilder {
    pub fn new(geometry: PlateGeometry, window: IntensityWindow) -> Self {
        Self {
            geometry,
            window,
            ..Self::default()
        }
    }

    /// Channel digit in the FOV filename.
    pub fn with_channel(mut self, channel: u8) -> Self {
        self.channel = channel;
        self
    }

    /// File extension of the FOV images (case-sensitive, as on disk).
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Invert the 8-bit output (bright-field style screens).
    pub fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    pub fn geometry(&self) -> &PlateGeometry {
        &self.geometry
    }

    /// Filename of one FOV image per the naming convention.
    pub fn fov_file_name(&self, well_row: u32, well_column: u32, fov: u32) -> String {
        format!(
            "{}{:02}f{:02}d{}.{}",
            PlateGeometry::row_letter(well_row),
            well_column + 1,
            fov,
            self.channel,
            self.extension
        )
    }

    /// Compose the full plate canvas from images under `input_dir`.
    ///
    /// The montage searches only for files matching the naming convention
    /// for the configured geometry; it does not enumerate the directory.
    pub fn compose(&self, input_dir: &Path) -> Result<GrayImage, MontageError> {
        if !input_dir.is_dir() {
            return Err(MontageError::Io {
                path: input_dir.to_path_buf(),
                message: "input directory does not exist".to_string(),
            });
        }

        let background = if self.invert {
            PLATE_BACKGROUND_INVERTED
        } else {
            PLATE_BACKGROUND
        };
        let mut plate = GrayImage::from_pixel(
            self.geometry.plate_width(),
            self.geometry.plate_height(),
            Luma([background]),
        );

        for well_row in 0..self.geometry.plate_rows {
            for well_column in 0..self.geometry.plate_columns {
                let well = self.compose_well(input_dir, well_row, well_column);
                let (x, y) = self.geometry.well_origin(well_row, well_column);
                image::imageops::replace(&mut plate, &well, x as i64, y as i64);
            }
        }

        Ok(plate)
    }

    /// Compose one well sub-canvas from its FOVs.
    fn compose_well(&self, input_dir: &Path, well_row: u32, well_column: u32) -> GrayImage {
        let background = if self.invert {
            WELL_BACKGROUND_INVERTED
        } else {
            WELL_BACKGROUND
        };
        let mut well = GrayImage::from_pixel(
            self.geometry.well_width(),
            self.geometry.well_height(),
            Luma([background]),
        );

        for fov in 0..self.geometry.fovs_per_well() {
            let path = input_dir.join(self.fov_file_name(well_row, well_column, fov));
            let frame = match self.load_fov(&path) {
                Ok(frame) => {
                    debug!(path = %path.display(), "composited FOV");
                    frame
                }
                Err(err) => {
                    warn!(path = %path.display(), %err, "substituting blank FOV");
                    GrayImage::from_pixel(
                        self.geometry.fov_width,
                        self.geometry.fov_height,
                        Luma([EMPTY_FOV_BACKGROUND]),
                    )
                }
            };
            let (x, y) = self.geometry.fov_origin(fov);
            image::imageops::replace(&mut well, &frame, x as i64, y as i64);
        }

        well
    }

    /// Decode one 16-bit FOV frame and window it to 8 bits.
    fn load_fov(&self, path: &Path) -> Result<GrayImage, MontageError> {
        let decoded = image::open(path).map_err(|e| MontageError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        if decoded.width() != self.geometry.fov_width
            || decoded.height() != self.geometry.fov_height
        {
            return Err(MontageError::Decode {
                path: path.to_path_buf(),
                message: format!(
                    "unexpected dimensions {}x{} (expected {}x{})",
                    decoded.width(),
                    decoded.height(),
                    self.geometry.fov_width,
                    self.geometry.fov_height
                ),
            });
        }
        let mut frame = self.window.rescale(&decoded.to_luma16());
        if self.invert {
            for pixel in frame.pixels_mut() {
                pixel[0] = !pixel[0];
            }
        }
        Ok(frame)
    }
}

// =============================================================================
// Tests
// =============================================================================
