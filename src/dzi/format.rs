//! Tile format and resampling filter selection.
//!
//! The tile format is a closed enum rather than a free-form string so that
//! encode behavior is matched exhaustively at compile time. Each variant
//! carries its own mapping from the single `image_quality` knob in [0, 1]
//! to the format-specific encoder parameter.

use clap::ValueEnum;
use image::imageops::FilterType;
use tracing::warn;

/// Default tile format when none is specified.
pub const DEFAULT_TILE_FORMAT: TileFormat = TileFormat::Png;

/// Default image quality in [0, 1].
pub const DEFAULT_IMAGE_QUALITY: f64 = 0.8;

// =============================================================================
// Tile Format
// =============================================================================

/// Encoded tile format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum TileFormat {
    /// Lossless PNG
    Png,
    /// Lossy JPEG
    Jpg,
}

impl TileFormat {
    /// File extension used for tile filenames and the descriptor's
    /// `Format` attribute.
    pub fn extension(&self) -> &'static str {
        match self {
            TileFormat::Png => "png",
            TileFormat::Jpg => "jpg",
        }
    }

    /// Resolve a format name, falling back to the default for unrecognized
    /// names.
    ///
    /// The fallback mirrors the behavior existing callers rely on; it is
    /// logged rather than silent. Callers that want strict validation should
    /// parse via [`ValueEnum`] instead (the CLI does).
    pub fn from_name(name: &str) -> TileFormat {
        match name {
            "png" => TileFormat::Png,
            "jpg" => TileFormat::Jpg,
            other => {
                warn!(
                    "Unrecognized tile format {:?}, falling back to {:?}",
                    other, DEFAULT_TILE_FORMAT
                );
                DEFAULT_TILE_FORMAT
            }
        }
    }
}

impl std::fmt::Display for TileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

// =============================================================================
// Quality Mapping
// =============================================================================

/// Clamp an image quality value into [0, 1].
#[inline]
pub fn clamp_quality(quality: f64) -> f64 {
    quality.clamp(0.0, 1.0)
}

/// Map image quality in [0, 1] to a JPEG quality percentage (0-100).
#[inline]
pub fn jpeg_quality(image_quality: f64) -> u8 {
    (clamp_quality(image_quality) * 100.0).round() as u8
}

/// Map image quality in [0, 1] to a PNG compression-effort level (0-10).
///
/// The mapping is inverse: higher requested quality means lower compression
/// effort, trading file size for encode speed.
#[inline]
pub fn png_compression_level(image_quality: f64) -> u8 {
    ((1.0 - clamp_quality(image_quality)) * 10.0).round() as u8
}

/// Bucket a PNG compression-effort level (0-10) onto the encoder's
/// supported compression types.
pub fn png_compression_type(level: u8) -> image::codecs::png::CompressionType {
    use image::codecs::png::CompressionType;
    match level {
        0..=3 => CompressionType::Fast,
        4..=7 => CompressionType::Default,
        _ => CompressionType::Best,
    }
}

// =============================================================================
// Resampling Filter
// =============================================================================

/// Resampling filter used when scaling the source image to a level's
/// dimensions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ResizeFilter {
    /// Nearest neighbor (fastest, aliased)
    Nearest,
    /// Linear interpolation
    Bilinear,
    /// Cubic interpolation
    Bicubic,
    /// Lanczos windowed sinc (high-quality antialiasing)
    #[default]
    Lanczos,
}

impl std::fmt::Display for ResizeFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ResizeFilter::Nearest => "nearest",
            ResizeFilter::Bilinear => "bilinear",
            ResizeFilter::Bicubic => "bicubic",
            ResizeFilter::Lanczos => "lanczos",
        };
        f.write_str(name)
    }
}

impl ResizeFilter {
    pub fn to_filter_type(self) -> FilterType {
        match self {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Bilinear => FilterType::Triangle,
            ResizeFilter::Bicubic => FilterType::CatmullRom,
            ResizeFilter::Lanczos => FilterType::Lanczos3,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
