//! Tile encoder.
//!
//! Encodes a cropped level image to the configured tile format. The single
//! `image_quality` knob in [0, 1] maps to format-specific parameters: a
//! JPEG quality percentage for the lossy format, a compression-effort level
//! for the lossless one (see [`crate::dzi::png_compression_level`]).

use std::io::Cursor;

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{FilterType as PngFilterType, PngEncoder};
use image::DynamicImage;

use crate::dzi::{clamp_quality, jpeg_quality, png_compression_level, png_compression_type, TileFormat};

/// Encodes tiles at a fixed format and quality.
#[derive(Debug, Clone)]
pub struct TileEncoder {
    format: TileFormat,
    image_quality: f64,
}

impl TileEncoder {
    /// Create an encoder; `image_quality` is clamped into [0, 1].
    pub fn new(format: TileFormat, image_quality: f64) -> Self {
        Self {
            format,
            image_quality: clamp_quality(image_quality),
        }
    }

    /// The configured tile format.
    pub fn format(&self) -> TileFormat {
        self.format
    }

    /// Encode one tile, returning the encoded bytes.
    ///
    /// Errors carry the encoder's message; the caller attaches tile
    /// coordinates.
    pub fn encode(&self, tile: &DynamicImage) -> Result<Bytes, String> {
        let mut output = Vec::new();
        match self.format {
            TileFormat::Jpg => {
                let encoder = JpegEncoder::new_with_quality(
                    Cursor::new(&mut output),
                    jpeg_quality(self.image_quality),
                );
                tile.write_with_encoder(encoder)
                    .map_err(|e| e.to_string())?;
            }
            TileFormat::Png => {
                let compression = png_compression_type(png_compression_level(self.image_quality));
                let encoder = PngEncoder::new_with_quality(
                    Cursor::new(&mut output),
                    compression,
                    PngFilterType::Adaptive,
                );
                tile.write_with_encoder(encoder)
                    .map_err(|e| e.to_string())?;
            }
        }
        Ok(Bytes::from(output))
    }
}

// =============================================================================
// Tests
// =============================================================================
