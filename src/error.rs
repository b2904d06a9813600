use std::path::PathBuf;

use thiserror::Error;

/// Errors from pyramid geometry derivation.
#[derive(Debug, Clone, Error)]
pub enum GeometryError {
    /// Source dimensions must both be positive
    #[error("Invalid source dimensions: {width}x{height} (both must be positive)")]
    InvalidDimensions { width: u32, height: u32 },

    /// Tile size must be positive
    #[error("Invalid tile size: {0} (must be positive)")]
    InvalidTileSize(u32),

    /// Level index outside the pyramid
    #[error("Invalid pyramid level: {level} (pyramid has {num_levels} levels)")]
    InvalidLevel { level: usize, num_levels: usize },

    /// Tile coordinate outside the level's grid
    #[error(
        "Invalid tile coordinate: ({column}, {row}) at level {level} (grid is {columns}x{rows})"
    )]
    InvalidTileCoordinate {
        level: usize,
        column: u32,
        row: u32,
        columns: u32,
        rows: u32,
    },
}

/// Errors that can occur while building a pyramid.
///
/// Any tile or level failure is fatal for the whole build: a pyramid with
/// missing tiles is not a valid deliverable, so the first error wins and the
/// partial output tree must be treated as invalid by the caller.
#[derive(Debug, Clone, Error)]
pub enum BuildError {
    /// Geometry derivation failed before any I/O
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    /// A tile could not be encoded
    #[error("Failed to encode tile {column}_{row} at level {level}: {message}")]
    Encode {
        level: usize,
        column: u32,
        row: u32,
        message: String,
    },

    /// A tile, level directory, or the descriptor could not be written
    #[error("I/O error at {path}: {message}")]
    Io { path: PathBuf, message: String },

    /// A worker pool could not be constructed
    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    /// The build was cancelled between jobs
    #[error("Build cancelled")]
    Cancelled,
}

impl BuildError {
    /// Wrap an `std::io::Error` with the path it occurred at.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

/// Errors from montage composition.
///
/// These cover only failures of the montage canvas itself; a missing or
/// corrupt individual field-of-view image is substituted with a blank, not
/// raised (the pyramid builder downstream never papers over anything).
#[derive(Debug, Clone, Error)]
pub enum MontageError {
    /// The input directory is missing or unreadable
    #[error("I/O error at {path}: {message}")]
    Io { path: PathBuf, message: String },

    /// A source image could not be decoded
    #[error("Failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },
}
