//! Pyramid materialization layer.
//!
//! Consumes the geometry from [`crate::dzi`] to produce the on-disk tile
//! tree: per-level resampling, tile cropping, encoding, parallel dispatch,
//! and the final descriptor write.
//!
//! ```text
//! source image
//!      │
//!      ▼
//! ┌──────────────────────────────────────────────┐
//! │               PyramidBuilder                 │
//! │  Phase A: level-granularity worker pool      │
//! │  Phase B: tile-granularity worker pool       │
//! │      (resample → crop → encode → write)      │
//! └──────────────────────┬───────────────────────┘
//!                        ▼
//!          <basename>_files/<level>/<col>_<row>.<ext>
//!          <basename>.dzi
//! ```

mod builder;
mod cancel;
mod encoder;

pub use builder::{tiles_directory, PyramidBuilder, TILE_PARALLEL_LEVELS, TILE_POOL_WIDTH};
pub use cancel::CancelToken;
pub use encoder::TileEncoder;
