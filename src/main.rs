//! Plate Tiler - Deep Zoom pyramids from multi-well plate montages.
//!
//! This binary composes the plate montage and drives the pyramid build.

use std::fs;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use image::DynamicImage;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use plate_tiler::{Config, MontageBuilder, PyramidBuilder};

fn main() -> ExitCode {
    let config = Config::parse();

    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let geometry = config.plate_geometry();

    info!("Configuration:");
    info!("  Input: {}", config.input_dir.display());
    info!("  Output: {}", config.descriptor_path().display());
    info!(
        "  Plate: {}x{} wells, {}x{} FOVs/well, {}x{} px/FOV",
        geometry.plate_columns,
        geometry.plate_rows,
        geometry.well_columns,
        geometry.well_rows,
        geometry.fov_width,
        geometry.fov_height,
    );
    info!(
        "  Tiling: {} px tiles, {} px overlap, {} format, quality {}",
        config.tile_size, config.overlap, config.format, config.quality
    );
    info!("  Workers: {}", config.cores);

    // Compose the plate montage
    let montage_builder = MontageBuilder::new(geometry, config.intensity_window())
        .with_channel(config.channel)
        .with_extension(config.extension.clone())
        .with_invert(config.invert);

    info!("Composing plate montage...");
    let start = Instant::now();
    let montage = match montage_builder.compose(&config.input_dir) {
        Ok(montage) => montage,
        Err(e) => {
            error!("Montage error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!(
        "  Composed {}x{} px montage in {:.1}s",
        montage.width(),
        montage.height(),
        start.elapsed().as_secs_f64()
    );

    // Build the pyramid
    if let Err(e) = fs::create_dir_all(&config.out_dir) {
        error!("Failed to create {}: {}", config.out_dir.display(), e);
        return ExitCode::FAILURE;
    }

    let pyramid_builder = PyramidBuilder::new()
        .with_tile_size(config.tile_size)
        .with_tile_overlap(config.overlap)
        .with_format(config.format)
        .with_quality(config.quality)
        .with_resize_filter(config.resize_filter);

    info!("Building Deep Zoom pyramid...");
    let start = Instant::now();
    let source = DynamicImage::ImageLuma8(montage);
    match pyramid_builder.build(&source, &config.descriptor_path(), config.cores) {
        Ok(descriptor) => {
            info!(
                "  Built {} levels in {:.1}s",
                descriptor.num_levels(),
                start.elapsed().as_secs_f64()
            );
            info!("Done: {}", config.descriptor_path().display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Build error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "plate_tiler=debug"
    } else {
        "plate_tiler=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
