// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands
//!
//! This module provides command-line functionality for:
//! - Computing angles for a single pixel
//! - Probing a frame source at a fixed pixel
//! - Showing and saving the configuration

use depth_aim::Config;
use depth_aim::angle::{DepthSample, PixelCoordinate, vertical_offset_deg};
use depth_aim::backends::open_source;
use depth_aim::constants::timing::FIRST_FRAME_TIMEOUT;
use depth_aim::measure::{MeasureSettings, measure};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{info, warn};

/// Print the angles for one pixel at one depth
pub fn estimate_angle(
    config: &Config,
    row: u32,
    col: u32,
    depth_mm: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let geometry = config.geometry()?;

    let requested = PixelCoordinate::new(row, col);
    let pixel = requested.clamped(config.width, config.height);
    if pixel != requested {
        warn!(%requested, clamped = %pixel, "Pixel outside the image, clamped");
    }

    let depth = DepthSample(depth_mm);
    let angles = geometry.estimate(pixel, depth);

    println!("Image:      {}x{}", config.width, config.height);
    println!("Pixel:      {}", pixel);
    if depth.is_valid() {
        println!("Depth:      {}", depth.0);
    } else {
        println!("Depth:      no reading, using {}", depth.effective());
    }
    println!("Horizontal: {:+.3}°", angles.horizontal_deg);
    println!("Vertical:   {:+.3}°", vertical_offset_deg(pixel, &geometry));
    println!("Laser:      {:+.3}°", angles.laser_deg);

    Ok(())
}

/// Run the acquire -> measure -> print loop at a fixed pixel
pub fn probe(
    config: &Config,
    row: u32,
    col: u32,
    frames: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    config.validate()?;
    let mut source = open_source(config)?;
    let (width, height) = source.resolution();

    let settings = MeasureSettings {
        geometry: Config {
            width,
            height,
            ..config.clone()
        }
        .geometry()?,
        patch_radius: config.patch_radius,
        clipping_distance: config.clipping_distance_units(),
    };

    let pixel = PixelCoordinate::new(row, col).clamped(width, height);
    println!("Probing {} at {} ({}x{})", source.name(), pixel, width, height);
    println!("(press Ctrl+C to stop)");

    let stop_flag = Arc::new(AtomicBool::new(false));
    let stop_flag_clone = stop_flag.clone();
    ctrlc::set_handler(move || {
        stop_flag_clone.store(true, Ordering::SeqCst);
    })?;

    let start = Instant::now();
    let mut count = 0u64;

    while !stop_flag.load(Ordering::SeqCst) {
        if frames.is_some_and(|limit| count >= limit) {
            break;
        }

        let frameset = match source.next_frameset() {
            Ok(frameset) => frameset,
            Err(e) if count == 0 && start.elapsed() < FIRST_FRAME_TIMEOUT => {
                warn!(error = %e, "No frame yet, retrying");
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let measurement = measure(&frameset, pixel, &settings);
        println!("{:>6} {}", measurement.sequence, measurement);
        count += 1;
    }

    info!(frames = count, elapsed = ?start.elapsed(), "Probe finished");
    Ok(())
}

/// Print the effective configuration, optionally saving it
pub fn show_config(
    config: &Config,
    path: &Path,
    save: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Config file: {}", path.display());
    println!("{}", serde_json::to_string_pretty(config)?);

    match config.geometry() {
        Ok(geometry) => println!(
            "Geometry:    center {} hfov {}° vfov {}° offset {}",
            geometry.center(),
            geometry.hfov_deg(),
            geometry.vfov_deg(),
            geometry.height_offset()
        ),
        Err(e) => println!("Geometry:    invalid ({})", e),
    }

    if save {
        config.save_to(path)?;
        println!("Saved.");
    }

    Ok(())
}
