// SPDX-License-Identifier: GPL-3.0-only

//! depth-aim - point a laser where you click in a depth camera image
//!
//! Streams aligned color and depth frames, lets the operator pick a pixel,
//! and reports the color under it together with the horizontal and laser
//! angles needed to hit that point from an emitter mounted next to the
//! camera.
//!
//! # Architecture
//!
//! - [`angle`]: Pointing angle estimation (the geometry core)
//! - [`backends`]: Frame sources producing aligned color + depth pairs
//! - [`click`]: Click state owned by the pointer-event boundary
//! - [`patch`]: Color sampling around the click
//! - [`measure`]: Per-frame measurement combining all of the above
//! - [`terminal`]: Interactive terminal viewer
//! - [`config`]: User configuration handling
//!
//! # Example
//!
//! ```
//! use depth_aim::angle::{CameraGeometry, DepthSample, PixelCoordinate};
//!
//! let geometry = CameraGeometry::for_resolution(1280, 720, 69.0, 42.0, 50.0).unwrap();
//! let angles = geometry.estimate(PixelCoordinate::new(360, 640), DepthSample(2000));
//! assert_eq!(angles.horizontal_deg, 0.0);
//! ```

pub mod angle;
pub mod backends;
pub mod click;
pub mod config;
pub mod constants;
pub mod errors;
pub mod measure;
pub mod patch;
pub mod terminal;

// Re-export commonly used types
pub use angle::{AngleResult, CameraGeometry, DepthSample, PixelCoordinate, estimate};
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use measure::{Measurement, measure};
