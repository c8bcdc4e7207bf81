// SPDX-License-Identifier: GPL-3.0-only

//! One measurement per frame: what is under the click point

use crate::angle::{AngleResult, CameraGeometry, DepthSample, PixelCoordinate};
use crate::backends::FrameSet;
use crate::patch::{ColorSample, sample_patch};
use serde::Serialize;
use std::fmt;

/// Everything the operator sees for the current click
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Measurement {
    pub sequence: u64,
    pub pixel: PixelCoordinate,
    pub color: ColorSample,
    /// Raw reading, 0 when the sensor had no depth for this pixel
    pub depth_raw: u16,
    /// Depth used for the angles (raw or fallback)
    pub depth_effective: u16,
    /// Effective depth in meters
    pub depth_m: f64,
    /// Effective depth lies beyond the clipping distance
    pub beyond_clipping: bool,
    pub angles: AngleResult,
}

/// Measurement settings that do not change from frame to frame
#[derive(Debug, Clone, Copy)]
pub struct MeasureSettings {
    pub geometry: CameraGeometry,
    pub patch_radius: u32,
    /// Background threshold in depth units
    pub clipping_distance: f64,
}

impl Measurement {
    pub fn depth_valid(&self) -> bool {
        self.depth_raw != 0
    }
}

/// Measure `frameset` at the clicked `pixel`
///
/// The click is clamped to the frame; `settings.geometry` is expected to
/// describe the same resolution as the frameset.
pub fn measure(
    frameset: &FrameSet,
    pixel: PixelCoordinate,
    settings: &MeasureSettings,
) -> Measurement {
    let pixel = pixel.clamped(frameset.width(), frameset.height());
    let depth: DepthSample = frameset.depth.sample(pixel);
    let depth_effective = depth.effective();

    Measurement {
        sequence: frameset.sequence,
        pixel,
        color: sample_patch(&frameset.color, pixel, settings.patch_radius),
        depth_raw: depth.0,
        depth_effective,
        depth_m: depth_effective as f64 * frameset.depth.depth_scale,
        beyond_clipping: depth_effective as f64 > settings.clipping_distance,
        angles: settings.geometry.estimate(pixel, depth),
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.color.center;
        let [ar, ag, ab] = self.color.average;
        write!(
            f,
            "px {} rgb [{:3} {:3} {:3}] avg [{:6.1} {:6.1} {:6.1}] depth ",
            self.pixel, r, g, b, ar, ag, ab
        )?;
        if self.depth_valid() {
            write!(f, "{:.3} m", self.depth_m)?;
        } else {
            write!(f, "n/a ({:.3} m assumed)", self.depth_m)?;
        }
        if self.beyond_clipping {
            write!(f, " far")?;
        }
        write!(f, " | {}", self.angles)
    }
}
