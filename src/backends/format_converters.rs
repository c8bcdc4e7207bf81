// SPDX-License-Identifier: GPL-3.0-only

//! Depth frame visualization
//!
//! Turns a depth frame into an RGB color frame so the viewer can show the
//! depth stream with the same widget it uses for color.

use super::types::{BackendResult, ColorFrame, DepthFrame};
use crate::constants::{DEPTH_INVALID, depth_display};

/// Depth visualization options
#[derive(Debug, Clone, Copy)]
pub struct DepthVisualizationOptions {
    /// Use grayscale instead of colormap (near=bright, far=dark)
    pub grayscale: bool,
    /// Number of quantization bands, 0 for a continuous map
    pub quantize_bands: u32,
    /// Minimum depth in sensor units (values below are clamped)
    pub min_depth: u16,
    /// Maximum depth in sensor units (values above are clamped)
    pub max_depth: u16,
}

impl Default for DepthVisualizationOptions {
    fn default() -> Self {
        Self {
            grayscale: false,
            quantize_bands: depth_display::COLORMAP_BANDS,
            min_depth: depth_display::MIN_MM,
            max_depth: depth_display::MAX_MM,
        }
    }
}

impl DepthVisualizationOptions {
    /// Map everything up to the clipping distance, beyond it is clamped
    pub fn with_clipping(clipping_distance_m: f64, depth_scale: f64) -> Self {
        let max = (clipping_distance_m / depth_scale).clamp(1.0, u16::MAX as f64) as u16;
        Self {
            max_depth: max.max(depth_display::MIN_MM + 1),
            ..Self::default()
        }
    }
}

/// Turbo colormap: perceptually uniform rainbow (blue=near, red=far)
///
/// Polynomial approximation of the Google Turbo colormap.
fn turbo(t: f32) -> [u8; 3] {
    let r = (0.13572138
        + t * (4.6153926 + t * (-42.66032 + t * (132.13108 + t * (-152.54825 + t * 59.28144)))))
        .clamp(0.0, 1.0);
    let g = (0.09140261
        + t * (2.19418 + t * (4.84296 + t * (-14.18503 + t * (4.27805 + t * 2.53377)))))
        .clamp(0.0, 1.0);
    let b = (0.1066733
        + t * (12.64194 + t * (-60.58204 + t * (109.99648 + t * (-82.52904 + t * 20.43388)))))
        .clamp(0.0, 1.0);
    [(r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8]
}

/// Color a single depth value; invalid readings are black
pub fn depth_color(depth: u16, options: &DepthVisualizationOptions) -> [u8; 3] {
    if depth == DEPTH_INVALID {
        return [0, 0, 0];
    }

    let range = options.max_depth.saturating_sub(options.min_depth).max(1) as f32;
    let mut t = (depth.saturating_sub(options.min_depth) as f32 / range).clamp(0.0, 1.0);

    if options.quantize_bands > 0 {
        let bands = options.quantize_bands as f32;
        t = (t * bands).floor() / bands;
    }

    if options.grayscale {
        let gray = ((1.0 - t) * 255.0) as u8;
        [gray, gray, gray]
    } else {
        turbo(t)
    }
}

/// Render a depth frame as an RGB24 color frame
pub fn depth_to_color_frame(
    depth: &DepthFrame,
    options: &DepthVisualizationOptions,
) -> BackendResult<ColorFrame> {
    let mut rgb = Vec::with_capacity(depth.data.len() * 3);
    for &d in depth.data.iter() {
        rgb.extend_from_slice(&depth_color(d, options));
    }
    ColorFrame::from_rgb(depth.width, depth.height, rgb)
}
