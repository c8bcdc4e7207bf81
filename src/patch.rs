// SPDX-License-Identifier: GPL-3.0-only

//! Color sampling around a clicked pixel

use crate::angle::PixelCoordinate;
use crate::backends::ColorFrame;
use serde::Serialize;

/// Inclusive pixel window, clamped to the image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PatchWindow {
    pub row_start: u32,
    pub row_end: u32,
    pub col_start: u32,
    pub col_end: u32,
}

impl PatchWindow {
    /// Square window of `radius` pixels around `center`
    ///
    /// Edges are clamped to `[0, width - 1]` x `[0, height - 1]`, so windows
    /// at the border shrink instead of wrapping.
    pub fn around(center: PixelCoordinate, radius: u32, width: u32, height: u32) -> Self {
        let center = center.clamped(width, height);
        Self {
            row_start: center.row.saturating_sub(radius),
            row_end: center.row.saturating_add(radius).min(height.saturating_sub(1)),
            col_start: center.col.saturating_sub(radius),
            col_end: center.col.saturating_add(radius).min(width.saturating_sub(1)),
        }
    }

    pub fn pixel_count(&self) -> u64 {
        (self.row_end - self.row_start + 1) as u64 * (self.col_end - self.col_start + 1) as u64
    }
}

/// Color at a click and the mean color of the window around it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorSample {
    pub center: [u8; 3],
    /// Per-channel mean over the window
    pub average: [f64; 3],
    pub window: PatchWindow,
}

/// Sample the color at `center` and average the window of `radius` around it
pub fn sample_patch(frame: &ColorFrame, center: PixelCoordinate, radius: u32) -> ColorSample {
    let window = PatchWindow::around(center, radius, frame.width, frame.height);

    let mut sum = [0u64; 3];
    for row in window.row_start..=window.row_end {
        let row_offset = (row * frame.stride) as usize;
        let start = row_offset + window.col_start as usize * 3;
        let end = row_offset + (window.col_end as usize + 1) * 3;
        for rgb in frame.data[start..end].chunks_exact(3) {
            sum[0] += rgb[0] as u64;
            sum[1] += rgb[1] as u64;
            sum[2] += rgb[2] as u64;
        }
    }

    let count = window.pixel_count() as f64;
    ColorSample {
        center: frame.pixel(center),
        average: sum.map(|s| s as f64 / count),
        window,
    }
}
