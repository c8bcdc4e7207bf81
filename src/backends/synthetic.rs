// SPDX-License-Identifier: GPL-3.0-only

//! Synthetic frame source
//!
//! Generates a slowly animated scene so the viewer and probe loop can run
//! without a camera: a color gradient over a floor plane that recedes
//! towards the top of the image, with a strip of invalid depth along the
//! right edge like the shadow band of a stereo depth sensor.

use super::types::{BackendError, BackendResult, ColorFrame, DepthFrame, FrameSet};
use super::FrameSource;
use crate::constants::stream::FRAME_INTERVAL;
use std::time::Instant;

/// Depth at the bottom row (mm)
const NEAR_MM: f64 = 800.0;
/// Depth at the top row (mm)
const FAR_MM: f64 = 7000.0;
/// Fraction of the width on the right with no depth reading
const INVALID_BAND: f64 = 0.08;

pub struct SyntheticSource {
    width: u32,
    height: u32,
    depth_scale: f64,
    sequence: u64,
    last_frame: Option<Instant>,
}

impl SyntheticSource {
    pub fn new(width: u32, height: u32, depth_scale: f64) -> BackendResult<Self> {
        if width < 2 || height < 2 {
            return Err(BackendError::FormatNotSupported(format!(
                "synthetic scene needs at least 2x2 pixels, got {}x{}",
                width, height
            )));
        }
        Ok(Self {
            width,
            height,
            depth_scale,
            sequence: 0,
            last_frame: None,
        })
    }

    /// Render the scene for frame `sequence` without pacing
    pub fn render(&self, sequence: u64) -> BackendResult<FrameSet> {
        let (w, h) = (self.width as usize, self.height as usize);
        let phase = (sequence % 256) as u8;

        let mut rgb = Vec::with_capacity(w * h * 3);
        let mut depth = Vec::with_capacity(w * h);
        let band_start = ((1.0 - INVALID_BAND) * w as f64) as usize;

        for y in 0..h {
            let t = y as f64 / (h - 1) as f64;
            // Top rows are far, bottom rows near
            let plane_mm = FAR_MM + (NEAR_MM - FAR_MM) * t;

            for x in 0..w {
                rgb.push((x * 255 / (w - 1)) as u8);
                rgb.push((y * 255 / (h - 1)) as u8);
                let checker = ((x / 32 + y / 32) as u8).wrapping_mul(16);
                rgb.push(phase.wrapping_add(checker));

                let ripple = ((x as f64 / 40.0) + sequence as f64 * 0.1).sin() * 15.0;
                let mm = (plane_mm + ripple).round() as u16;
                depth.push(if x >= band_start { 0 } else { mm });
            }
        }

        let color = ColorFrame::from_rgb(self.width, self.height, rgb)?;
        let depth = DepthFrame::new(self.width, self.height, depth, self.depth_scale)?;
        FrameSet::new(color, depth, sequence)
    }
}

impl FrameSource for SyntheticSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn next_frameset(&mut self) -> BackendResult<FrameSet> {
        if let Some(last) = self.last_frame {
            let elapsed = last.elapsed();
            if elapsed < FRAME_INTERVAL {
                std::thread::sleep(FRAME_INTERVAL - elapsed);
            }
        }
        self.last_frame = Some(Instant::now());

        let frameset = self.render(self.sequence)?;
        self.sequence += 1;
        Ok(frameset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angle::PixelCoordinate;

    #[test]
    fn test_scene_layout() {
        let source = SyntheticSource::new(320, 180, 0.001).unwrap();
        let frameset = source.render(0).unwrap();
        assert_eq!((frameset.width(), frameset.height()), (320, 180));

        let top = frameset.depth.sample(PixelCoordinate::new(0, 10)).0;
        let bottom = frameset.depth.sample(PixelCoordinate::new(179, 10)).0;
        assert!(top > bottom, "floor should recede towards the top");

        // Right edge is the invalid band
        assert!(!frameset.depth.sample(PixelCoordinate::new(90, 319)).is_valid());
    }

    #[test]
    fn test_sequence_advances() {
        let mut source = SyntheticSource::new(16, 16, 0.001).unwrap();
        assert_eq!(source.next_frameset().unwrap().sequence, 0);
        assert_eq!(source.next_frameset().unwrap().sequence, 1);
    }

    #[test]
    fn test_rejects_tiny_scene() {
        assert!(SyntheticSource::new(1, 16, 0.001).is_err());
    }
}
