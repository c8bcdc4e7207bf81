// SPDX-License-Identifier: GPL-3.0-only

//! File frame source
//!
//! Replays a recorded color image and its aligned 16-bit depth map as a
//! continuous stream, paced like a live camera.

use super::types::{BackendError, BackendResult, ColorFrame, DepthFrame, FrameSet};
use super::FrameSource;
use crate::constants::{file_formats, stream::FRAME_INTERVAL};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Load a color image as an RGB24 frame
pub fn load_color_frame(path: &Path) -> BackendResult<ColorFrame> {
    check_extension(path, file_formats::is_color_extension)?;

    let img = image::open(path)?;
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();

    debug!(path = %path.display(), width, height, "Loaded color image");
    ColorFrame::from_rgb(width, height, rgb.into_raw())
}

/// Load a 16-bit grayscale image as a depth frame
///
/// 8-bit images are rejected: rescaling them to 16 bits would invent depth
/// values.
pub fn load_depth_frame(path: &Path, depth_scale: f64) -> BackendResult<DepthFrame> {
    check_extension(path, file_formats::is_depth_extension)?;

    let img = image::open(path)?;
    let Some(luma) = img.as_luma16() else {
        return Err(BackendError::FormatNotSupported(format!(
            "{} is {:?}, depth maps must be 16-bit grayscale",
            path.display(),
            img.color()
        )));
    };
    let (width, height) = luma.dimensions();

    debug!(path = %path.display(), width, height, "Loaded depth map");
    DepthFrame::new(width, height, luma.as_raw().clone(), depth_scale)
}

fn check_extension(path: &Path, accepted: fn(&str) -> bool) -> BackendResult<()> {
    if !path.exists() {
        return Err(BackendError::NotAvailable(format!(
            "{} does not exist",
            path.display()
        )));
    }
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    if accepted(extension) {
        Ok(())
    } else {
        Err(BackendError::FormatNotSupported(format!(
            "Unsupported file format: {}",
            path.display()
        )))
    }
}

/// Frame source replaying one color/depth pair
pub struct FileSource {
    name: String,
    color: ColorFrame,
    depth: DepthFrame,
    sequence: u64,
    last_frame: Option<Instant>,
}

impl FileSource {
    pub fn open(color_path: &Path, depth_path: &Path, depth_scale: f64) -> BackendResult<Self> {
        let color = load_color_frame(color_path)?;
        let depth = load_depth_frame(depth_path, depth_scale)?;

        // Fail at open time rather than on every frame
        FrameSet::new(color.clone(), depth.clone(), 0)?;

        let name = color_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "files".to_string());

        info!(
            color = %color_path.display(),
            depth = %depth_path.display(),
            "File source ready"
        );

        Ok(Self {
            name,
            color,
            depth,
            sequence: 0,
            last_frame: None,
        })
    }
}

impl FrameSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolution(&self) -> (u32, u32) {
        (self.color.width, self.color.height)
    }

    fn next_frameset(&mut self) -> BackendResult<FrameSet> {
        if let Some(last) = self.last_frame {
            let elapsed = last.elapsed();
            if elapsed < FRAME_INTERVAL {
                std::thread::sleep(FRAME_INTERVAL - elapsed);
            }
        }
        self.last_frame = Some(Instant::now());

        let frameset = FrameSet::new(self.color.clone(), self.depth.clone(), self.sequence)?;
        self.sequence += 1;
        Ok(frameset)
    }
}
