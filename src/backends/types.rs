// SPDX-License-Identifier: GPL-3.0-only

//! Shared frame types for frame sources

use crate::angle::{DepthSample, PixelCoordinate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Which frame source to read from
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Generated test scene, no hardware needed
    #[default]
    Synthetic,
    /// A color image and a 16-bit depth map replayed from disk
    Files,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Synthetic => write!(f, "synthetic"),
            SourceKind::Files => write!(f, "files"),
        }
    }
}

/// Packed RGB24 color image, row-major
#[derive(Debug, Clone)]
pub struct ColorFrame {
    pub width: u32,
    pub height: u32,
    /// Bytes per row
    pub stride: u32,
    pub data: Arc<[u8]>,
}

impl ColorFrame {
    /// Wrap tightly packed RGB bytes
    pub fn from_rgb(width: u32, height: u32, data: Vec<u8>) -> BackendResult<Self> {
        if width == 0 || height == 0 {
            return Err(BackendError::FormatNotSupported(format!(
                "empty color frame {}x{}",
                width, height
            )));
        }
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(BackendError::FormatNotSupported(format!(
                "color frame {}x{} needs {} bytes, got {}",
                width,
                height,
                expected,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            stride: width * 3,
            data: Arc::from(data.into_boxed_slice()),
        })
    }

    /// RGB value at `pixel`, clamped to the frame
    pub fn pixel(&self, pixel: PixelCoordinate) -> [u8; 3] {
        let pixel = pixel.clamped(self.width, self.height);
        let idx = (pixel.row * self.stride + pixel.col * 3) as usize;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }
}

/// 16-bit depth image in the color pixel grid, row-major
#[derive(Debug, Clone)]
pub struct DepthFrame {
    pub width: u32,
    pub height: u32,
    pub data: Arc<[u16]>,
    /// Meters per depth unit
    pub depth_scale: f64,
}

impl DepthFrame {
    pub fn new(width: u32, height: u32, data: Vec<u16>, depth_scale: f64) -> BackendResult<Self> {
        if width == 0 || height == 0 {
            return Err(BackendError::FormatNotSupported(format!(
                "empty depth frame {}x{}",
                width, height
            )));
        }
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(BackendError::FormatNotSupported(format!(
                "depth frame {}x{} needs {} samples, got {}",
                width,
                height,
                expected,
                data.len()
            )));
        }
        if !(depth_scale > 0.0 && depth_scale.is_finite()) {
            return Err(BackendError::FormatNotSupported(format!(
                "invalid depth scale {}",
                depth_scale
            )));
        }
        Ok(Self {
            width,
            height,
            data: Arc::from(data.into_boxed_slice()),
            depth_scale,
        })
    }

    /// Depth reading at `pixel`, clamped to the frame
    pub fn sample(&self, pixel: PixelCoordinate) -> DepthSample {
        let pixel = pixel.clamped(self.width, self.height);
        DepthSample(self.data[(pixel.row * self.width + pixel.col) as usize])
    }
}

/// Color frame with its aligned depth frame
#[derive(Debug, Clone)]
pub struct FrameSet {
    pub color: ColorFrame,
    pub depth: DepthFrame,
    /// Monotonic frame counter of the producing source
    pub sequence: u64,
    pub captured_at: Instant,
}

impl FrameSet {
    /// Pair a color and depth frame; both must share the same pixel grid
    pub fn new(color: ColorFrame, depth: DepthFrame, sequence: u64) -> BackendResult<Self> {
        if color.width != depth.width || color.height != depth.height {
            return Err(BackendError::FormatNotSupported(format!(
                "depth {}x{} is not aligned to color {}x{}",
                depth.width, depth.height, color.width, color.height
            )));
        }
        Ok(Self {
            color,
            depth,
            sequence,
            captured_at: Instant::now(),
        })
    }

    pub fn width(&self) -> u32 {
        self.color.width
    }

    pub fn height(&self) -> u32 {
        self.color.height
    }
}

/// Result type for frame source operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Error types for frame source operations
#[derive(Debug, Clone)]
pub enum BackendError {
    /// Source cannot be used (missing input, no device)
    NotAvailable(String),
    /// Frame layout or pixel format not supported
    FormatNotSupported(String),
    /// General I/O error
    IoError(String),
    /// Other errors
    Other(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::NotAvailable(msg) => write!(f, "Source not available: {}", msg),
            BackendError::FormatNotSupported(msg) => write!(f, "Format not supported: {}", msg),
            BackendError::IoError(msg) => write!(f, "I/O error: {}", msg),
            BackendError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

impl From<image::ImageError> for BackendError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => BackendError::IoError(e.to_string()),
            image::ImageError::Unsupported(e) => BackendError::FormatNotSupported(e.to_string()),
            other => BackendError::Other(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_frame_size_check() {
        assert!(ColorFrame::from_rgb(2, 2, vec![0; 12]).is_ok());
        assert!(ColorFrame::from_rgb(2, 2, vec![0; 11]).is_err());
        assert!(ColorFrame::from_rgb(0, 2, Vec::new()).is_err());
    }

    #[test]
    fn test_color_pixel_lookup() {
        let data = (0..12).collect::<Vec<u8>>();
        let frame = ColorFrame::from_rgb(2, 2, data).unwrap();
        assert_eq!(frame.pixel(PixelCoordinate::new(1, 0)), [6, 7, 8]);
        // Out of bounds clamps to the last pixel
        assert_eq!(frame.pixel(PixelCoordinate::new(5, 5)), [9, 10, 11]);
    }

    #[test]
    fn test_depth_sample_lookup() {
        let frame = DepthFrame::new(3, 1, vec![10, 0, 30], 0.001).unwrap();
        assert_eq!(frame.sample(PixelCoordinate::new(0, 2)), DepthSample(30));
        assert!(!frame.sample(PixelCoordinate::new(0, 1)).is_valid());
    }

    #[test]
    fn test_frameset_requires_alignment() {
        let color = ColorFrame::from_rgb(2, 1, vec![0; 6]).unwrap();
        let depth = DepthFrame::new(1, 2, vec![0; 2], 0.001).unwrap();
        assert!(FrameSet::new(color, depth, 0).is_err());
    }

    #[test]
    fn test_depth_scale_validation() {
        assert!(DepthFrame::new(1, 1, vec![0], 0.0).is_err());
        assert!(DepthFrame::new(1, 1, vec![0], f64::NAN).is_err());
    }
}
