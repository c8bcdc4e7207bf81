// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use std::time::Duration;

/// Depth substituted for the "no reading" sentinel (millimeters)
///
/// Depth sensors report 0 where no valid measurement exists. Using a fixed
/// far distance keeps the angle math well-defined for those pixels.
pub const FALLBACK_DEPTH_MM: u16 = 6000;

/// Depth value reported by the sensor when there is no valid reading
pub const DEPTH_INVALID: u16 = 0;

/// Camera geometry defaults (RealSense D4xx color sensor at 1280x720)
pub mod geometry {
    /// Horizontal field of view in degrees
    pub const DEFAULT_HFOV_DEG: f64 = 69.0;

    /// Vertical field of view in degrees
    pub const DEFAULT_VFOV_DEG: f64 = 42.0;

    /// Vertical distance between the camera origin and the laser emitter (mm)
    pub const DEFAULT_HEIGHT_OFFSET_MM: f64 = 50.0;

    /// Upper bound (exclusive) for a field of view
    pub const MAX_FOV_DEG: f64 = 180.0;
}

/// Stream defaults
pub mod stream {
    use super::Duration;

    /// Color and depth stream width
    pub const DEFAULT_WIDTH: u32 = 1280;

    /// Color and depth stream height
    pub const DEFAULT_HEIGHT: u32 = 720;

    /// Meters per depth unit (Z16 millimeters)
    pub const DEFAULT_DEPTH_SCALE: f64 = 0.001;

    /// Frame interval for replayed and generated streams (~30fps)
    pub const FRAME_INTERVAL: Duration = Duration::from_millis(33);

    /// Frame channel capacity between the source thread and the viewer
    pub const FRAME_QUEUE_SIZE: usize = 4;
}

/// Click and patch sampling defaults
pub mod sampling {
    /// Half-size of the averaged color window in pixels
    pub const DEFAULT_PATCH_RADIUS: u32 = 5;

    /// Click position before the first click, as (row, column)
    pub const INITIAL_CLICK: (u32, u32) = (50, 50);

    /// Depth beyond this distance is flagged as background
    pub const DEFAULT_CLIPPING_DISTANCE_M: f64 = 10.0;
}

/// Click marker drawn over the image
pub mod marker {
    /// Circle radius in image pixels
    pub const RADIUS: u32 = 10;

    /// Ring thickness in image pixels
    pub const THICKNESS: u32 = 2;

    /// Marker color (RGB blue)
    pub const COLOR: [u8; 3] = [0, 0, 255];
}

/// Depth visualization range
pub mod depth_display {
    /// Nearest depth mapped to the colormap start (mm)
    pub const MIN_MM: u16 = 300;

    /// Farthest depth mapped to the colormap end (mm)
    pub const MAX_MM: u16 = 10_000;

    /// Quantization bands for the banded colormap
    pub const COLORMAP_BANDS: u32 = 32;
}

/// Timing constants
pub mod timing {
    use super::Duration;

    /// Frame counter modulo for periodic logging
    pub const FRAME_LOG_INTERVAL: u64 = 30;

    /// Input poll timeout in the terminal viewer
    pub const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(16);

    /// How long the probe loop waits for the first frame
    pub const FIRST_FRAME_TIMEOUT: Duration = Duration::from_secs(5);
}

/// Supported file formats for the file frame source
pub mod file_formats {
    /// Extensions accepted for color images
    pub const COLOR_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "webp"];

    /// Extensions accepted for depth maps (16-bit grayscale)
    pub const DEPTH_EXTENSIONS: &[&str] = &["png", "tif", "tiff"];

    /// Check if a file extension is a supported color image format
    pub fn is_color_extension(ext: &str) -> bool {
        COLOR_EXTENSIONS.contains(&ext.to_lowercase().as_str())
    }

    /// Check if a file extension can hold a 16-bit depth map
    pub fn is_depth_extension(ext: &str) -> bool {
        DEPTH_EXTENSIONS.contains(&ext.to_lowercase().as_str())
    }
}

/// Folder name used under the pictures and config directories
pub const APP_FOLDER: &str = "depth-aim";

/// Application information utilities
pub mod app_info {
    /// Get the application version from build-time environment
    pub fn version() -> &'static str {
        env!("GIT_VERSION")
    }
}
