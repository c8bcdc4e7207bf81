// SPDX-License-Identifier: GPL-3.0-only

//! Pointing angle estimation
//!
//! Maps a clicked pixel and the depth reading at that pixel to the angles a
//! laser emitter mounted next to the camera has to take to hit the same
//! scene point.
//!
//! The horizontal angle is a linear interpolation of the field of view
//! across the image. The vertical angle is interpolated the same way (up is
//! positive) and then corrected for the fixed vertical distance between the
//! camera origin and the emitter by solving the right triangle spanned by
//! the depth and that offset.

use crate::constants::{DEPTH_INVALID, FALLBACK_DEPTH_MM, geometry::MAX_FOV_DEG};
use crate::errors::GeometryError;
use serde::{Deserialize, Serialize};

/// Pixel position as (row, column), row 0 at the top
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PixelCoordinate {
    pub row: u32,
    pub col: u32,
}

impl PixelCoordinate {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Clamp to the last valid pixel of a `width` x `height` image
    pub fn clamped(self, width: u32, height: u32) -> Self {
        Self {
            row: self.row.min(height.saturating_sub(1)),
            col: self.col.min(width.saturating_sub(1)),
        }
    }
}

impl std::fmt::Display for PixelCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Raw depth reading in sensor units (millimeters), 0 meaning "no reading"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DepthSample(pub u16);

impl DepthSample {
    pub const INVALID: DepthSample = DepthSample(DEPTH_INVALID);

    pub fn is_valid(&self) -> bool {
        *self != Self::INVALID
    }

    /// Depth to compute with: the reading, or the fallback for invalid pixels
    pub fn effective(&self) -> u16 {
        if self.is_valid() {
            self.0
        } else {
            FALLBACK_DEPTH_MM
        }
    }
}

impl From<u16> for DepthSample {
    fn from(value: u16) -> Self {
        DepthSample(value)
    }
}

/// Fixed camera geometry
///
/// Construction validates that the center is non-zero on both axes and the
/// fields of view lie in (0, 180), so angle computation cannot divide by zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraGeometry {
    hfov_deg: f64,
    vfov_deg: f64,
    center: PixelCoordinate,
    height_offset: f64,
}

impl CameraGeometry {
    pub fn new(
        hfov_deg: f64,
        vfov_deg: f64,
        center: PixelCoordinate,
        height_offset: f64,
    ) -> Result<Self, GeometryError> {
        if center.row == 0 || center.col == 0 {
            return Err(GeometryError::ZeroCenter {
                row: center.row,
                col: center.col,
            });
        }
        for (axis, degrees) in [("horizontal", hfov_deg), ("vertical", vfov_deg)] {
            if !(degrees > 0.0 && degrees < MAX_FOV_DEG) {
                return Err(GeometryError::InvalidFieldOfView { axis, degrees });
            }
        }
        if !height_offset.is_finite() {
            return Err(GeometryError::NonFiniteOffset(height_offset));
        }

        Ok(Self {
            hfov_deg,
            vfov_deg,
            center,
            height_offset,
        })
    }

    /// Geometry for a `width` x `height` image centered at (height/2, width/2)
    pub fn for_resolution(
        width: u32,
        height: u32,
        hfov_deg: f64,
        vfov_deg: f64,
        height_offset: f64,
    ) -> Result<Self, GeometryError> {
        Self::new(
            hfov_deg,
            vfov_deg,
            PixelCoordinate::new(height / 2, width / 2),
            height_offset,
        )
    }

    pub fn hfov_deg(&self) -> f64 {
        self.hfov_deg
    }

    pub fn vfov_deg(&self) -> f64 {
        self.vfov_deg
    }

    pub fn center(&self) -> PixelCoordinate {
        self.center
    }

    /// Vertical distance between camera and emitter, in depth units
    pub fn height_offset(&self) -> f64 {
        self.height_offset
    }

    /// Estimate with this geometry's own height offset
    pub fn estimate(&self, pixel: PixelCoordinate, depth: DepthSample) -> AngleResult {
        estimate(pixel, depth, self, self.height_offset)
    }
}

/// Horizontal and corrected vertical pointing angles, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AngleResult {
    /// Offset from the image center, positive to the right
    pub horizontal_deg: f64,
    /// Emitter elevation after the height-offset correction, positive up
    pub laser_deg: f64,
}

impl std::fmt::Display for AngleResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "h {:+.2}° laser {:+.2}°",
            self.horizontal_deg, self.laser_deg
        )
    }
}

/// Angle from the optical axis to `pixel` along the image columns
pub fn horizontal_offset_deg(pixel: PixelCoordinate, geometry: &CameraGeometry) -> f64 {
    let center = geometry.center.col as f64;
    (pixel.col as f64 - center) / center * (geometry.hfov_deg / 2.0)
}

/// Angle from the optical axis to `pixel` along the image rows, up positive
pub fn vertical_offset_deg(pixel: PixelCoordinate, geometry: &CameraGeometry) -> f64 {
    let center = geometry.center.row as f64;
    (pixel.row as f64 - center) / center * -(geometry.vfov_deg / 2.0)
}

/// Compute the pointing angles for `pixel` at `depth`
///
/// `height_offset` is the emitter's vertical distance from the camera origin
/// in the same unit as `depth`. Invalid depth (0) is replaced by
/// [`FALLBACK_DEPTH_MM`].
pub fn estimate(
    pixel: PixelCoordinate,
    depth: DepthSample,
    geometry: &CameraGeometry,
    height_offset: f64,
) -> AngleResult {
    let depth = depth.effective() as f64;
    let horizontal_deg = horizontal_offset_deg(pixel, geometry);
    let vertical_rad = vertical_offset_deg(pixel, geometry).to_radians();

    let (num, denom) = if vertical_rad < 0.0 {
        (
            height_offset - (-vertical_rad).sin() * depth,
            (-vertical_rad).cos() * depth,
        )
    } else {
        (
            vertical_rad.sin() * depth + height_offset,
            vertical_rad.cos() * depth,
        )
    };

    AngleResult {
        horizontal_deg,
        laser_deg: num.atan2(denom).to_degrees(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hd_geometry() -> CameraGeometry {
        CameraGeometry::for_resolution(1280, 720, 69.0, 42.0, 50.0).unwrap()
    }

    #[test]
    fn test_center_from_resolution() {
        let geometry = hd_geometry();
        assert_eq!(geometry.center(), PixelCoordinate::new(360, 640));
    }

    #[test]
    fn test_rejects_zero_center() {
        let err = CameraGeometry::new(69.0, 42.0, PixelCoordinate::new(0, 640), 50.0);
        assert_eq!(err, Err(GeometryError::ZeroCenter { row: 0, col: 640 }));

        // A 1-pixel-wide image has center column 0
        assert!(CameraGeometry::for_resolution(1, 720, 69.0, 42.0, 50.0).is_err());
    }

    #[test]
    fn test_rejects_bad_fov() {
        let center = PixelCoordinate::new(360, 640);
        assert!(CameraGeometry::new(0.0, 42.0, center, 50.0).is_err());
        assert!(CameraGeometry::new(69.0, 180.0, center, 50.0).is_err());
        assert!(CameraGeometry::new(f64::NAN, 42.0, center, 50.0).is_err());
        assert!(CameraGeometry::new(69.0, 42.0, center, f64::INFINITY).is_err());
    }

    #[test]
    fn test_effective_depth() {
        assert_eq!(DepthSample(0).effective(), FALLBACK_DEPTH_MM);
        assert_eq!(DepthSample(1234).effective(), 1234);
        assert!(!DepthSample::INVALID.is_valid());
        assert_eq!(DepthSample::INVALID, DepthSample(DEPTH_INVALID));
        assert!(DepthSample(1).is_valid());
    }

    #[test]
    fn test_downward_branch_is_below_offset_angle() {
        let geometry = hd_geometry();
        // Bottom row points down, so the emitter has to tilt below horizontal
        let result = geometry.estimate(PixelCoordinate::new(719, 640), DepthSample(2000));
        assert!(result.laser_deg < 0.0);
    }

    #[test]
    fn test_downward_branch_value() {
        // Row 540 is 10.5° below the axis; the emitter sits 50 above the camera
        let result = hd_geometry().estimate(PixelCoordinate::new(540, 640), DepthSample(2000));
        assert!((result.laser_deg - -9.085432651683275).abs() < 1e-9);
    }

    #[test]
    fn test_upward_branch_value() {
        // Row 0 is 21° above the axis
        let result = hd_geometry().estimate(PixelCoordinate::new(0, 640), DepthSample(2000));
        assert!((result.laser_deg - 22.325144775477238).abs() < 1e-9);
    }

    #[test]
    fn test_clamped_pixel() {
        let pixel = PixelCoordinate::new(900, 2000).clamped(1280, 720);
        assert_eq!(pixel, PixelCoordinate::new(719, 1279));
    }
}
