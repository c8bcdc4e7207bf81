// SPDX-License-Identifier: MPL-2.0

//! Integration tests for angle estimation

use depth_aim::angle::{
    CameraGeometry, DepthSample, PixelCoordinate, estimate, horizontal_offset_deg,
    vertical_offset_deg,
};

const EPS: f64 = 1e-9;

fn hd() -> CameraGeometry {
    CameraGeometry::for_resolution(1280, 720, 69.0, 42.0, 50.0).unwrap()
}

#[test]
fn test_center_pixel_only_sees_height_offset() {
    let geometry = hd();
    let result = geometry.estimate(PixelCoordinate::new(360, 640), DepthSample(2000));

    assert!(result.horizontal_deg.abs() < EPS);
    // atan2(50, 2000)
    let expected = 50.0f64.atan2(2000.0).to_degrees();
    assert!((result.laser_deg - expected).abs() < EPS);
    assert!((result.laser_deg - 1.432).abs() < 1e-3);
}

#[test]
fn test_zero_depth_matches_fallback() {
    let geometry = hd();
    for pixel in [
        PixelCoordinate::new(0, 0),
        PixelCoordinate::new(100, 900),
        PixelCoordinate::new(719, 1279),
    ] {
        let missing = geometry.estimate(pixel, DepthSample(0));
        let fallback = geometry.estimate(pixel, DepthSample(6000));
        assert_eq!(missing, fallback, "pixel {}", pixel);
    }
}

#[test]
fn test_top_edge_vertical_offset() {
    let geometry = hd();
    let v = vertical_offset_deg(PixelCoordinate::new(0, 640), &geometry);
    assert!((v - 21.0).abs() < EPS);

    let v = vertical_offset_deg(PixelCoordinate::new(720, 640), &geometry);
    assert!((v + 21.0).abs() < EPS);
}

#[test]
fn test_laser_below_axis_with_height_offset() {
    let geometry = hd();
    let v = vertical_offset_deg(PixelCoordinate::new(540, 640), &geometry);
    assert!((v + 10.5).abs() < EPS);

    let result = geometry.estimate(PixelCoordinate::new(540, 640), DepthSample(2000));
    let down = 10.5f64.to_radians();
    let expected = (50.0 - down.sin() * 2000.0)
        .atan2(down.cos() * 2000.0)
        .to_degrees();
    assert!((result.laser_deg - expected).abs() < EPS);
    assert!((result.laser_deg + 9.0854).abs() < 1e-4);
}

#[test]
fn test_laser_above_axis_with_height_offset() {
    let geometry = hd();
    let result = geometry.estimate(PixelCoordinate::new(0, 640), DepthSample(2000));
    let up = 21.0f64.to_radians();
    let expected = (up.sin() * 2000.0 + 50.0)
        .atan2(up.cos() * 2000.0)
        .to_degrees();
    assert!((result.laser_deg - expected).abs() < EPS);
    assert!((result.laser_deg - 22.3251).abs() < 1e-4);
}

#[test]
fn test_height_offset_raises_laser_on_both_sides() {
    let geometry = hd();
    for row in [0u32, 180, 540, 719] {
        let pixel = PixelCoordinate::new(row, 640);
        let raised = estimate(pixel, DepthSample(2000), &geometry, 50.0).laser_deg;
        let level = estimate(pixel, DepthSample(2000), &geometry, 0.0).laser_deg;
        let lowered = estimate(pixel, DepthSample(2000), &geometry, -50.0).laser_deg;
        assert!(raised > level && level > lowered, "row {}", row);
    }
}

#[test]
fn test_vertical_decreases_with_row() {
    let geometry = hd();
    let mut prev = f64::INFINITY;
    for row in 0..720 {
        let v = vertical_offset_deg(PixelCoordinate::new(row, 640), &geometry);
        assert!(v < prev, "row {} did not decrease", row);
        prev = v;
    }
}

#[test]
fn test_horizontal_edges() {
    let geometry = hd();
    let left = horizontal_offset_deg(PixelCoordinate::new(360, 0), &geometry);
    let right = horizontal_offset_deg(PixelCoordinate::new(360, 1280), &geometry);
    assert!((left + 34.5).abs() < EPS);
    assert!((right - 34.5).abs() < EPS);
}

#[test]
fn test_horizontal_is_monotonic_in_column() {
    let geometry = hd();
    let mut prev = f64::NEG_INFINITY;
    for col in (0..1280).step_by(37) {
        let h = geometry
            .estimate(PixelCoordinate::new(200, col), DepthSample(1500))
            .horizontal_deg;
        assert!(h > prev, "column {} did not increase", col);
        prev = h;
    }
}

#[test]
fn test_horizontal_is_symmetric_about_center() {
    let geometry = hd();
    for d in [1u32, 50, 320, 640] {
        let left = horizontal_offset_deg(PixelCoordinate::new(360, 640 - d), &geometry);
        let right = horizontal_offset_deg(PixelCoordinate::new(360, 640 + d), &geometry);
        assert!((left + right).abs() < EPS);
    }
}

#[test]
fn test_laser_decreases_down_the_image() {
    let geometry = hd();
    let mut prev = f64::INFINITY;
    for row in (0..720).step_by(45) {
        let laser = geometry
            .estimate(PixelCoordinate::new(row, 640), DepthSample(3000))
            .laser_deg;
        assert!(laser < prev, "row {} did not decrease", row);
        prev = laser;
    }
}

#[test]
fn test_no_offset_means_laser_equals_vertical() {
    let geometry = CameraGeometry::for_resolution(640, 480, 60.0, 40.0, 0.0).unwrap();
    for row in [0u32, 100, 240, 400, 479] {
        let pixel = PixelCoordinate::new(row, 320);
        let v = vertical_offset_deg(pixel, &geometry);
        let result = geometry.estimate(pixel, DepthSample(2500));
        assert!((result.laser_deg - v).abs() < 1e-9, "row {}", row);
    }
}

#[test]
fn test_offset_effect_shrinks_with_depth() {
    let geometry = hd();
    let pixel = PixelCoordinate::new(360, 640);
    let near = geometry.estimate(pixel, DepthSample(500)).laser_deg;
    let far = geometry.estimate(pixel, DepthSample(8000)).laser_deg;
    assert!(near > far);
    assert!(far > 0.0);
}

#[test]
fn test_free_function_uses_given_offset() {
    let geometry = hd();
    let pixel = PixelCoordinate::new(100, 200);
    let depth = DepthSample(1800);
    let with_geometry_offset = geometry.estimate(pixel, depth);
    let explicit = estimate(pixel, depth, &geometry, geometry.height_offset());
    assert_eq!(with_geometry_offset, explicit);

    let other = estimate(pixel, depth, &geometry, -50.0);
    assert_eq!(other.horizontal_deg, explicit.horizontal_deg);
    assert!(other.laser_deg < explicit.laser_deg);
}

#[test]
fn test_invalid_geometry_rejected() {
    assert!(CameraGeometry::new(0.0, 42.0, PixelCoordinate::new(360, 640), 50.0).is_err());
    assert!(CameraGeometry::new(69.0, 180.0, PixelCoordinate::new(360, 640), 50.0).is_err());
    assert!(CameraGeometry::new(69.0, 42.0, PixelCoordinate::new(360, 640), f64::NAN).is_err());
    assert!(CameraGeometry::for_resolution(1280, 1, 69.0, 42.0, 50.0).is_err());
}
