// SPDX-License-Identifier: MPL-2.0

//! Integration tests for the acquire -> measure loop

use depth_aim::angle::{DepthSample, PixelCoordinate};
use depth_aim::backends::{FrameSource, SyntheticSource, open_source};
use depth_aim::click::{ClickState, PointerButton, PointerEvent};
use depth_aim::measure::{MeasureSettings, measure};
use depth_aim::Config;

fn settings_for(width: u32, height: u32) -> MeasureSettings {
    let config = Config {
        width,
        height,
        ..Config::default()
    };
    MeasureSettings {
        geometry: config.geometry().unwrap(),
        patch_radius: config.patch_radius,
        clipping_distance: config.clipping_distance_units(),
    }
}

#[test]
fn test_synthetic_source_frames_are_aligned() {
    let mut source = SyntheticSource::new(160, 120, 0.001).unwrap();
    assert_eq!(source.resolution(), (160, 120));

    let first = source.next_frameset().unwrap();
    let second = source.next_frameset().unwrap();
    assert_eq!((first.width(), first.height()), (160, 120));
    assert_eq!(first.color.width, first.depth.width);
    assert_eq!(first.color.height, first.depth.height);
    assert!(second.sequence > first.sequence);
}

#[test]
fn test_measurement_matches_direct_estimate() {
    let source = SyntheticSource::new(160, 120, 0.001).unwrap();
    let frameset = source.render(3).unwrap();
    let settings = settings_for(160, 120);
    let pixel = PixelCoordinate::new(90, 40);

    let m = measure(&frameset, pixel, &settings);
    let depth = frameset.depth.sample(pixel);
    assert_eq!(m.depth_raw, depth.0);
    assert_eq!(m.angles, settings.geometry.estimate(pixel, depth));
    assert_eq!(m.color.center, frameset.color.pixel(pixel));
}

#[test]
fn test_invalid_band_falls_back() {
    let source = SyntheticSource::new(200, 100, 0.001).unwrap();
    let frameset = source.render(0).unwrap();
    let settings = settings_for(200, 100);

    // Rightmost column sits in the no-depth band
    let pixel = PixelCoordinate::new(50, 199);
    let m = measure(&frameset, pixel, &settings);
    assert!(!m.depth_valid());
    assert_eq!(m.depth_effective, 6000);
    assert_eq!(
        m.angles,
        settings.geometry.estimate(pixel, DepthSample(6000))
    );
}

#[test]
fn test_click_drives_measurement() {
    let source = SyntheticSource::new(160, 120, 0.001).unwrap();
    let frameset = source.render(1).unwrap();
    let settings = settings_for(160, 120);
    let mut click = ClickState::new(160, 120);

    // Initial click before any input
    let m = measure(&frameset, click.position(), &settings);
    assert_eq!(m.pixel, PixelCoordinate::new(50, 50));

    // Pointer (x, y) becomes (row = y, col = x)
    assert!(click.handle(PointerEvent::Down {
        x: 30,
        y: 100,
        button: PointerButton::Primary,
    }));
    let m = measure(&frameset, click.position(), &settings);
    assert_eq!(m.pixel, PixelCoordinate::new(100, 30));
}

#[test]
fn test_open_source_files_requires_paths() {
    let config = Config {
        source: depth_aim::backends::SourceKind::Files,
        ..Config::default()
    };
    assert!(open_source(&config).is_err());
}

#[test]
fn test_open_source_synthetic_uses_config_resolution() {
    let config = Config {
        width: 320,
        height: 240,
        ..Config::default()
    };
    let source = open_source(&config).unwrap();
    assert_eq!(source.resolution(), (320, 240));
}
