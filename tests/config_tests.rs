// SPDX-License-Identifier: MPL-2.0

//! Integration tests for configuration module

use depth_aim::Config;
use depth_aim::backends::SourceKind;
use std::path::PathBuf;

fn temp_config_path(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("depth-aim-test-{}-{}", std::process::id(), name))
        .join("config.json")
}

#[test]
fn test_config_default() {
    let config = Config::default();

    assert_eq!(config.hfov_deg, 69.0);
    assert_eq!(config.vfov_deg, 42.0);
    assert_eq!((config.width, config.height), (1280, 720));
    assert_eq!(config.height_offset, 50.0);
    assert_eq!(config.patch_radius, 5);
    assert_eq!(config.source, SourceKind::Synthetic);
    assert!(config.validate().is_ok(), "Defaults should validate");
}

#[test]
fn test_default_geometry_is_centered() {
    let geometry = Config::default().geometry().unwrap();
    assert_eq!(geometry.center().row, 360);
    assert_eq!(geometry.center().col, 640);
}

#[test]
fn test_clipping_distance_in_depth_units() {
    let config = Config::default();
    // 10 m at 1 mm per unit
    assert!((config.clipping_distance_units() - 10_000.0).abs() < 1e-6);
}

#[test]
fn test_missing_file_gives_defaults() {
    let path = temp_config_path("missing");
    let _ = std::fs::remove_file(&path);
    let config = Config::load_from(&path).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_save_and_reload() {
    let path = temp_config_path("reload");
    let config = Config {
        hfov_deg: 87.0,
        vfov_deg: 58.0,
        source: SourceKind::Files,
        color_path: Some(PathBuf::from("/tmp/color.png")),
        depth_path: Some(PathBuf::from("/tmp/depth.png")),
        ..Config::default()
    };

    config.save_to(&path).unwrap();
    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded, config);

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn test_partial_file_keeps_defaults() {
    let path = temp_config_path("partial");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, r#"{ "height_offset": -30.0, "source": "files" }"#).unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.height_offset, -30.0);
    assert_eq!(config.source, SourceKind::Files);
    assert_eq!(config.hfov_deg, 69.0);

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn test_malformed_file_is_an_error() {
    let path = temp_config_path("malformed");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "{ not json").unwrap();

    assert!(Config::load_from(&path).is_err());

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn test_validate_rejects_bad_values() {
    let config = Config {
        vfov_deg: 0.0,
        ..Config::default()
    };
    assert!(config.validate().is_err());

    let config = Config {
        depth_scale: 0.0,
        ..Config::default()
    };
    assert!(config.validate().is_err());

    let config = Config {
        clipping_distance_m: -1.0,
        ..Config::default()
    };
    assert!(config.validate().is_err());
}
