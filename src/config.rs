// SPDX-License-Identifier: GPL-3.0-only

//! User configuration
//!
//! Stored as JSON in `$XDG_CONFIG_HOME/depth-aim/config.json`. Missing keys
//! fall back to their defaults, so older files keep loading.

use crate::angle::CameraGeometry;
use crate::backends::SourceKind;
use crate::constants::{APP_FOLDER, geometry, sampling, stream};
use crate::errors::{AppError, AppResult, GeometryError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Horizontal field of view of the color sensor (degrees)
    pub hfov_deg: f64,
    /// Vertical field of view of the color sensor (degrees)
    pub vfov_deg: f64,
    /// Stream width in pixels
    pub width: u32,
    /// Stream height in pixels
    pub height: u32,
    /// Vertical distance between camera and laser emitter (depth units)
    pub height_offset: f64,
    /// Half-size of the averaged color window
    pub patch_radius: u32,
    /// Depth beyond this distance is flagged as background (meters)
    pub clipping_distance_m: f64,
    /// Meters per depth unit
    pub depth_scale: f64,
    /// Frame source to open
    pub source: SourceKind,
    /// Color image for the file source
    pub color_path: Option<PathBuf>,
    /// 16-bit depth map for the file source
    pub depth_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hfov_deg: geometry::DEFAULT_HFOV_DEG,
            vfov_deg: geometry::DEFAULT_VFOV_DEG,
            width: stream::DEFAULT_WIDTH,
            height: stream::DEFAULT_HEIGHT,
            height_offset: geometry::DEFAULT_HEIGHT_OFFSET_MM,
            patch_radius: sampling::DEFAULT_PATCH_RADIUS,
            clipping_distance_m: sampling::DEFAULT_CLIPPING_DISTANCE_M,
            depth_scale: stream::DEFAULT_DEPTH_SCALE,
            source: SourceKind::default(),
            color_path: None,
            depth_path: None,
        }
    }
}

impl Config {
    /// Default location of the config file
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join(APP_FOLDER)
            .join(CONFIG_FILE)
    }

    /// Load from the default location
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load from `path`, using defaults when the file does not exist
    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&text)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Write to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        info!(path = %path.display(), "Saved config");
        Ok(())
    }

    /// Camera geometry for the configured stream, centered on the image
    pub fn geometry(&self) -> Result<CameraGeometry, GeometryError> {
        CameraGeometry::for_resolution(
            self.width,
            self.height,
            self.hfov_deg,
            self.vfov_deg,
            self.height_offset,
        )
    }

    /// Clipping distance expressed in depth units
    pub fn clipping_distance_units(&self) -> f64 {
        self.clipping_distance_m / self.depth_scale
    }

    /// Check everything the frame loop relies on
    pub fn validate(&self) -> AppResult<()> {
        self.geometry()?;
        if !(self.depth_scale > 0.0 && self.depth_scale.is_finite()) {
            return Err(AppError::Config(format!(
                "depth_scale must be positive, got {}",
                self.depth_scale
            )));
        }
        if !(self.clipping_distance_m > 0.0 && self.clipping_distance_m.is_finite()) {
            return Err(AppError::Config(format!(
                "clipping_distance_m must be positive, got {}",
                self.clipping_distance_m
            )));
        }
        Ok(())
    }
}
