// SPDX-License-Identifier: GPL-3.0-only

//! Error types for depth-aim

use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Invalid camera geometry
    Geometry(GeometryError),
    /// Configuration errors
    Config(String),
    /// Storage/filesystem errors
    Storage(String),
}

/// Camera geometry that cannot produce angles
///
/// The estimator divides by the image center coordinates, so a geometry is
/// only constructible when every one of these checks passes.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Image center row or column is zero
    ZeroCenter { row: u32, col: u32 },
    /// Field of view outside (0, 180) degrees
    InvalidFieldOfView { axis: &'static str, degrees: f64 },
    /// Height offset is NaN or infinite
    NonFiniteOffset(f64),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Geometry(e) => write!(f, "Geometry error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::ZeroCenter { row, col } => {
                write!(f, "image center ({}, {}) must be non-zero", row, col)
            }
            GeometryError::InvalidFieldOfView { axis, degrees } => {
                write!(f, "{} field of view {}° is outside (0, 180)", axis, degrees)
            }
            GeometryError::NonFiniteOffset(offset) => {
                write!(f, "height offset {} is not finite", offset)
            }
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for GeometryError {}

impl From<GeometryError> for AppError {
    fn from(err: GeometryError) -> Self {
        AppError::Geometry(err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Config(err.to_string())
    }
}
