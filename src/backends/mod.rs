// SPDX-License-Identifier: GPL-3.0-only

//! Frame sources
//!
//! The measurement loop consumes aligned color + depth frame pairs. Camera
//! drivers and depth-to-color registration live outside this crate; a
//! [`FrameSource`] is whatever hands over the already aligned pairs.
//!
//! ```text
//! ┌──────────────────────┐
//! │ terminal / probe loop│
//! └──────────┬───────────┘
//!            │ next_frameset()
//!            ▼
//! ┌──────────────────────┐
//! │  FrameSource trait   │
//! └──────────┬───────────┘
//!       ┌────┴─────┐
//!       ▼          ▼
//!  ┌─────────┐ ┌──────────┐
//!  │  Files  │ │Synthetic │
//!  └─────────┘ └──────────┘
//! ```

pub mod file_source;
pub mod format_converters;
pub mod synthetic;
pub mod types;

pub use file_source::FileSource;
pub use synthetic::SyntheticSource;
pub use types::*;

use crate::config::Config;
use tracing::info;

/// Producer of aligned color + depth frame pairs
///
/// Implementations block until the next frameset is ready, so the caller can
/// run a plain acquire -> compute -> display loop.
pub trait FrameSource: Send {
    /// Human readable source name for status lines and logs
    fn name(&self) -> &str;

    /// Resolution of both streams as (width, height)
    fn resolution(&self) -> (u32, u32);

    /// Wait for and return the next aligned frameset
    fn next_frameset(&mut self) -> BackendResult<FrameSet>;
}

/// Open the frame source selected in `config`
pub fn open_source(config: &Config) -> BackendResult<Box<dyn FrameSource>> {
    let source: Box<dyn FrameSource> = match config.source {
        SourceKind::Synthetic => Box::new(SyntheticSource::new(
            config.width,
            config.height,
            config.depth_scale,
        )?),
        SourceKind::Files => {
            let color = config.color_path.as_deref().ok_or_else(|| {
                BackendError::NotAvailable("file source needs a color image path".into())
            })?;
            let depth = config.depth_path.as_deref().ok_or_else(|| {
                BackendError::NotAvailable("file source needs a depth map path".into())
            })?;
            Box::new(FileSource::open(color, depth, config.depth_scale)?)
        }
    };

    let (width, height) = source.resolution();
    info!(source = %source.name(), width, height, "Frame source opened");
    Ok(source)
}
