// SPDX-License-Identifier: GPL-3.0-only

use clap::{Args, Parser, Subcommand};
use depth_aim::Config;
use depth_aim::backends::SourceKind;
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "depth-aim")]
#[command(about = "Click a pixel in a depth camera image, get its color, depth and laser angle")]
#[command(version = env!("GIT_VERSION"))]
#[command(subcommand_required = false)]
struct Cli {
    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Settings that override the config file for this run
#[derive(Args)]
struct Overrides {
    /// Config file (default: ~/.config/depth-aim/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Frame source
    #[arg(long, global = true, value_enum)]
    source: Option<SourceKind>,

    /// Color image for the file source
    #[arg(long, global = true)]
    color: Option<PathBuf>,

    /// 16-bit depth map for the file source
    #[arg(long, global = true)]
    depth: Option<PathBuf>,

    /// Horizontal field of view in degrees
    #[arg(long, global = true)]
    hfov: Option<f64>,

    /// Vertical field of view in degrees
    #[arg(long, global = true)]
    vfov: Option<f64>,

    /// Vertical camera-to-emitter distance in depth units (mm)
    #[arg(long, global = true, allow_negative_numbers = true)]
    height_offset: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive terminal viewer (default)
    Terminal,

    /// Compute the angles for a single pixel and depth
    Estimate {
        /// Pixel row (0 = top)
        #[arg(long)]
        row: u32,

        /// Pixel column (0 = left)
        #[arg(long)]
        col: u32,

        /// Depth at the pixel in sensor units, 0 for "no reading"
        #[arg(long, default_value = "0")]
        depth_mm: u16,

        /// Image width (default: from config)
        #[arg(long)]
        width: Option<u32>,

        /// Image height (default: from config)
        #[arg(long)]
        height: Option<u32>,
    },

    /// Print one measurement per frame at a fixed pixel
    Probe {
        /// Pixel row (0 = top)
        #[arg(long, default_value = "50")]
        row: u32,

        /// Pixel column (0 = left)
        #[arg(long, default_value = "50")]
        col: u32,

        /// Stop after this many frames (default: until Ctrl+C)
        #[arg(short, long)]
        frames: Option<u64>,
    },

    /// Show the effective configuration
    Config {
        /// Write the effective configuration back to the config file
        #[arg(long)]
        save: bool,
    },
}

impl Overrides {
    fn apply(&self, config: &mut Config) {
        if let Some(source) = self.source {
            config.source = source;
        }
        if let Some(color) = &self.color {
            config.color_path = Some(color.clone());
        }
        if let Some(depth) = &self.depth {
            config.depth_path = Some(depth.clone());
        }
        if let Some(hfov) = self.hfov {
            config.hfov_deg = hfov;
        }
        if let Some(vfov) = self.vfov {
            config.vfov_deg = vfov;
        }
        if let Some(offset) = self.height_offset {
            config.height_offset = offset;
        }
        // Giving file paths implies the file source
        if self.source.is_none() && self.color.is_some() && self.depth.is_some() {
            config.source = SourceKind::Files;
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=depth_aim=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    let (config_path, mut config) = match &cli.overrides.config {
        Some(path) => (path.clone(), Config::load_from(path)?),
        None => (Config::default_path(), Config::load()?),
    };
    cli.overrides.apply(&mut config);

    match cli.command {
        None | Some(Commands::Terminal) => depth_aim::terminal::run(&config),
        Some(Commands::Estimate {
            row,
            col,
            depth_mm,
            width,
            height,
        }) => {
            if let Some(width) = width {
                config.width = width;
            }
            if let Some(height) = height {
                config.height = height;
            }
            cli::estimate_angle(&config, row, col, depth_mm)
        }
        Some(Commands::Probe { row, col, frames }) => cli::probe(&config, row, col, frames),
        Some(Commands::Config { save }) => cli::show_config(&config, &config_path, save),
    }
}
