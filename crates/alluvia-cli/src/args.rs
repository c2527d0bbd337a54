//! Command-line argument definitions for the Alluvia CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, per-run overrides of the configuration and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Alluvia chart tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input JSON chart description
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output SVG file
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Anchor category, overriding the configuration file
    #[arg(long)]
    pub anchor: Option<String>,

    /// Line color mode (random, category_colormap, anchor_node)
    #[arg(long)]
    pub color_mode: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
