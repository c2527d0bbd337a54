//! Alluvia CLI library
//!
//! This module contains the core CLI logic for the Alluvia chart tool.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::info;

use alluvia::{
    AlluviaError, ChartBuilder,
    config::{AppConfig, ColorMode},
    identifier::Id,
};

/// Run the Alluvia CLI application
///
/// This function reads the JSON chart description, lays it out and writes
/// the resulting SVG to the output file.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `AlluviaError` for:
/// - File I/O errors
/// - Configuration loading errors, including invalid overrides
/// - Parsing and validation errors
/// - Layout errors
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), AlluviaError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing chart"
    );

    let mut app_config = config::load_config(args.config.as_ref())?;
    apply_overrides(&mut app_config, args)?;

    let source = fs::read_to_string(&args.input)?;

    let builder = ChartBuilder::new(app_config);
    let data = builder.parse(&source)?;
    let chart = builder.layout(&data)?;
    let svg = builder.render_svg(&chart)?;

    fs::write(&args.output, svg)?;

    info!(output_file = args.output; "SVG exported successfully");

    Ok(())
}

/// Command-line options win over the configuration file.
fn apply_overrides(config: &mut AppConfig, args: &Args) -> Result<(), AlluviaError> {
    if let Some(anchor) = &args.anchor {
        info!(anchor; "Overriding anchor category");
        config.layout_mut().set_anchor(Some(Id::new(anchor)));
    }
    if let Some(mode) = &args.color_mode {
        let mode: ColorMode = mode.parse()?;
        info!(mode:%; "Overriding color mode");
        config.color_mut().set_mode(mode);
    }
    Ok(())
}
