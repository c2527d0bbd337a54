//! Export of laid-out charts.
//!
//! This module provides the [`Exporter`] trait that defines the interface for
//! converting a [`Chart`] into an output format. It is the final stage of the
//! Alluvia pipeline.
//!
//! # Pipeline Position
//!
//! ```text
//! ChartData
//!     ↓ validate
//! ChartData + anchor
//!     ↓ layout + palette
//! Chart
//!     ↓ export (this module)
//! Output document
//! ```
//!
//! # Available Backends
//!
//! - [`svg`] - SVG output via [`svg::SvgBuilder`] and [`svg::Svg`]
//!
//! # Error Handling
//!
//! Export operations return [`Error`], covering rendering failures and I/O
//! errors. [`Error`] converts into [`AlluviaError::Export`] at the crate
//! boundary.
//!
//! [`AlluviaError::Export`]: crate::AlluviaError::Export

/// SVG export backend.
pub mod svg;

use crate::chart::Chart;

/// Abstraction for chart export backends.
pub trait Exporter {
    /// Exports a laid-out chart to the backend's output format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the chart cannot be converted to the
    /// target format, or [`Error::Io`] if writing the output fails.
    fn export_chart(&mut self, chart: &Chart<'_>) -> Result<(), Error>;
}

/// Errors that can occur during chart export.
#[derive(Debug)]
pub enum Error {
    /// A rendering or conversion failure described by `message`.
    Render(String),
    /// An I/O error encountered while writing output.
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}
