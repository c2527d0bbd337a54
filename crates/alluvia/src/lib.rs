//! Alluvia - layout and rendering of alluvial (flow) diagrams.
//!
//! Lines pass through an ordered sequence of categories and, in each
//! category, through one node (and optionally one subnode of that node).
//! Alluvia sizes every node by the number of lines it carries, gives every
//! line a slot in every category while keeping its rank stable from one
//! category to the next, and joins the slots with smooth connectors.
//!
//! # Example
//!
//! ```
//! use alluvia::{ChartBuilder, config::AppConfig};
//!
//! let source = r#"{
//!     "categories": ["Feedstock", "Product"],
//!     "nodes": {
//!         "Feedstock": { "corn": {}, "sugarcane": {} },
//!         "Product": { "PLA": {}, "PE": {} }
//!     },
//!     "lines": {
//!         "1": { "Feedstock": "corn", "Product": "PLA" },
//!         "2": { "Feedstock": "sugarcane", "Product": "PE" },
//!         "3": { "Feedstock": "corn", "Product": "PE" }
//!     }
//! }"#;
//!
//! let builder = ChartBuilder::new(AppConfig::default());
//! let data = builder.parse(source).unwrap();
//! let chart = builder.layout(&data).unwrap();
//! let svg = builder.render_svg(&chart).unwrap();
//! assert!(svg.contains("<polyline"));
//! ```

pub mod chart;
pub mod config;
pub mod data;
pub mod export;
pub mod layout;
pub mod palette;
pub mod validate;

mod error;

pub use alluvia_core::{color, geometry, identifier, path};

pub use chart::Chart;
pub use error::{AlluviaError, ValidationError};

use log::{debug, info, trace};

use config::AppConfig;
use data::ChartData;
use export::{Exporter, svg::SvgBuilder};
use layout::Engine;

/// Builder for laying out and rendering alluvial charts.
///
/// # Examples
///
/// ```rust,no_run
/// use alluvia::{ChartBuilder, config::AppConfig};
///
/// // With custom config
/// let builder = ChartBuilder::new(AppConfig::default());
///
/// // Or use default config
/// let builder = ChartBuilder::default();
/// ```
#[derive(Default)]
pub struct ChartBuilder {
    config: AppConfig,
}

impl ChartBuilder {
    /// Create a new chart builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse a JSON chart description.
    ///
    /// # Errors
    ///
    /// Returns [`AlluviaError::Parse`] if the JSON is malformed or does not
    /// describe a chart.
    pub fn parse(&self, source: &str) -> Result<ChartData, AlluviaError> {
        info!("Parsing chart data");
        let data = ChartData::from_json(source)?;
        debug!(
            categories = data.categories().len(),
            lines = data.lines().len();
            "Chart data parsed successfully"
        );
        Ok(data)
    }

    /// Validate `data`, lay it out and assign line colors.
    ///
    /// # Errors
    ///
    /// Returns [`AlluviaError::Config`] for unusable layout settings,
    /// [`AlluviaError::Validation`] for charts that cannot be laid out and
    /// [`AlluviaError::Reference`] if a line color cannot be resolved.
    pub fn layout<'a>(&self, data: &'a ChartData) -> Result<Chart<'a>, AlluviaError> {
        self.config.layout().validate()?;
        let anchor = validate::validate(data, self.config.layout())?;

        let layout = Engine::new(self.config.layout()).calculate(data, anchor)?;
        trace!(layout:?; "Calculated layout");

        let colors = palette::assign_colors(self.config.color(), data, &layout)?;
        info!(
            anchor:% = anchor,
            color_mode:% = self.config.color().mode();
            "Chart laid out"
        );

        Ok(Chart::new(data, layout, colors))
    }

    /// Render a laid-out chart to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns [`AlluviaError::Export`] if the style is unusable or rendering
    /// fails.
    pub fn render_svg(&self, chart: &Chart<'_>) -> Result<String, AlluviaError> {
        let mut svg_exporter = SvgBuilder::new(Vec::new())
            .with_style(self.config.style())
            .build()?;
        svg_exporter.export_chart(chart)?;

        let svg_string = String::from_utf8(svg_exporter.into_inner())
            .map_err(|err| export::Error::Render(err.to_string()))?;

        info!(bytes = svg_string.len(); "SVG rendered successfully");
        Ok(svg_string)
    }
}
