//! Configuration types for Alluvia chart layout and rendering.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from
//! external sources (the CLI reads TOML). Every field has a default, so an
//! empty document is a valid configuration.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`LayoutConfig`] - Geometry of the layout: anchor category, spacing and line extents.
//! - [`ColorConfig`] - How line colors are chosen ([`ColorMode`]).
//! - [`StyleConfig`] - Rendering-only options such as figure size and label placement.
//!
//! # Example
//!
//! ```
//! # use alluvia::config::{AppConfig, ColorMode};
//! let config = AppConfig::default();
//! assert_eq!(config.color().mode(), ColorMode::Random);
//! assert!(config.layout().validate().is_ok());
//! ```

use std::{fmt, str::FromStr};

use serde::Deserialize;

use alluvia_core::{color::Color, identifier::Id, path::DEFAULT_SAMPLES_PER_UNIT};

use crate::error::AlluviaError;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Line color configuration section.
    #[serde(default)]
    color: ColorConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(layout: LayoutConfig, color: ColorConfig, style: StyleConfig) -> Self {
        Self {
            layout,
            color,
            style,
        }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the line color configuration.
    pub fn color(&self) -> &ColorConfig {
        &self.color
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Returns a mutable reference to the layout configuration.
    pub fn layout_mut(&mut self) -> &mut LayoutConfig {
        &mut self.layout
    }

    /// Returns a mutable reference to the line color configuration.
    pub fn color_mut(&mut self) -> &mut ColorConfig {
        &mut self.color
    }
}

/// Geometry settings of the layout engine.
///
/// All lengths are fractions of the unit square.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Category whose line order seeds the sweep; the first category when unset.
    anchor: Option<Id>,

    /// Share of the horizontal axis covered by node columns, the rest is for connectors.
    nodes_x_share: f32,

    /// Height every node receives regardless of its flow.
    node_min_height: f32,

    /// Vertical gap between consecutive nodes of a category.
    node_gap: f32,

    /// How far straight line runs overhang inner node columns, split over both sides.
    line_overhang: f32,

    /// Let lines run into the outermost nodes up to their midpoint.
    extend_lines_into_outer_nodes: bool,

    /// Add a labelled line-id column left of the first category.
    show_line_ids: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            anchor: None,
            nodes_x_share: 0.3,
            node_min_height: 0.01,
            node_gap: 0.05,
            line_overhang: 0.05,
            extend_lines_into_outer_nodes: false,
            show_line_ids: false,
        }
    }
}

impl LayoutConfig {
    pub fn anchor(&self) -> Option<Id> {
        self.anchor
    }

    pub fn nodes_x_share(&self) -> f32 {
        self.nodes_x_share
    }

    pub fn node_min_height(&self) -> f32 {
        self.node_min_height
    }

    pub fn node_gap(&self) -> f32 {
        self.node_gap
    }

    pub fn line_overhang(&self) -> f32 {
        self.line_overhang
    }

    pub fn extend_lines_into_outer_nodes(&self) -> bool {
        self.extend_lines_into_outer_nodes
    }

    pub fn show_line_ids(&self) -> bool {
        self.show_line_ids
    }

    pub fn with_anchor(mut self, anchor: impl Into<Id>) -> Self {
        self.anchor = Some(anchor.into());
        self
    }

    pub fn set_anchor(&mut self, anchor: Option<Id>) -> &mut Self {
        self.anchor = anchor;
        self
    }

    pub fn with_nodes_x_share(mut self, share: f32) -> Self {
        self.nodes_x_share = share;
        self
    }

    pub fn with_node_min_height(mut self, height: f32) -> Self {
        self.node_min_height = height;
        self
    }

    pub fn with_node_gap(mut self, gap: f32) -> Self {
        self.node_gap = gap;
        self
    }

    pub fn with_line_overhang(mut self, overhang: f32) -> Self {
        self.line_overhang = overhang;
        self
    }

    pub fn with_extend_lines_into_outer_nodes(mut self, extend: bool) -> Self {
        self.extend_lines_into_outer_nodes = extend;
        self
    }

    pub fn with_show_line_ids(mut self, show: bool) -> Self {
        self.show_line_ids = show;
        self
    }

    /// Checks that the numeric settings describe a drawable layout.
    ///
    /// # Errors
    ///
    /// Returns [`AlluviaError::Config`] if `nodes_x_share` is outside `(0, 1)`
    /// or any height, gap or overhang is negative or not finite.
    pub fn validate(&self) -> Result<(), AlluviaError> {
        if !(self.nodes_x_share > 0.0 && self.nodes_x_share < 1.0) {
            return Err(AlluviaError::Config(format!(
                "nodes_x_share must be between 0 and 1, got {}",
                self.nodes_x_share
            )));
        }
        for (name, value) in [
            ("node_min_height", self.node_min_height),
            ("node_gap", self.node_gap),
            ("line_overhang", self.line_overhang),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(AlluviaError::Config(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Policy for choosing one color per line after layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// Independent random RGB color per line.
    #[default]
    Random,
    /// Evenly spaced `tab20` colormap entries over the anchor category's nodes.
    #[serde(alias = "cat_cmap")]
    CategoryColormap,
    /// Face color of the node (or subnode) the line passes at the anchor category.
    #[serde(alias = "sorted_category")]
    AnchorNode,
}

impl FromStr for ColorMode {
    type Err = AlluviaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(Self::Random),
            "category_colormap" | "cat_cmap" => Ok(Self::CategoryColormap),
            "anchor_node" | "sorted_category" => Ok(Self::AnchorNode),
            _ => Err(AlluviaError::Config(format!(
                "invalid color mode `{s}`, expected one of `random`, `category_colormap`, `anchor_node`"
            ))),
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Random => "random",
            Self::CategoryColormap => "category_colormap",
            Self::AnchorNode => "anchor_node",
        };
        f.write_str(name)
    }
}

/// Line color settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    mode: ColorMode,

    /// Seed for [`ColorMode::Random`]; the thread RNG is used when unset.
    seed: Option<u64>,
}

impl ColorConfig {
    pub fn new(mode: ColorMode) -> Self {
        Self { mode, seed: None }
    }

    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn set_mode(&mut self, mode: ColorMode) -> &mut Self {
        self.mode = mode;
        self
    }
}

/// Where a node's label is drawn relative to its rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelPosition {
    #[default]
    Bottom,
    Center,
    Top,
}

impl FromStr for LabelPosition {
    type Err = AlluviaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bottom" => Ok(Self::Bottom),
            "center" => Ok(Self::Center),
            "top" => Ok(Self::Top),
            _ => Err(AlluviaError::Config(format!(
                "invalid label position `{s}`, expected one of `bottom`, `center`, `top`"
            ))),
        }
    }
}

/// Rendering-only options; none of these affect the computed layout.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Figure width in pixels.
    width: f32,

    /// Figure height in pixels.
    height: f32,

    label_position: LabelPosition,

    subnode_font_size: f32,

    /// Background color as a CSS color string.
    background_color: Option<String>,

    /// Draw a 0.1-unit reference grid with axis ticks.
    dev_grid: bool,

    /// Curve sampling resolution in points per unit of X.
    samples_per_unit: usize,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 600.0,
            label_position: LabelPosition::default(),
            subnode_font_size: 8.0,
            background_color: None,
            dev_grid: false,
            samples_per_unit: DEFAULT_SAMPLES_PER_UNIT,
        }
    }
}

impl StyleConfig {
    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn label_position(&self) -> LabelPosition {
        self.label_position
    }

    pub fn subnode_font_size(&self) -> f32 {
        self.subnode_font_size
    }

    pub fn dev_grid(&self) -> bool {
        self.dev_grid
    }

    pub fn samples_per_unit(&self) -> usize {
        self.samples_per_unit
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_label_position(mut self, position: LabelPosition) -> Self {
        self.label_position = position;
        self
    }

    pub fn with_dev_grid(mut self, dev_grid: bool) -> Self {
        self.dev_grid = dev_grid;
        self
    }

    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns [`AlluviaError::Config`] if the configured color string cannot
    /// be parsed.
    pub fn background_color(&self) -> Result<Option<Color>, AlluviaError> {
        self.background_color
            .as_ref()
            .map(|color| Color::new(color))
            .transpose()
            .map_err(|err| AlluviaError::Config(format!("invalid background color: {err}")))
    }
}
