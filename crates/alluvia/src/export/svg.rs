//! SVG rendering of laid-out charts.
//!
//! The chart lives in the unit square with Y pointing up; the renderer maps it
//! onto the configured figure size inside a fixed margin and flips Y. When
//! line ids are shown, the X range is widened to the leftmost id connector.

use std::io::Write;

use log::{debug, error, info};
use svg::{Document, node::element as svg_element};

use alluvia_core::{
    color::Color,
    geometry::{Bounds, Point},
};

use crate::{
    chart::Chart,
    config::{LabelPosition, StyleConfig},
    data::NodeStyle,
    export,
    layout::{CategoryLayout, NodeLayout},
};

/// Margin around the plot area, in pixels.
const MARGIN: f32 = 50.0;

/// Vertical offset of node and category labels from their anchor, in unit space.
const LABEL_OFFSET: f32 = 0.01;

const FONT_FAMILY: &str = "Arial";
const NODE_FONT_SIZE: f32 = 10.0;
const CATEGORY_FONT_SIZE: f32 = 12.0;
const LINE_ID_FONT_SIZE: f32 = 6.0;
const GRID_FONT_SIZE: f32 = 8.0;
const LINE_WIDTH: f32 = 1.5;

/// Maps unit-space coordinates to SVG pixels.
#[derive(Debug, Clone, Copy)]
struct Projection {
    x_min: f32,
    plot_width: f32,
    plot_height: f32,
}

impl Projection {
    fn new(x_min: f32, width: f32, height: f32) -> Self {
        Self {
            x_min,
            plot_width: width - 2.0 * MARGIN,
            plot_height: height - 2.0 * MARGIN,
        }
    }

    fn x(&self, x: f32) -> f32 {
        MARGIN + (x - self.x_min) / (1.0 - self.x_min) * self.plot_width
    }

    fn y(&self, y: f32) -> f32 {
        MARGIN + (1.0 - y) * self.plot_height
    }

    fn point(&self, point: Point) -> (f32, f32) {
        (self.x(point.x()), self.y(point.y()))
    }

    /// Top-left corner, width and height of `bounds` in pixels.
    fn rect(&self, bounds: Bounds) -> (f32, f32, f32, f32) {
        let left = self.x(bounds.min_x());
        let top = self.y(bounds.max_y());
        (
            left,
            top,
            self.x(bounds.max_x()) - left,
            self.y(bounds.min_y()) - top,
        )
    }
}

/// Builder for [`Svg`] exporters.
pub struct SvgBuilder<W: Write> {
    writer: W,
    style: StyleConfig,
}

impl<W: Write> SvgBuilder<W> {
    /// Creates a builder that writes the document to `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            style: StyleConfig::default(),
        }
    }

    pub fn with_style(mut self, style: &StyleConfig) -> Self {
        self.style = style.clone();
        self
    }

    /// Checks the style and builds the exporter.
    ///
    /// # Errors
    ///
    /// Returns [`export::Error::Render`] if the figure is too small to hold
    /// the margins or the background color does not parse.
    pub fn build(self) -> Result<Svg<W>, export::Error> {
        let (width, height) = (self.style.width(), self.style.height());
        if !(width > 2.0 * MARGIN && height > 2.0 * MARGIN) {
            return Err(export::Error::Render(format!(
                "figure size {width}x{height} leaves no room inside the {MARGIN}px margins"
            )));
        }
        let background = self
            .style
            .background_color()
            .map_err(|err| export::Error::Render(err.to_string()))?;

        Ok(Svg {
            writer: self.writer,
            style: self.style,
            background,
        })
    }
}

/// SVG exporter writing one document per exported chart.
pub struct Svg<W: Write> {
    writer: W,
    style: StyleConfig,
    background: Option<Color>,
}

impl<W: Write> Svg<W> {
    /// Consumes the exporter and returns its writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Renders `chart` to an SVG document.
    pub fn render_chart(&self, chart: &Chart<'_>) -> Document {
        let (width, height) = (self.style.width(), self.style.height());
        let layout = chart.layout();

        let x_min = if layout.line_ids().is_empty() {
            0.0
        } else {
            // Room for the right-aligned id text
            layout.min_x() - 0.05
        };
        let projection = Projection::new(x_min, width, height);

        let mut doc = Document::new()
            .set("viewBox", format!("0 0 {width} {height}"))
            .set("width", width)
            .set("height", height);

        if let Some(background) = &self.background {
            doc = doc.add(
                svg_element::Rectangle::new()
                    .set("width", "100%")
                    .set("height", "100%")
                    .set("fill", background)
                    .set("fill-opacity", background.alpha()),
            );
        }
        if self.style.dev_grid() {
            doc = doc.add(self.render_grid(&projection));
        }

        for category in layout.categories() {
            doc = doc.add(self.render_category(chart, category, &projection));
        }
        doc = doc.add(self.render_lines(chart, &projection));
        if !layout.line_ids().is_empty() {
            doc = doc.add(self.render_line_ids(chart, &projection));
        }

        debug!(
            width,
            height,
            categories = layout.categories().len(),
            lines = layout.paths().len();
            "SVG document rendered"
        );
        doc
    }

    /// Nodes, subnodes, their labels and the category title.
    fn render_category(
        &self,
        chart: &Chart<'_>,
        category: &CategoryLayout,
        projection: &Projection,
    ) -> svg_element::Group {
        let definitions = chart.data().nodes(category.name());
        let mut group = svg_element::Group::new().set("class", "category");

        for node in category.nodes() {
            let definition = definitions.and_then(|nodes| nodes.get(&node.label()));
            let style = definition.map(|d| d.style().clone()).unwrap_or_default();
            group = group.add(rectangle(node.bounds(), &style, projection));

            for subnode in node.subnodes() {
                let style = definition
                    .and_then(|d| d.subnode(subnode.label()))
                    .cloned()
                    .unwrap_or_default();
                let center = projection.point(subnode.bounds().center());
                group = group
                    .add(rectangle(subnode.bounds(), &style, projection))
                    .add(
                        text(&subnode.label().to_string(), center, self.style.subnode_font_size())
                            .set("text-anchor", "middle")
                            .set("dominant-baseline", "middle"),
                    );
            }

            group = group.add(self.render_node_label(node, projection));
        }

        if let Some(column) = category.column_bounds() {
            let anchor = (
                projection.x(column.center().x()),
                projection.y(1.0 + LABEL_OFFSET),
            );
            group = group.add(
                text(&category.name().to_string(), anchor, CATEGORY_FONT_SIZE)
                    .set("text-anchor", "middle")
                    .set("font-weight", "bold"),
            );
        }
        group
    }

    fn render_node_label(&self, node: &NodeLayout, projection: &Projection) -> svg_element::Text {
        let bounds = node.bounds();
        let (y, baseline) = match self.style.label_position() {
            LabelPosition::Bottom => (bounds.min_y() - LABEL_OFFSET, "hanging"),
            LabelPosition::Center => (bounds.center().y(), "middle"),
            LabelPosition::Top => (bounds.max_y() + LABEL_OFFSET, "auto"),
        };
        let anchor = (projection.x(bounds.center().x()), projection.y(y));
        text(&node.label().to_string(), anchor, NODE_FONT_SIZE)
            .set("text-anchor", "middle")
            .set("dominant-baseline", baseline)
    }

    fn render_lines(&self, chart: &Chart<'_>, projection: &Projection) -> svg_element::Group {
        let samples_per_unit = self.style.samples_per_unit();
        chart.paths().fold(
            svg_element::Group::new().set("class", "lines"),
            |group, (path, color)| {
                let points = path
                    .points(samples_per_unit)
                    .into_iter()
                    .map(|point| {
                        let (x, y) = projection.point(point);
                        format!("{x:.2},{y:.2}")
                    })
                    .collect::<Vec<_>>()
                    .join(" ");
                group.add(
                    svg_element::Polyline::new()
                        .set("id", format!("line-{}", path.id()))
                        .set("points", points)
                        .set("fill", "none")
                        .set("stroke", &color)
                        .set("stroke-opacity", color.alpha())
                        .set("stroke-width", LINE_WIDTH),
                )
            },
        )
    }

    fn render_line_ids(&self, chart: &Chart<'_>, projection: &Projection) -> svg_element::Group {
        chart.layout().line_ids().iter().fold(
            svg_element::Group::new().set("class", "line-ids"),
            |group, label| {
                let position = label.position();
                let anchor = projection.point(position.with_x(position.x() - LABEL_OFFSET));
                group.add(
                    text(&label.id().to_string(), anchor, LINE_ID_FONT_SIZE)
                        .set("text-anchor", "end")
                        .set("dominant-baseline", "middle"),
                )
            },
        )
    }

    /// Reference grid every 0.1 unit with tick labels.
    fn render_grid(&self, projection: &Projection) -> svg_element::Group {
        let mut group = svg_element::Group::new()
            .set("class", "dev-grid")
            .set("stroke", "lightgrey")
            .set("stroke-width", 0.5);

        for step in 0..=10 {
            let value = step as f32 / 10.0;
            let (x, y) = (projection.x(value), projection.y(value));
            group = group
                .add(
                    svg_element::Line::new()
                        .set("x1", x)
                        .set("y1", projection.y(0.0))
                        .set("x2", x)
                        .set("y2", projection.y(1.0)),
                )
                .add(
                    svg_element::Line::new()
                        .set("x1", projection.x(0.0))
                        .set("y1", y)
                        .set("x2", projection.x(1.0))
                        .set("y2", y),
                )
                .add(
                    text(&format!("{value:.1}"), (x, projection.y(0.0) + 12.0), GRID_FONT_SIZE)
                        .set("text-anchor", "middle")
                        .set("stroke", "none"),
                )
                .add(
                    text(&format!("{value:.1}"), (projection.x(0.0) - 4.0, y), GRID_FONT_SIZE)
                        .set("text-anchor", "end")
                        .set("dominant-baseline", "middle")
                        .set("stroke", "none"),
                );
        }
        group
    }

    /// Writes an SVG document to the exporter's writer.
    pub fn write_document(&mut self, doc: &Document) -> Result<(), export::Error> {
        if let Err(err) = write!(self.writer, "{doc}") {
            error!(err:err; "Failed to write SVG content");
            return Err(export::Error::Io(err));
        }
        Ok(())
    }
}

impl<W: Write> export::Exporter for Svg<W> {
    fn export_chart(&mut self, chart: &Chart<'_>) -> Result<(), export::Error> {
        let doc = self.render_chart(chart);
        self.write_document(&doc)?;
        info!("SVG exported");
        Ok(())
    }
}

fn rectangle(bounds: Bounds, style: &NodeStyle, projection: &Projection) -> svg_element::Rectangle {
    let (x, y, width, height) = projection.rect(bounds);
    svg_element::Rectangle::new()
        .set("x", x)
        .set("y", y)
        .set("width", width)
        .set("height", height)
        .set("fill", &style.facecolor())
        .set("stroke", &style.edgecolor())
        .set("opacity", style.opacity())
}

fn text(content: &str, (x, y): (f32, f32), font_size: f32) -> svg_element::Text {
    svg_element::Text::new(content)
        .set("x", x)
        .set("y", y)
        .set("font-family", FONT_FAMILY)
        .set("font-size", font_size)
}
