//! A laid-out chart ready for export.

use indexmap::IndexMap;

use alluvia_core::{color::Color, identifier::Id, path::FlowPath};

use crate::{data::ChartData, layout::Layout};

/// The input data of a chart together with its computed geometry and line
/// colors.
///
/// Geometry and presentation stay separate: [`Layout`] holds only positions,
/// while node styles are read from the [`ChartData`] at render time.
#[derive(Debug, Clone)]
pub struct Chart<'a> {
    data: &'a ChartData,
    layout: Layout,
    colors: IndexMap<Id, Color>,
}

impl<'a> Chart<'a> {
    pub fn new(data: &'a ChartData, layout: Layout, colors: IndexMap<Id, Color>) -> Self {
        Self {
            data,
            layout,
            colors,
        }
    }

    pub fn data(&self) -> &'a ChartData {
        self.data
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Line colors keyed by line id.
    pub fn colors(&self) -> &IndexMap<Id, Color> {
        &self.colors
    }

    /// The color of `line`, black if none was assigned.
    pub fn color(&self, line: Id) -> Color {
        self.colors.get(&line).copied().unwrap_or_default()
    }

    /// Flow paths with their colors, in input line order.
    pub fn paths(&self) -> impl Iterator<Item = (&FlowPath, Color)> + '_ {
        self.layout
            .paths()
            .values()
            .map(|path| (path, self.color(path.id())))
    }
}
