//! Layout engine for alluvial charts.
//!
//! The layout runs as three sequential stages, each consuming the previous
//! stage's output by reference:
//!
//! ```text
//! ChartData
//!     ↓ allocate   node rectangles per category, sized by flow count
//! node columns
//!     ↓ sweep      slot Y per line per category, path segments per line
//! slot assignments + flow paths
//!     ↓ subnodes   subnode rectangles derived from the slots they contain
//! Layout
//! ```
//!
//! All geometry is expressed in the unit square (see
//! [`alluvia_core::geometry`]).

pub mod allocate;
pub mod columns;
pub mod slots;
pub mod subnodes;
pub mod sweep;

use indexmap::IndexMap;
use log::{debug, info, trace};

use alluvia_core::{
    geometry::{Bounds, Point},
    identifier::Id,
    path::FlowPath,
};

use crate::{config::LayoutConfig, data::ChartData, error::AlluviaError};

use allocate::NodeAllocator;
use columns::Columns;
use slots::SlotAssignment;
use sweep::Sweep;

/// Geometry of a subnode; only subnodes holding at least one line have one.
#[derive(Debug, Clone, PartialEq)]
pub struct SubNodeLayout {
    label: Id,
    bounds: Bounds,
}

impl SubNodeLayout {
    pub fn new(label: Id, bounds: Bounds) -> Self {
        Self { label, bounds }
    }

    pub fn label(&self) -> Id {
        self.label
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}

/// Geometry of a node and of its placed subnodes.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeLayout {
    label: Id,
    bounds: Bounds,
    subnodes: Vec<SubNodeLayout>,
}

impl NodeLayout {
    pub fn new(label: Id, bounds: Bounds) -> Self {
        Self {
            label,
            bounds,
            subnodes: Vec::new(),
        }
    }

    pub fn with_subnodes(mut self, subnodes: Vec<SubNodeLayout>) -> Self {
        self.subnodes = subnodes;
        self
    }

    pub fn label(&self) -> Id {
        self.label
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn subnodes(&self) -> &[SubNodeLayout] {
        &self.subnodes
    }

    pub fn subnode(&self, label: Id) -> Option<&SubNodeLayout> {
        self.subnodes.iter().find(|subnode| subnode.label == label)
    }
}

/// Everything computed for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryLayout {
    name: Id,
    index: usize,
    nodes: Vec<NodeLayout>,
    assignment: SlotAssignment,
}

impl CategoryLayout {
    pub fn name(&self) -> Id {
        self.name
    }

    /// Position of the category along the X axis, starting at 0.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Nodes in top-to-bottom display order.
    pub fn nodes(&self) -> &[NodeLayout] {
        &self.nodes
    }

    pub fn node(&self, label: Id) -> Option<&NodeLayout> {
        self.nodes.iter().find(|node| node.label == label)
    }

    /// Vertical distance between adjacent line slots in this category.
    pub fn line_spacing(&self) -> f32 {
        self.assignment.line_spacing()
    }

    /// Slot Y of every line, in slot order (top to bottom).
    pub fn slots(&self) -> &IndexMap<Id, f32> {
        self.assignment.slots()
    }

    pub fn slot(&self, line: Id) -> Option<f32> {
        self.assignment.slot(line)
    }

    /// Horizontal extent shared by all nodes of the category.
    pub fn column_bounds(&self) -> Option<Bounds> {
        self.nodes
            .iter()
            .map(NodeLayout::bounds)
            .reduce(|acc, bounds| acc.merge(&bounds))
    }
}

/// A line-id label left of the first category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineIdLabel {
    id: Id,
    position: Point,
}

impl LineIdLabel {
    pub fn new(id: Id, position: Point) -> Self {
        Self { id, position }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    /// Start of the line's id connector; the label text ends just left of it.
    pub fn position(&self) -> Point {
        self.position
    }
}

/// The complete, immutable result of a layout run.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    anchor: Id,
    categories: Vec<CategoryLayout>,
    paths: IndexMap<Id, FlowPath>,
    line_ids: Vec<LineIdLabel>,
}

impl Layout {
    /// The category the line order was seeded from.
    pub fn anchor(&self) -> Id {
        self.anchor
    }

    /// Categories, left to right.
    pub fn categories(&self) -> &[CategoryLayout] {
        &self.categories
    }

    pub fn category(&self, name: Id) -> Option<&CategoryLayout> {
        self.categories.iter().find(|category| category.name == name)
    }

    /// Flow paths keyed by line id, in input line order.
    pub fn paths(&self) -> &IndexMap<Id, FlowPath> {
        &self.paths
    }

    pub fn path(&self, line: Id) -> Option<&FlowPath> {
        self.paths.get(&line)
    }

    /// Line-id labels; empty unless line ids are enabled.
    pub fn line_ids(&self) -> &[LineIdLabel] {
        &self.line_ids
    }

    /// Smallest X reached by any path segment, at most 0.
    pub fn min_x(&self) -> f32 {
        self.paths
            .values()
            .flat_map(|path| path.segments())
            .map(|segment| segment.start().x())
            .fold(0.0, f32::min)
    }
}

/// Runs the layout stages for a validated chart.
pub struct Engine<'c> {
    config: &'c LayoutConfig,
}

impl<'c> Engine<'c> {
    pub fn new(config: &'c LayoutConfig) -> Self {
        Self { config }
    }

    /// Lays out `data` with `anchor` as the seed category.
    ///
    /// `data` must have passed [`crate::validate::validate`]; the stages
    /// still report inconsistencies as [`AlluviaError::Layout`] rather than
    /// panicking.
    pub fn calculate(&self, data: &ChartData, anchor: Id) -> Result<Layout, AlluviaError> {
        let categories = data.categories();
        let anchor_index = data.category_index(anchor).ok_or_else(|| {
            AlluviaError::Layout(format!("anchor category `{anchor}` is not declared"))
        })?;

        info!(
            categories = categories.len(),
            lines = data.lines().len(),
            anchor:% = anchor;
            "Calculating layout"
        );

        // Stage 1: node rectangles
        let columns = Columns::new(categories.len(), self.config.nodes_x_share());
        let allocator = NodeAllocator::new(self.config.node_min_height(), self.config.node_gap());
        let node_columns = categories
            .iter()
            .enumerate()
            .map(|(index, &category)| {
                let flows = allocate::count_flows(data, category)?;
                trace!(category:% = category, flows:?; "Counted node flows");
                Ok(allocator.allocate(columns.x(index), columns.node_width(), &flows))
            })
            .collect::<Result<Vec<_>, AlluviaError>>()?;
        debug!(columns = node_columns.len(); "Nodes allocated");

        // Stage 2: line slots and path segments
        let sweep = Sweep::new(data, &columns, &node_columns, self.config);
        let swept = sweep.run(anchor_index)?;
        debug!(paths = swept.paths.len(); "Sweep completed");

        // Stage 3: subnode backfill
        let categories = categories
            .iter()
            .zip(node_columns)
            .zip(swept.assignments)
            .enumerate()
            .map(|(index, ((&name, nodes), assignment))| {
                let nodes = subnodes::backfill(data, name, nodes, &assignment)?;
                Ok(CategoryLayout {
                    name,
                    index,
                    nodes,
                    assignment,
                })
            })
            .collect::<Result<Vec<_>, AlluviaError>>()?;

        info!(categories = categories.len(); "Layout calculated");

        Ok(Layout {
            anchor,
            categories,
            paths: swept.paths,
            line_ids: swept.line_ids,
        })
    }
}
