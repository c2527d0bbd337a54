//! Outward sweep from the anchor category.
//!
//! The anchor category is laid out first, with lines in input order. The
//! sweep then walks to the leftmost category and, starting again from the
//! anchor, to the rightmost one. Every step re-assigns slots in the next
//! category while keeping the line order of the step before it, so a line's
//! rank is carried along and only regrouped by the nodes it passes through.
//!
//! Each step emits, per line, a straight run across the new category and a
//! curved connector back to the line's slot in the previous category.

use indexmap::IndexMap;
use log::{debug, trace};

use alluvia_core::{
    geometry::Point,
    identifier::Id,
    path::{FlowPath, PathSegment},
};

use crate::{
    config::LayoutConfig,
    data::{ChartData, Placement},
    error::AlluviaError,
    layout::{
        LineIdLabel, NodeLayout,
        columns::{Columns, LineSpan},
        slots::{self, SlotAssignment},
    },
};

/// Direction of a sweep away from the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Left,
    Right,
}

/// Result of a complete sweep.
#[derive(Debug)]
pub struct SweepOutput {
    /// Slot assignment per category, left to right.
    pub assignments: Vec<SlotAssignment>,
    /// Flow path per line, in input line order.
    pub paths: IndexMap<Id, FlowPath>,
    /// Line-id labels, in the leftmost category's slot order.
    pub line_ids: Vec<LineIdLabel>,
}

/// The state the sweep carries from one category to the next.
struct Step {
    assignment: SlotAssignment,
    /// X where connectors from the next category attach.
    edge_x: f32,
}

pub struct Sweep<'a> {
    data: &'a ChartData,
    columns: &'a Columns,
    node_columns: &'a [Vec<NodeLayout>],
    config: &'a LayoutConfig,
}

impl<'a> Sweep<'a> {
    pub fn new(
        data: &'a ChartData,
        columns: &'a Columns,
        node_columns: &'a [Vec<NodeLayout>],
        config: &'a LayoutConfig,
    ) -> Self {
        Self {
            data,
            columns,
            node_columns,
            config,
        }
    }

    /// Runs the anchor step and both sweeps.
    ///
    /// # Errors
    ///
    /// Returns [`AlluviaError::Layout`] if the chart was not validated and a
    /// line lacks a placement, or a category has no nodes or no lines.
    pub fn run(&self, anchor_index: usize) -> Result<SweepOutput, AlluviaError> {
        let categories = self.data.categories();
        let mut assignments: Vec<Option<SlotAssignment>> = vec![None; categories.len()];
        let mut paths: IndexMap<Id, FlowPath> = self
            .data
            .lines()
            .keys()
            .map(|&line| (line, FlowPath::new(line)))
            .collect();

        // Anchor step: input line order
        let anchor_span = self.columns.line_span(anchor_index, self.config);
        let anchor = self.assign(anchor_index, self.data.lines().keys().copied())?;
        for (&line, &y) in anchor.slots() {
            let name = self.segment_name(anchor_index, line)?;
            path_mut(&mut paths, line)?.push(straight(anchor_span, y, name));
        }
        debug!(
            category:% = categories[anchor_index],
            spacing = anchor.line_spacing();
            "Anchor slots assigned"
        );

        for direction in [Direction::Left, Direction::Right] {
            let mut previous = Step {
                assignment: anchor.clone(),
                edge_x: match direction {
                    Direction::Left => anchor_span.left(),
                    Direction::Right => anchor_span.right(),
                },
            };
            let indices: Vec<usize> = match direction {
                Direction::Left => (0..anchor_index).rev().collect(),
                Direction::Right => (anchor_index + 1..categories.len()).collect(),
            };

            for index in indices {
                let step = self.step(index, direction, &previous, &mut paths)?;
                assignments[index] = Some(step.assignment.clone());
                previous = step;
            }
        }
        assignments[anchor_index] = Some(anchor);

        let assignments = assignments
            .into_iter()
            .zip(categories)
            .map(|(assignment, category)| {
                assignment.ok_or_else(|| {
                    AlluviaError::Layout(format!("category `{category}` was not reached by the sweep"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let line_ids = if self.config.show_line_ids() {
            self.line_id_column(&assignments[0], &mut paths)?
        } else {
            Vec::new()
        };

        Ok(SweepOutput {
            assignments,
            paths,
            line_ids,
        })
    }

    /// Lays out category `index`, one step away from `previous`.
    fn step(
        &self,
        index: usize,
        direction: Direction,
        previous: &Step,
        paths: &mut IndexMap<Id, FlowPath>,
    ) -> Result<Step, AlluviaError> {
        let span = self.columns.line_span(index, self.config);
        let (connection_x, edge_x) = match direction {
            Direction::Left => (span.right(), span.left()),
            Direction::Right => (span.left(), span.right()),
        };

        let assignment = self.assign(index, previous.assignment.order())?;
        for (&line, &y) in assignment.slots() {
            let previous_y = previous.assignment.slot(line).ok_or_else(|| {
                AlluviaError::Layout(format!("line `{line}` has no slot in the previous category"))
            })?;
            let name = self.segment_name(index, line)?;
            let path = path_mut(paths, line)?;
            path.push(straight(span, y, name.clone()));
            path.push(PathSegment::curved(
                Point::new(connection_x, y),
                Point::new(previous.edge_x, previous_y),
                name,
            ));
        }
        trace!(
            category:% = self.data.categories()[index],
            direction:? = direction,
            spacing = assignment.line_spacing();
            "Sweep step"
        );

        Ok(Step { assignment, edge_x })
    }

    /// Slot assignment of category `index` for lines in `order`.
    fn assign(
        &self,
        index: usize,
        order: impl Iterator<Item = Id>,
    ) -> Result<SlotAssignment, AlluviaError> {
        let category = self.data.categories()[index];
        let nodes = self.node_columns.get(index).ok_or_else(|| {
            AlluviaError::Layout(format!("category `{category}` has no node column"))
        })?;
        let definitions = self.data.nodes(category).ok_or_else(|| {
            AlluviaError::Layout(format!("category `{category}` has no node definitions"))
        })?;
        let ordered = order
            .map(|line| Ok((line, self.placement(category, line)?)))
            .collect::<Result<Vec<_>, AlluviaError>>()?;
        slots::assign_slots(category, nodes, definitions, &ordered)
    }

    fn placement(&self, category: Id, line: Id) -> Result<Placement, AlluviaError> {
        self.data
            .line(line)
            .and_then(|record| record.placement(category))
            .ok_or_else(|| {
                AlluviaError::Layout(format!(
                    "line `{line}` has no placement in category `{category}`"
                ))
            })
    }

    /// `{category}_{node}_{line}`, the name of both segments a step emits.
    fn segment_name(&self, index: usize, line: Id) -> Result<String, AlluviaError> {
        let category = self.data.categories()[index];
        let placement = self.placement(category, line)?;
        Ok(Id::join(&[category, placement.node(), line]))
    }

    /// Spreads one label per line evenly over the unit height, left of the
    /// leftmost category, and connects it to the line's first slot.
    fn line_id_column(
        &self,
        leftmost: &SlotAssignment,
        paths: &mut IndexMap<Id, FlowPath>,
    ) -> Result<Vec<LineIdLabel>, AlluviaError> {
        let span = self.columns.line_span(0, self.config);
        let x = if self.columns.count() > 1 {
            -self.columns.gap() / 2.0
        } else {
            span.left() - self.config.line_overhang()
        };
        let space = 1.0 / leftmost.slots().len() as f32;

        let mut labels = Vec::with_capacity(leftmost.slots().len());
        for (rank, (&line, &slot_y)) in leftmost.slots().iter().enumerate() {
            let y = 1.0 - (rank as f32 + 0.5) * space;
            path_mut(paths, line)?.push(PathSegment::curved(
                Point::new(x, y),
                Point::new(span.left(), slot_y),
                format!("id_{line}"),
            ));
            labels.push(LineIdLabel::new(line, Point::new(x, y)));
        }
        debug!(lines = labels.len(), x; "Line id column added");
        Ok(labels)
    }
}

fn straight(span: LineSpan, y: f32, name: String) -> PathSegment {
    PathSegment::straight(Point::new(span.left(), y), Point::new(span.right(), y), name)
}

fn path_mut(paths: &mut IndexMap<Id, FlowPath>, line: Id) -> Result<&mut FlowPath, AlluviaError> {
    paths
        .get_mut(&line)
        .ok_or_else(|| AlluviaError::Layout(format!("line `{line}` has no flow path")))
}
