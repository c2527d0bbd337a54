//! Subnode backfill.
//!
//! Subnodes are sized from the slots of the lines they contain rather than
//! from flow counts, so they can only be placed once the sweep has assigned
//! the category's slots.

use log::trace;

use alluvia_core::{
    geometry::{Bounds, Point, Size},
    identifier::Id,
};

use crate::{
    data::ChartData,
    error::AlluviaError,
    layout::{NodeLayout, SubNodeLayout, slots::SlotAssignment},
};

/// Width of a subnode relative to its node; it is centered horizontally.
pub const SUBNODE_REL_SIZE: f32 = 0.9;

/// Adds subnode rectangles to the nodes of `category`.
///
/// A subnode spans the slots of its lines plus a margin of
/// `SUBNODE_REL_SIZE * line_spacing`, half above the top slot and half below
/// the bottom one. Subnodes no line passes through are left out.
///
/// # Errors
///
/// Returns [`AlluviaError::Layout`] if the category has no node definitions.
pub fn backfill(
    data: &ChartData,
    category: Id,
    nodes: Vec<NodeLayout>,
    assignment: &SlotAssignment,
) -> Result<Vec<NodeLayout>, AlluviaError> {
    let definitions = data.nodes(category).ok_or_else(|| {
        AlluviaError::Layout(format!("category `{category}` has no node definitions"))
    })?;
    let margin = SUBNODE_REL_SIZE * assignment.line_spacing();

    let mut backfilled = Vec::with_capacity(nodes.len());
    for node in nodes {
        let Some(definition) = definitions
            .get(&node.label())
            .filter(|definition| definition.has_subnodes())
        else {
            backfilled.push(node);
            continue;
        };

        let bounds = node.bounds();
        let x = bounds.min_x() + bounds.width() * (1.0 - SUBNODE_REL_SIZE) / 2.0;
        let width = bounds.width() * SUBNODE_REL_SIZE;

        let subnodes = definition
            .subnodes()
            .keys()
            .filter_map(|&label| {
                let (low, high) = slot_range(data, category, node.label(), label, assignment)?;
                let bounds = Bounds::new_from_min_point(
                    Point::new(x, low - margin / 2.0),
                    Size::new(width, high - low + margin),
                );
                trace!(category:% = category, node:% = node.label(), subnode:% = label, bounds:?; "Subnode placed");
                Some(SubNodeLayout::new(label, bounds))
            })
            .collect();

        backfilled.push(node.with_subnodes(subnodes));
    }
    Ok(backfilled)
}

/// Lowest and highest slot Y of the lines in `node` tagged `subnode`.
fn slot_range(
    data: &ChartData,
    category: Id,
    node: Id,
    subnode: Id,
    assignment: &SlotAssignment,
) -> Option<(f32, f32)> {
    assignment
        .slots()
        .iter()
        .filter(|(line, _)| {
            data.line(**line)
                .and_then(|record| record.placement(category))
                .is_some_and(|placement| {
                    placement.node() == node && placement.subnode() == Some(subnode)
                })
        })
        .map(|(_, &y)| (y, y))
        .reduce(|(low, high), (y, _)| (low.min(y), high.max(y)))
}
