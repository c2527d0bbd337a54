//! Slot assignment: the Y coordinate of every line inside one category.
//!
//! All slots of a category are spaced evenly, with the spacing derived from
//! the category's total node height. Inside a node the lines form a block
//! centered vertically on the node; inside the block lines keep the order
//! they are handed in, grouped by subnode when the node declares subnodes.

use indexmap::IndexMap;

use alluvia_core::identifier::Id;

use crate::{
    data::{NodeDefinition, Placement},
    error::AlluviaError,
    layout::NodeLayout,
};

/// Share of the total node height taken by line slots.
pub const LINE_SPACE_SHARE: f32 = 0.9;

/// The slot of every line in one category.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotAssignment {
    line_spacing: f32,
    slots: IndexMap<Id, f32>,
}

impl SlotAssignment {
    pub fn line_spacing(&self) -> f32 {
        self.line_spacing
    }

    /// Slot Y of every line, top to bottom.
    pub fn slots(&self) -> &IndexMap<Id, f32> {
        &self.slots
    }

    pub fn slot(&self, line: Id) -> Option<f32> {
        self.slots.get(&line).copied()
    }

    /// Line ids, top to bottom.
    pub fn order(&self) -> impl Iterator<Item = Id> + '_ {
        self.slots.keys().copied()
    }
}

/// Assigns slots to `ordered` lines across the `nodes` of `category`.
///
/// `ordered` holds each line's placement in this category; its order decides
/// the order of lines sharing a node (or subnode).
///
/// # Errors
///
/// Returns [`AlluviaError::Layout`] if there are no lines or a placement
/// names a node missing from `nodes`.
pub fn assign_slots(
    category: Id,
    nodes: &[NodeLayout],
    definitions: &IndexMap<Id, NodeDefinition>,
    ordered: &[(Id, Placement)],
) -> Result<SlotAssignment, AlluviaError> {
    if ordered.is_empty() {
        return Err(AlluviaError::Layout(format!(
            "no lines to place in category `{category}`"
        )));
    }
    if let Some((line, placement)) = ordered
        .iter()
        .find(|(_, placement)| !nodes.iter().any(|node| node.label() == placement.node()))
    {
        return Err(AlluviaError::Layout(format!(
            "line `{line}` is placed on node `{}`, which is not laid out in category `{category}`",
            placement.node()
        )));
    }

    let total_height: f32 = nodes.iter().map(|node| node.bounds().height()).sum();
    let line_spacing = LINE_SPACE_SHARE * total_height / ordered.len() as f32;

    let mut slots = IndexMap::with_capacity(ordered.len());
    for node in nodes {
        let members: Vec<(Id, Placement)> = ordered
            .iter()
            .filter(|(_, placement)| placement.node() == node.label())
            .copied()
            .collect();
        if members.is_empty() {
            continue;
        }

        let bounds = node.bounds();
        let block = line_spacing * members.len() as f32;
        let mut y = bounds.max_y() - (bounds.height() - block) / 2.0 - line_spacing / 2.0;

        let subnodes = definitions
            .get(&node.label())
            .map(|definition| definition.subnodes().keys().copied().collect::<Vec<_>>())
            .unwrap_or_default();

        let groups = subnodes
            .iter()
            .map(|&subnode| Some(subnode))
            .chain(std::iter::once(None));
        // Lines without a declared subnode share the trailing ungrouped block.
        let group_of = |placement: &Placement| {
            placement
                .subnode()
                .filter(|subnode| subnodes.contains(subnode))
        };
        for group in groups {
            for (line, _) in members
                .iter()
                .filter(|(_, placement)| group_of(placement) == group)
            {
                slots.insert(*line, y);
                y -= line_spacing;
            }
        }
    }

    Ok(SlotAssignment {
        line_spacing,
        slots,
    })
}
