//! Up-front validation of chart data.
//!
//! The layout stages assume a well-formed chart: every category has nodes,
//! every line names a declared node (and subnode) in every category, and each
//! category has lines to share its vertical space. These checks run before
//! layout so that degenerate input is reported as a [`ValidationError`]
//! instead of producing NaN geometry.

use std::collections::HashSet;

use log::{debug, warn};

use alluvia_core::identifier::Id;

use crate::{
    config::LayoutConfig,
    data::ChartData,
    error::ValidationError,
    layout::{allocate::NodeAllocator, slots::LINE_SPACE_SHARE},
};

/// Validates `data` against the layout settings and returns the anchor category.
///
/// # Errors
///
/// Returns the first [`ValidationError`] found. Categories are checked before
/// lines, and lines in declaration order.
pub fn validate(data: &ChartData, config: &LayoutConfig) -> Result<Id, ValidationError> {
    let categories = data.categories();
    let Some(&first) = categories.first() else {
        return Err(ValidationError::NoCategories);
    };

    let mut seen = HashSet::new();
    for &category in categories {
        if !seen.insert(category) {
            return Err(ValidationError::DuplicateCategory(category));
        }
        let nodes = data
            .nodes(category)
            .ok_or(ValidationError::MissingNodeDefinitions(category))?;
        if nodes.is_empty() {
            return Err(ValidationError::NoNodes(category));
        }

        let count = nodes.len() as f32;
        let overhead = count * config.node_min_height() + (count - 1.0) * config.node_gap();
        if overhead >= 1.0 {
            return Err(ValidationError::VerticalBudgetExceeded { category, overhead });
        }
    }

    if let Some(&category) = data
        .node_definitions()
        .keys()
        .find(|category| !seen.contains(*category))
    {
        return Err(ValidationError::UndeclaredCategory(category));
    }

    let anchor = config.anchor().unwrap_or(first);
    if !seen.contains(&anchor) {
        return Err(ValidationError::UnknownAnchor(anchor));
    }

    if data.lines().is_empty() {
        return Err(ValidationError::NoLines);
    }

    for (&line, record) in data.lines() {
        for &category in categories {
            let placement = record
                .placement(category)
                .ok_or(ValidationError::MissingPlacement { line, category })?;
            let node = placement.node();
            let definition =
                data.node(category, node)
                    .ok_or(ValidationError::UnknownNode {
                        line,
                        category,
                        node,
                    })?;

            if let Some(subnode) = placement.subnode() {
                if !definition.has_subnodes() {
                    return Err(ValidationError::UnexpectedSubnode {
                        line,
                        category,
                        node,
                        subnode,
                    });
                }
                if definition.subnode(subnode).is_none() {
                    return Err(ValidationError::UnknownSubnode {
                        line,
                        category,
                        node,
                        subnode,
                    });
                }
            }
        }

        for (category, _) in record.placements() {
            if !seen.contains(&category) {
                warn!(line:% = line, category:% = category; "Ignoring placement for undeclared category");
            }
        }
    }

    for &category in categories {
        check_line_blocks(data, category, config)?;
    }

    debug!(
        categories = categories.len(),
        lines = data.lines().len(),
        anchor:% = anchor;
        "Chart data validated"
    );

    Ok(anchor)
}

/// Checks that the slots of every node fit inside the node.
///
/// Line spacing is shared by the whole category, so a node carrying most of
/// the lines in a category with many nodes can need more room than its
/// flow-proportional height gives it.
fn check_line_blocks(
    data: &ChartData,
    category: Id,
    config: &LayoutConfig,
) -> Result<(), ValidationError> {
    let Some(nodes) = data.nodes(category) else {
        return Ok(());
    };
    let flows: Vec<(Id, usize)> = nodes
        .keys()
        .map(|&node| {
            let count = data
                .lines()
                .values()
                .filter_map(|record| record.placement(category))
                .filter(|placement| placement.node() == node)
                .count();
            (node, count)
        })
        .collect();
    let lines: usize = flows.iter().map(|(_, count)| count).sum();
    if lines == 0 {
        return Ok(());
    }

    let allocator = NodeAllocator::new(config.node_min_height(), config.node_gap());
    let layouts = allocator.allocate(0.0, 0.0, &flows);
    let total_height: f32 = layouts.iter().map(|node| node.bounds().height()).sum();
    let spacing = LINE_SPACE_SHARE * total_height / lines as f32;

    for (node, &(_, count)) in layouts.iter().zip(&flows) {
        let block = spacing * count as f32;
        let height = node.bounds().height();
        if block > height + 1e-6 {
            return Err(ValidationError::LinesOverflowNode {
                category,
                node: node.label(),
                lines: count,
                needed: block,
                height,
            });
        }
    }
    Ok(())
}
