//! Node rectangle allocation.
//!
//! Each category's nodes are stacked top-down from `y = 1`. Every node gets
//! `node_min_height`, consecutive nodes are separated by `node_gap`, and the
//! remaining vertical space is shared in proportion to the number of lines
//! passing through each node.

use alluvia_core::{
    geometry::{Bounds, Point, Size},
    identifier::Id,
};

use crate::{data::ChartData, error::AlluviaError, layout::NodeLayout};

/// Counts the lines passing through each node of `category`, in declared order.
///
/// # Errors
///
/// Returns [`AlluviaError::Layout`] if the category has no node definitions.
pub fn count_flows(data: &ChartData, category: Id) -> Result<Vec<(Id, usize)>, AlluviaError> {
    let nodes = data.nodes(category).ok_or_else(|| {
        AlluviaError::Layout(format!("category `{category}` has no node definitions"))
    })?;

    let flows = nodes
        .keys()
        .map(|&label| {
            let count = data
                .lines()
                .values()
                .filter_map(|record| record.placement(category))
                .filter(|placement| placement.node() == label)
                .count();
            (label, count)
        })
        .collect();
    Ok(flows)
}

/// Sizes and stacks the nodes of one category column.
#[derive(Debug, Clone, Copy)]
pub struct NodeAllocator {
    min_height: f32,
    gap: f32,
}

impl NodeAllocator {
    pub fn new(min_height: f32, gap: f32) -> Self {
        Self { min_height, gap }
    }

    /// Height left for flow-proportional sizing once minimum heights and gaps
    /// of `count` nodes are taken out.
    fn free_height(&self, count: usize) -> f32 {
        let count = count as f32;
        1.0 - count * self.min_height - (count - 1.0).max(0.0) * self.gap
    }

    /// Allocates the rectangles of a column starting at `x`.
    ///
    /// `flows` lists every node with its line count in display order. A
    /// column with no lines at all gets zero-height nodes.
    pub fn allocate(&self, x: f32, width: f32, flows: &[(Id, usize)]) -> Vec<NodeLayout> {
        let total: usize = flows.iter().map(|(_, count)| count).sum();
        let free = self.free_height(flows.len());

        let mut top = 1.0;
        flows
            .iter()
            .map(|&(label, count)| {
                let height = if total == 0 {
                    0.0
                } else {
                    self.min_height + count as f32 / total as f32 * free
                };
                let bounds =
                    Bounds::new_from_min_point(Point::new(x, top - height), Size::new(width, height));
                top -= height + self.gap;
                NodeLayout::new(label, bounds)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use proptest::prelude::*;

    use super::*;
    use crate::data::{LineRecord, NodeStyle, Placement};

    fn flows(counts: &[usize]) -> Vec<(Id, usize)> {
        counts
            .iter()
            .enumerate()
            .map(|(index, &count)| (Id::from(index), count))
            .collect()
    }

    #[test]
    fn test_count_flows_in_declared_order() {
        let mut data = ChartData::new(["A"]);
        data.add_node("A", "a2", NodeStyle::new())
            .add_node("A", "a1", NodeStyle::new())
            .add_node("A", "a3", NodeStyle::new());
        for (line, node) in [(1usize, "a1"), (2, "a2"), (3, "a1")] {
            data.add_line(line, LineRecord::from_iter([("A", Placement::new(node))]));
        }

        let counted = count_flows(&data, Id::new("A")).unwrap();
        assert_eq!(
            counted,
            vec![(Id::new("a2"), 1), (Id::new("a1"), 2), (Id::new("a3"), 0)]
        );

        assert!(matches!(
            count_flows(&data, Id::new("Z")),
            Err(AlluviaError::Layout(_))
        ));
    }

    #[test]
    fn test_single_node_fills_column() {
        let allocator = NodeAllocator::new(0.01, 0.05);
        let nodes = allocator.allocate(0.2, 0.1, &flows(&[4]));

        assert_eq!(nodes.len(), 1);
        let bounds = nodes[0].bounds();
        assert_approx_eq!(f32, bounds.max_y(), 1.0, epsilon = 1e-6);
        assert_approx_eq!(f32, bounds.min_y(), 0.0, epsilon = 1e-6);
        assert_approx_eq!(f32, bounds.min_x(), 0.2, epsilon = 1e-6);
        assert_approx_eq!(f32, bounds.width(), 0.1, epsilon = 1e-6);
    }

    #[test]
    fn test_heights_follow_flow_share() {
        let allocator = NodeAllocator::new(0.0, 0.1);
        let nodes = allocator.allocate(0.0, 0.1, &flows(&[3, 1]));

        // 0.9 of free height split 3:1
        assert_approx_eq!(f32, nodes[0].bounds().height(), 0.675, epsilon = 1e-6);
        assert_approx_eq!(f32, nodes[1].bounds().height(), 0.225, epsilon = 1e-6);
        assert_approx_eq!(
            f32,
            nodes[0].bounds().min_y() - nodes[1].bounds().max_y(),
            0.1,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_empty_node_keeps_minimum_height() {
        let allocator = NodeAllocator::new(0.02, 0.05);
        let nodes = allocator.allocate(0.0, 0.1, &flows(&[2, 0, 2]));
        assert_approx_eq!(f32, nodes[1].bounds().height(), 0.02, epsilon = 1e-6);
    }

    #[test]
    fn test_column_without_lines_has_flat_nodes() {
        let allocator = NodeAllocator::new(0.02, 0.05);
        let nodes = allocator.allocate(0.0, 0.1, &flows(&[0, 0]));
        assert!(nodes.iter().all(|node| node.bounds().height() == 0.0));
    }

    proptest! {
        #[test]
        fn prop_column_fills_unit_height(
            counts in prop::collection::vec(0usize..50, 1..8),
            min_height in 0.0f32..0.02,
            gap in 0.0f32..0.05,
        ) {
            prop_assume!(counts.iter().sum::<usize>() > 0);

            let allocator = NodeAllocator::new(min_height, gap);
            let nodes = allocator.allocate(0.0, 0.1, &flows(&counts));

            let heights: f32 = nodes.iter().map(|node| node.bounds().height()).sum();
            let gaps = (nodes.len() - 1) as f32 * gap;
            prop_assert!((heights + gaps - 1.0).abs() < 1e-4);

            for node in &nodes {
                prop_assert!(node.bounds().height() >= min_height - 1e-6);
            }
            for pair in nodes.windows(2) {
                prop_assert!(pair[0].bounds().min_y() >= pair[1].bounds().max_y() - 1e-6);
            }
        }
    }
}
