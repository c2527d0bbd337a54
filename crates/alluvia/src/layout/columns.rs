//! Horizontal placement of category columns and line runs.

use crate::config::LayoutConfig;

/// X positions of the node columns.
///
/// `nodes_x_share` of the unit width is split evenly between the node
/// columns; the rest is split evenly between the gaps separating them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Columns {
    count: usize,
    node_width: f32,
    gap: f32,
}

impl Columns {
    pub fn new(count: usize, nodes_x_share: f32) -> Self {
        let count = count.max(1);
        let gap = if count > 1 {
            (1.0 - nodes_x_share) / (count - 1) as f32
        } else {
            0.0
        };
        Self {
            count,
            node_width: nodes_x_share / count as f32,
            gap,
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Left edge of the column at `index`.
    pub fn x(&self, index: usize) -> f32 {
        index as f32 * (self.node_width + self.gap)
    }

    pub fn node_width(&self) -> f32 {
        self.node_width
    }

    /// Horizontal gap between adjacent columns.
    pub fn gap(&self) -> f32 {
        self.gap
    }

    /// Horizontal extent of the straight line runs drawn in column `index`.
    ///
    /// Inner columns overhang their nodes by half of `line_overhang` on each
    /// side. The outermost columns collapse onto the node edge facing the
    /// chart, or reach the node midpoint when `extend_lines_into_outer_nodes`
    /// is set; with line ids shown, the leftmost run instead overhangs by the
    /// full `line_overhang` to meet the id connectors.
    pub fn line_span(&self, index: usize, config: &LayoutConfig) -> LineSpan {
        let node_left = self.x(index);
        let node_right = node_left + self.node_width;
        let mid = (node_left + node_right) / 2.0;

        let is_first = index == 0;
        let is_last = index + 1 == self.count;

        let (mut left, mut right) = (node_left, node_right);
        if is_first {
            left = if config.show_line_ids() {
                node_left - config.line_overhang()
            } else if config.extend_lines_into_outer_nodes() {
                mid
            } else {
                node_right
            };
        }
        if is_last {
            right = if config.extend_lines_into_outer_nodes() {
                mid
            } else {
                node_left
            };
        }
        if !is_first && !is_last {
            left -= config.line_overhang() / 2.0;
            right += config.line_overhang() / 2.0;
        }

        // A lone column is both first and last.
        if left > right {
            LineSpan::new(right, left)
        } else {
            LineSpan::new(left, right)
        }
    }
}

/// Left and right X of a straight line run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSpan {
    left: f32,
    right: f32,
}

impl LineSpan {
    pub fn new(left: f32, right: f32) -> Self {
        Self { left, right }
    }

    pub fn left(&self) -> f32 {
        self.left
    }

    pub fn right(&self) -> f32 {
        self.right
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_column_positions() {
        let columns = Columns::new(3, 0.3);
        assert_eq!(columns.count(), 3);
        assert_approx_eq!(f32, columns.node_width(), 0.1, epsilon = 1e-6);
        assert_approx_eq!(f32, columns.gap(), 0.35, epsilon = 1e-6);
        assert_approx_eq!(f32, columns.x(0), 0.0);
        assert_approx_eq!(f32, columns.x(1), 0.45, epsilon = 1e-6);
        assert_approx_eq!(f32, columns.x(2) + columns.node_width(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_single_column() {
        let columns = Columns::new(1, 0.3);
        assert_eq!(columns.gap(), 0.0);
        assert_approx_eq!(f32, columns.node_width(), 0.3, epsilon = 1e-6);
        assert_eq!(columns.x(0), 0.0);

        let span = columns.line_span(0, &LayoutConfig::default());
        assert!(span.left() <= span.right());
    }

    #[test]
    fn test_outer_spans_collapse_onto_inner_edges() {
        let columns = Columns::new(3, 0.3);
        let config = LayoutConfig::default();

        let first = columns.line_span(0, &config);
        assert_approx_eq!(f32, first.left(), 0.1, epsilon = 1e-6);
        assert_approx_eq!(f32, first.right(), 0.1, epsilon = 1e-6);

        let last = columns.line_span(2, &config);
        assert_approx_eq!(f32, last.left(), 0.9, epsilon = 1e-6);
        assert_approx_eq!(f32, last.right(), 0.9, epsilon = 1e-6);
    }

    #[test]
    fn test_inner_span_overhangs_both_sides() {
        let columns = Columns::new(3, 0.3);
        let span = columns.line_span(1, &LayoutConfig::default());
        assert_approx_eq!(f32, span.left(), 0.425, epsilon = 1e-6);
        assert_approx_eq!(f32, span.right(), 0.575, epsilon = 1e-6);
    }

    #[test]
    fn test_extend_into_outer_nodes() {
        let columns = Columns::new(2, 0.2);
        let config = LayoutConfig::default().with_extend_lines_into_outer_nodes(true);

        let first = columns.line_span(0, &config);
        assert_approx_eq!(f32, first.left(), 0.05, epsilon = 1e-6);
        assert_approx_eq!(f32, first.right(), 0.1, epsilon = 1e-6);

        let last = columns.line_span(1, &config);
        assert_approx_eq!(f32, last.left(), 0.9, epsilon = 1e-6);
        assert_approx_eq!(f32, last.right(), 0.95, epsilon = 1e-6);
    }

    #[test]
    fn test_line_ids_extend_first_span_left() {
        let columns = Columns::new(2, 0.2);
        let config = LayoutConfig::default().with_show_line_ids(true);
        let first = columns.line_span(0, &config);
        assert_approx_eq!(f32, first.left(), -0.05, epsilon = 1e-6);
        assert_approx_eq!(f32, first.right(), 0.1, epsilon = 1e-6);
    }
}
