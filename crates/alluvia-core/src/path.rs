//! Path segments and the flow paths assembled from them.
//!
//! A line in an alluvial chart is drawn as a chain of [`PathSegment`]s: a
//! horizontal straight run across each category column and a cubic Bezier
//! connector across every gap between columns. [`FlowPath`] collects the
//! segments of one line and samples them into a single polyline.

use crate::{geometry::Point, identifier::Id};

/// Default sampling resolution, in points per unit of X.
pub const DEFAULT_SAMPLES_PER_UNIT: usize = 100;

/// The shape of a [`PathSegment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Linear interpolation between the endpoints.
    Straight,
    /// Cubic Bezier leaving the start horizontally and arriving at the finish horizontally.
    Curved,
}

/// An immutable geometric primitive between two points.
///
/// Endpoints are stored left to right: constructing a segment whose finish
/// lies left of its start swaps them.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSegment {
    kind: SegmentKind,
    start: Point,
    finish: Point,
    name: String,
}

impl PathSegment {
    fn new(kind: SegmentKind, start: Point, finish: Point, name: String) -> Self {
        let (start, finish) = if finish.x() < start.x() {
            (finish, start)
        } else {
            (start, finish)
        };
        Self {
            kind,
            start,
            finish,
            name,
        }
    }

    /// Creates a straight segment.
    pub fn straight(start: Point, finish: Point, name: impl Into<String>) -> Self {
        Self::new(SegmentKind::Straight, start, finish, name.into())
    }

    /// Creates a curved connector.
    ///
    /// # Examples
    ///
    /// ```
    /// use alluvia_core::{geometry::Point, path::PathSegment};
    ///
    /// // Endpoints given right-to-left are normalised.
    /// let segment = PathSegment::curved(Point::new(0.6, 0.2), Point::new(0.4, 0.8), "B_b1_1");
    /// assert_eq!(segment.start(), Point::new(0.4, 0.8));
    /// assert_eq!(segment.finish(), Point::new(0.6, 0.2));
    /// ```
    pub fn curved(start: Point, finish: Point, name: impl Into<String>) -> Self {
        Self::new(SegmentKind::Curved, start, finish, name.into())
    }

    pub fn kind(&self) -> SegmentKind {
        self.kind
    }

    /// Returns the left endpoint
    pub fn start(&self) -> Point {
        self.start
    }

    /// Returns the right endpoint
    pub fn finish(&self) -> Point {
        self.finish
    }

    /// Returns the segment name, `{category}_{node}_{line}` or `id_{line}`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the two Bezier control points of a curved segment.
    ///
    /// Both sit at the horizontal midpoint; the first at the start's height
    /// and the second at the finish's height.
    pub fn control_points(&self) -> (Point, Point) {
        let mid_x = self.start.x() + (self.finish.x() - self.start.x()) / 2.0;
        (
            Point::new(mid_x, self.start.y()),
            Point::new(mid_x, self.finish.y()),
        )
    }

    /// Evaluates the segment at parameter `t` in `[0, 1]`.
    pub fn point_at(&self, t: f32) -> Point {
        match self.kind {
            SegmentKind::Straight => self.start.lerp(self.finish, t),
            SegmentKind::Curved => {
                let (c1, c2) = self.control_points();
                let u = 1.0 - t;
                let b0 = u * u * u;
                let b1 = 3.0 * u * u * t;
                let b2 = 3.0 * u * t * t;
                let b3 = t * t * t;
                Point::new(
                    b0 * self.start.x() + b1 * c1.x() + b2 * c2.x() + b3 * self.finish.x(),
                    b0 * self.start.y() + b1 * c1.y() + b2 * c2.y() + b3 * self.finish.y(),
                )
            }
        }
    }

    /// Number of sample points for the given resolution, never fewer than two.
    pub fn sample_count(&self, samples_per_unit: usize) -> usize {
        let span = (self.finish.x() - self.start.x()).abs();
        ((span * samples_per_unit as f32) as usize).max(2)
    }

    /// Samples the segment at evenly spaced parameter values, endpoints included.
    pub fn sample(&self, samples_per_unit: usize) -> Vec<Point> {
        let count = self.sample_count(samples_per_unit);
        let last = (count - 1) as f32;
        (0..count)
            .map(|i| self.point_at(i as f32 / last))
            .collect()
    }
}

/// All segments of one line, in the order the sweep emitted them.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowPath {
    id: Id,
    segments: Vec<PathSegment>,
}

impl FlowPath {
    pub fn new(id: Id) -> Self {
        Self {
            id,
            segments: Vec::new(),
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Samples every segment into one polyline.
    ///
    /// Points are sorted by X (then Y) and exact duplicates removed, so shared
    /// segment endpoints appear once and X never decreases along the result.
    pub fn points(&self, samples_per_unit: usize) -> Vec<Point> {
        let mut points: Vec<Point> = self
            .segments
            .iter()
            .flat_map(|segment| segment.sample(samples_per_unit))
            .collect();
        points.sort_by(|a, b| a.x().total_cmp(&b.x()).then(a.y().total_cmp(&b.y())));
        points.dedup();
        points
    }
}
