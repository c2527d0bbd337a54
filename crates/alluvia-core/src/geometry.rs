//! Geometric primitives for chart layout.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in chart space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - A rectangle defined by minimum and maximum coordinates
//!
//! # Coordinate System
//!
//! The layout engine works in the unit square, with the origin in the
//! bottom-left corner:
//!
//! ```text
//!    +Y
//!     ▲
//!   1 ┤
//!     │
//!     │
//!   0 └────────► +X
//!     0        1
//! ```
//!
//! - **X-axis**: Increases rightward, categories are laid out left to right
//! - **Y-axis**: Increases upward, so a line "above" another has a greater Y
//!
//! Exporters targeting screen coordinates flip the Y axis when mapping to pixels.

/// A 2D point in chart coordinate space.
///
/// # Examples
///
/// ```
/// # use alluvia_core::geometry::Point;
/// let p1 = Point::new(0.2, 0.4);
/// let p2 = Point::new(0.6, 0.8);
///
/// let mid = p1.lerp(p2, 0.5);
/// assert!((mid.x() - 0.4).abs() < 1e-6);
/// assert!((mid.y() - 0.6).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Creates a new point with the specified x-coordinate
    pub fn with_x(mut self, x: f32) -> Self {
        self.x = x;
        self
    }

    /// Linear interpolation towards `other`; `t = 0` is `self`, `t = 1` is `other`.
    pub fn lerp(self, other: Point, t: f32) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle with minimum and maximum coordinates.
///
/// In chart space `min_y` is the bottom edge and `max_y` the top edge.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates a new bounds from its minimum corner and a size.
    ///
    /// # Examples
    ///
    /// ```
    /// # use alluvia_core::geometry::{Bounds, Point, Size};
    /// let node = Bounds::new_from_min_point(Point::new(0.0, 0.25), Size::new(0.1, 0.5));
    /// assert_eq!(node.max_y(), 0.75);
    /// assert_eq!(node.center().x(), 0.05);
    /// ```
    pub fn new_from_min_point(min: Point, size: Size) -> Self {
        Self {
            min_x: min.x,
            min_y: min.y,
            max_x: min.x + size.width,
            max_y: min.y + size.height,
        }
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f32 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f32 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f32 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns the center point of the bounds
    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Merges two bounds to create a larger bounds that contains both.
    ///
    /// # Examples
    ///
    /// ```
    /// # use alluvia_core::geometry::{Bounds, Point, Size};
    /// let a = Bounds::new_from_min_point(Point::new(0.0, 0.0), Size::new(0.5, 0.5));
    /// let b = Bounds::new_from_min_point(Point::new(0.25, 0.25), Size::new(0.5, 0.5));
    ///
    /// let combined = a.merge(&b);
    /// assert_eq!(combined.width(), 0.75);
    /// assert_eq!(combined.height(), 0.75);
    /// ```
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}
