//! Geometric primitives for story map layout and containment inference.
//!
//! This module provides the immutable value types used to place diagram
//! nodes and to recover parent/child structure from geometry alone.
//!
//! # Overview
//!
//! - [`Position`] - A 2D coordinate in diagram space
//! - [`Size`] - Width and height dimensions
//! - [`Boundary`] - A rectangle anchored at its top-left corner
//!
//! # Coordinate System
//!
//! Storymap uses the same coordinate system as DrawIO:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! - **Origin**: Top-left corner at `(0, 0)`
//! - **X-axis**: Increases rightward
//! - **Y-axis**: Increases downward

/// A 2D point in diagram coordinate space.
///
/// # Examples
///
/// ```
/// # use storymap_core::geometry::Position;
/// let p1 = Position::new(10.0, 20.0);
/// let p2 = Position::new(5.0, 5.0);
///
/// let sum = p1.offset(p2.x(), p2.y());
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    x: f32,
    y: f32,
}

impl Position {
    /// Creates a new position with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate
    pub fn y(self) -> f32 {
        self.y
    }

    /// Returns a new position moved by the given deltas
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Orders positions in visual reading order: top to bottom, then left to right.
    pub fn reading_order(self, other: Position) -> std::cmp::Ordering {
        self.y
            .total_cmp(&other.y)
            .then_with(|| self.x.total_cmp(&other.x))
    }
}

/// Width and height of an element
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns a new Size with the maximum width and height between this size and another
    pub fn max(self, other: Size) -> Self {
        Self {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }
}

/// A rectangle described by its top-left corner and its size.
///
/// Boundaries are what the DrawIO `mxGeometry` element stores, so they are
/// kept in the same `(x, y, width, height)` form.
///
/// # Examples
///
/// ```
/// # use storymap_core::geometry::{Boundary, Position};
/// let epic = Boundary::new(0.0, 0.0, 200.0, 100.0);
/// let story = Boundary::new(20.0, 40.0, 50.0, 50.0);
///
/// assert!(epic.contains_position(story.center()));
/// assert_eq!(epic.bottom(), 100.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Boundary {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl Boundary {
    /// Creates a new boundary from its top-left corner and dimensions
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a new boundary from a top-left position and a size
    pub fn from_position(top_left: Position, size: Size) -> Self {
        Self::new(top_left.x, top_left.y, size.width, size.height)
    }

    /// Returns the left edge
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the top edge
    pub fn y(self) -> f32 {
        self.y
    }

    pub fn width(self) -> f32 {
        self.width
    }

    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns the right edge (`x + width`)
    pub fn right(self) -> f32 {
        self.x + self.width
    }

    /// Returns the bottom edge (`y + height`)
    pub fn bottom(self) -> f32 {
        self.y + self.height
    }

    /// Returns the top-left corner
    pub fn position(self) -> Position {
        Position::new(self.x, self.y)
    }

    pub fn size(self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Returns the center point of the boundary
    pub fn center(self) -> Position {
        Position::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Returns the area covered by the boundary
    pub fn area(self) -> f32 {
        self.width * self.height
    }

    /// Returns a copy of this boundary with a different top-left corner
    pub fn with_position(self, position: Position) -> Self {
        Self {
            x: position.x,
            y: position.y,
            ..self
        }
    }

    /// Returns a copy of this boundary with a different width
    pub fn with_width(self, width: f32) -> Self {
        Self { width, ..self }
    }

    /// Returns a copy of this boundary with a different height
    pub fn with_height(self, height: f32) -> Self {
        Self { height, ..self }
    }

    /// Moves the boundary by the given offset without changing its size
    pub fn translate(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Point-in-rectangle test, edges inclusive.
    ///
    /// This is the primitive used to infer parent/child containment when a
    /// diagram is loaded back from disk.
    pub fn contains_position(self, point: Position) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Returns true if `other` lies entirely inside this boundary, edges inclusive.
    pub fn contains_boundary(self, other: Boundary) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Returns true if the interiors of the two boundaries intersect.
    /// Boxes that only share an edge do not overlap.
    pub fn overlaps(self, other: Boundary) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Returns the smallest boundary covering both `self` and `other`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use storymap_core::geometry::Boundary;
    /// let header = Boundary::new(0.0, 0.0, 100.0, 30.0);
    /// let content = Boundary::new(10.0, 40.0, 120.0, 80.0);
    ///
    /// let combined = header.merge(content);
    /// assert_eq!(combined.x(), 0.0);
    /// assert_eq!(combined.width(), 130.0);
    /// assert_eq!(combined.height(), 120.0);
    /// ```
    pub fn merge(self, other: Boundary) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self::new(x, y, right - x, bottom - y)
    }
}
