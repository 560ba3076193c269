//! Geometry kernel: points, segments, and rectangle handles in world space.
//!
//! Everything here is pure and allocation-free. Degenerate inputs (parallel
//! or collinear segments, zero-length segments) produce `None` or a
//! well-defined fallback rather than an error, because they come up
//! constantly while the user is mid-drag.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A point in either screen or world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Point at `dist` along direction `angle` (radians, 0 = +x).
    #[must_use]
    pub fn offset_polar(self, angle: f64, dist: f64) -> Point {
        Point::new(self.x + angle.cos() * dist, self.y + angle.sin() * dist)
    }

    /// Angle of the vector from `self` to `other`, in radians.
    #[must_use]
    pub fn angle_to(self, other: Point) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// Midpoint between `self` and `other`.
    #[must_use]
    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A line segment between two world points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub a: Point,
    pub b: Point,
}

impl Segment {
    #[must_use]
    pub fn new(a: Point, b: Point) -> Self {
        Self { a, b }
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.a.distance(self.b)
    }
}

/// Intersection of segment `p0`-`p1` with segment `p2`-`p3`.
///
/// Both segments are parametrized from their first endpoint. Returns `None`
/// when the direction vectors are parallel (zero cross product, which also
/// covers collinear and zero-length inputs) or when either parameter falls
/// outside `[0, 1]`.
#[must_use]
pub fn segment_intersection(p0: Point, p1: Point, p2: Point, p3: Point) -> Option<Point> {
    let s1 = p1 - p0;
    let s2 = p3 - p2;

    let d = -s2.x * s1.y + s1.x * s2.y;
    if d == 0.0 || !d.is_finite() {
        return None;
    }

    let s = (-s1.y * (p0.x - p2.x) + s1.x * (p0.y - p2.y)) / d;
    let t = (s2.x * (p0.y - p2.y) - s2.y * (p0.x - p2.x)) / d;

    if (0.0..=1.0).contains(&s) && (0.0..=1.0).contains(&t) {
        Some(Point::new(p0.x + t * s1.x, p0.y + t * s1.y))
    } else {
        None
    }
}

/// Shortest distance from `p` to segment `a`-`b`.
///
/// The projection parameter is clamped to `[0, 1]`, so points beyond either
/// end measure to that endpoint. A zero-length segment measures to `a`.
#[must_use]
pub fn distance_point_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let l2 = (a.x - b.x).powi(2) + (a.y - b.y).powi(2);
    if l2 == 0.0 {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * (b.x - a.x) + (p.y - a.y) * (b.y - a.y)) / l2).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y));
    p.distance(proj)
}

/// A rectangle corner, used to name resize handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// All corners in hit-test priority order.
    pub const ALL: [Corner; 4] = [Corner::TopLeft, Corner::TopRight, Corner::BottomLeft, Corner::BottomRight];

    /// The diagonally opposite corner.
    #[must_use]
    pub fn opposite(self) -> Corner {
        match self {
            Corner::TopLeft => Corner::BottomRight,
            Corner::TopRight => Corner::BottomLeft,
            Corner::BottomLeft => Corner::TopRight,
            Corner::BottomRight => Corner::TopLeft,
        }
    }
}

/// The four corner points of a rectangle in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectHandles {
    pub tl: Point,
    pub tr: Point,
    pub bl: Point,
    pub br: Point,
}

impl RectHandles {
    #[must_use]
    pub fn get(&self, corner: Corner) -> Point {
        match corner {
            Corner::TopLeft => self.tl,
            Corner::TopRight => self.tr,
            Corner::BottomLeft => self.bl,
            Corner::BottomRight => self.br,
        }
    }

    /// Corner/point pairs in hit-test priority order.
    pub fn iter(&self) -> impl Iterator<Item = (Corner, Point)> + '_ {
        Corner::ALL.into_iter().map(|c| (c, self.get(c)))
    }
}

/// Corner points of the rectangle at (`x`, `y`) with size `w` x `h`.
///
/// Width and height may be negative mid-resize; corners are named by their
/// role in the stored rectangle, not by their on-screen position.
#[must_use]
pub fn rectangle_handles(x: f64, y: f64, w: f64, h: f64) -> RectHandles {
    RectHandles {
        tl: Point::new(x, y),
        tr: Point::new(x + w, y),
        bl: Point::new(x, y + h),
        br: Point::new(x + w, y + h),
    }
}

/// Normalize `angle` relative to `reference` into `(-π, π]`.
#[must_use]
pub fn angle_delta(angle: f64, reference: f64) -> f64 {
    use std::f64::consts::{PI, TAU};

    let mut delta = (angle - reference).rem_euclid(TAU);
    if delta > PI {
        delta -= TAU;
    }
    delta
}
