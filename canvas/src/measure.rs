//! Meter conversions, dimension labels, and the wiring budget.

#[cfg(test)]
#[path = "measure_test.rs"]
mod measure_test;

use std::f64::consts::{FRAC_PI_2, PI};

use crate::consts::{PIXELS_PER_METER, RECT_LABEL_OFFSET, SEGMENT_LABEL_OFFSET};
use crate::doc::{Floor, RectShape, SegmentKind, Shape};
use crate::geom::Point;

/// World units to meters.
#[must_use]
pub fn to_meters(world: f64) -> f64 {
    world / PIXELS_PER_METER
}

/// Dimension label text, one decimal: `"3.2 m"`.
#[must_use]
pub fn format_meters(world: f64) -> String {
    format!("{:.1} m", to_meters(world.abs()))
}

/// A dimension label placed in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// Bottom-center of the label.
    pub anchor: Point,
    pub text: String,
    /// Baseline direction in radians, already flipped so text never reads upside down.
    pub angle: f64,
}

fn readable_angle(angle: f64) -> f64 {
    if angle > FRAC_PI_2 {
        angle - PI
    } else if angle < -FRAC_PI_2 {
        angle + PI
    } else {
        angle
    }
}

/// Width label above and height label left of a rectangle.
#[must_use]
pub fn rect_measurements(rect: &RectShape) -> [Measurement; 2] {
    [
        Measurement {
            anchor: Point::new(rect.x + rect.w / 2.0, rect.y - RECT_LABEL_OFFSET),
            text: format_meters(rect.w),
            angle: 0.0,
        },
        Measurement {
            anchor: Point::new(rect.x - RECT_LABEL_OFFSET, rect.y + rect.h / 2.0),
            text: format_meters(rect.h),
            angle: -FRAC_PI_2,
        },
    ]
}

/// Length label along a segment, lifted above its midpoint.
#[must_use]
pub fn segment_measurement(a: Point, b: Point) -> Measurement {
    let mid = a.midpoint(b);
    Measurement {
        anchor: Point::new(mid.x, mid.y - SEGMENT_LABEL_OFFSET),
        text: format_meters(a.distance(b)),
        angle: readable_angle(a.angle_to(b)),
    }
}

/// Labels drawn alongside `shape`. Text and cameras have none.
#[must_use]
pub fn measurements(shape: &Shape) -> Vec<Measurement> {
    match shape {
        Shape::Rect(r) => rect_measurements(r).to_vec(),
        Shape::Segment(s) => vec![segment_measurement(s.a(), s.b())],
        Shape::Text(_) | Shape::Camera(_) => Vec::new(),
    }
}

/// Summed length of wiring segments on the floor's visible layers, in world units.
#[must_use]
pub fn total_wiring_length(floor: &Floor) -> f64 {
    floor
        .visible_objects()
        .filter_map(|obj| obj.as_segment())
        .filter(|s| s.kind == SegmentKind::Wiring)
        .map(|s| s.length())
        .sum()
}

/// Wiring budget in meters.
#[must_use]
pub fn wiring_meters(floor: &Floor) -> f64 {
    to_meters(total_wiring_length(floor))
}

/// Wiring budget label, two decimals: `"5.00 m"`.
#[must_use]
pub fn format_budget(meters: f64) -> String {
    format!("{meters:.2} m")
}
