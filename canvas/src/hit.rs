//! Hit-testing against selection handles and object bodies.
//!
//! All slop distances are screen-constant: they are divided by the viewport
//! scale before being compared with world-space distances.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::{CAMERA_HIT_RADIUS_PX, HANDLE_SIZE_PX, ROTATE_HANDLE_HIT_PX, ROTATE_HANDLE_OFFSET_PX, SEGMENT_HIT_PX};
use crate::doc::{CameraShape, Floor, ObjectId, SceneObject, Shape, TextShape};
use crate::geom::{Corner, Point, distance_point_to_segment};
use crate::viewport::Viewport;

/// Which part of an object was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle(Corner),
    RotateHandle,
}

/// Result of a hit test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub object_id: ObjectId,
    pub part: HitPart,
}

/// Measures rendered text so text objects get an accurate hit box.
pub trait TextMeasure {
    /// Width in world units of `text` drawn at `size` pixels.
    fn text_width(&self, text: &str, size: f64) -> f64;
}

/// Fixed-advance estimate used when no font metrics are available.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproxTextMeasure;

/// Average glyph advance as a fraction of the font size.
const APPROX_ADVANCE: f64 = 0.6;

impl TextMeasure for ApproxTextMeasure {
    #[allow(clippy::cast_precision_loss)]
    fn text_width(&self, text: &str, size: f64) -> f64 {
        text.chars().count() as f64 * size * APPROX_ADVANCE
    }
}

/// Top-left and bottom-right of a text object's box.
#[must_use]
pub fn text_box(text: &TextShape, measure: &dyn TextMeasure) -> (Point, Point) {
    let width = measure.text_width(&text.content, text.size);
    (Point::new(text.x, text.y), Point::new(text.x + width, text.y + text.size))
}

/// Where a camera's rotate handle sits at the given viewport scale.
#[must_use]
pub fn rotate_handle_position(camera: &CameraShape, scale: f64) -> Point {
    camera.position().offset_polar(camera.rotation, ROTATE_HANDLE_OFFSET_PX / scale)
}

/// Handle of the selected object under `world`, if any.
///
/// Cameras expose a rotate handle; rectangles expose four corner handles,
/// tested in [`Corner::ALL`] order.
#[must_use]
pub fn handle_at(world: Point, selected: &SceneObject, viewport: &Viewport) -> Option<HitPart> {
    match &selected.shape {
        Shape::Camera(cam) => {
            let handle = rotate_handle_position(cam, viewport.scale);
            (world.distance(handle) <= viewport.screen_dist_to_world(ROTATE_HANDLE_HIT_PX)).then_some(HitPart::RotateHandle)
        }
        Shape::Rect(rect) => {
            let radius = viewport.screen_dist_to_world(HANDLE_SIZE_PX);
            let handles = rect.handles();
            handles
                .iter()
                .find(|(_, p)| world.distance(*p) <= radius)
                .map(|(corner, _)| HitPart::ResizeHandle(corner))
        }
        Shape::Segment(_) | Shape::Text(_) => None,
    }
}

/// Whether `world` falls on the body of `obj`.
#[must_use]
pub fn object_contains(obj: &SceneObject, world: Point, viewport: &Viewport, measure: &dyn TextMeasure) -> bool {
    match &obj.shape {
        Shape::Camera(cam) => world.distance(cam.position()) < viewport.screen_dist_to_world(CAMERA_HIT_RADIUS_PX),
        Shape::Rect(rect) => rect.contains(world),
        Shape::Segment(seg) => {
            distance_point_to_segment(world, seg.a(), seg.b()) < viewport.screen_dist_to_world(SEGMENT_HIT_PX)
        }
        Shape::Text(text) => {
            let (min, max) = text_box(text, measure);
            world.x >= min.x && world.x <= max.x && world.y >= min.y && world.y <= max.y
        }
    }
}

/// Topmost object on the active layer under `world`.
///
/// Only the active layer is searched, and only while it is visible. Later
/// objects are drawn on top and therefore win.
#[must_use]
pub fn object_at<'a>(
    world: Point,
    floor: &'a Floor,
    viewport: &Viewport,
    measure: &dyn TextMeasure,
) -> Option<&'a SceneObject> {
    let layer = floor.active_layer().filter(|l| l.visible)?;
    layer.objects.iter().rev().find(|obj| object_contains(obj, world, viewport, measure))
}

/// Resolve what a select-tool press at `world` would grab.
///
/// Handles of the current selection take priority over every object body.
#[must_use]
pub fn hit_test(
    world: Point,
    floor: &Floor,
    viewport: &Viewport,
    selected: Option<&SceneObject>,
    measure: &dyn TextMeasure,
) -> Option<Hit> {
    if let Some(sel) = selected {
        if let Some(part) = handle_at(world, sel, viewport) {
            return Some(Hit { object_id: sel.id.clone(), part });
        }
    }
    object_at(world, floor, viewport, measure).map(|obj| Hit { object_id: obj.id.clone(), part: HitPart::Body })
}
