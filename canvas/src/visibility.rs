//! Camera coverage by angular ray casting.
//!
//! A camera's coverage is approximated as a triangle fan rooted at the
//! camera. Rays are cast at a uniform 2° sweep across the field of view plus
//! a bracketing triple of rays at every occluder endpoint, so shadow edges
//! land exactly on the corner that casts them. Each ray stops at the nearest
//! occluder or at the camera's range.
//!
//! Occluders are rectangle edges and wall segments. Wiring never occludes.

#[cfg(test)]
#[path = "visibility_test.rs"]
mod visibility_test;

use crate::consts::{FOV_FILTER_EPSILON, FOV_SWEEP_STEP_DEG, SILHOUETTE_EPSILON};
use crate::doc::{CameraShape, Floor, ObjectId, SceneObject, SegmentKind, Shape};
use crate::geom::{Point, Segment, angle_delta, segment_intersection};

/// Fan polygon for one camera: `origin` followed by `vertices` in angular
/// order, implicitly closed back to `origin`.
#[derive(Debug, Clone, PartialEq)]
pub struct CoveragePolygon {
    pub origin: Point,
    pub vertices: Vec<Point>,
}

impl CoveragePolygon {
    /// Outline points in paint order, starting at the camera.
    pub fn outline(&self) -> impl Iterator<Item = Point> + '_ {
        std::iter::once(self.origin).chain(self.vertices.iter().copied())
    }
}

/// Occluding segments among `objects`, skipping the object with id `exclude`.
pub fn occluders<'a>(objects: impl IntoIterator<Item = &'a SceneObject>, exclude: Option<&str>) -> Vec<Segment> {
    let mut out = Vec::new();
    for obj in objects {
        if exclude == Some(obj.id.as_str()) {
            continue;
        }
        match &obj.shape {
            Shape::Rect(r) => out.extend(r.edges()),
            Shape::Segment(s) if s.kind == SegmentKind::Wall => out.push(s.as_segment()),
            _ => {}
        }
    }
    out
}

/// Ray angles to cast for `camera`, ascending.
///
/// Angles are expressed as `rotation + delta` with `delta` in `(-π, π]`, so a
/// field of view straddling ±π still sorts into one contiguous run.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn candidate_angles(camera: &CameraShape, occluders: &[Segment]) -> Vec<f64> {
    let fov = camera.fov_radians();
    let half = fov / 2.0;
    let start = camera.rotation - half;

    // Stepped in degrees so whole multiples of the step land exactly on the far edge.
    let steps = (camera.fov / FOV_SWEEP_STEP_DEG).floor().max(0.0);
    let mut raw: Vec<f64> = (0..=steps as usize)
        .map(|i| start + (i as f64 * FOV_SWEEP_STEP_DEG).to_radians())
        .collect();
    if camera.fov - steps * FOV_SWEEP_STEP_DEG > 1e-9 {
        raw.push(start + fov);
    }

    let origin = camera.position();
    for seg in occluders {
        for p in [seg.a, seg.b] {
            let angle = origin.angle_to(p);
            raw.extend([angle - SILHOUETTE_EPSILON, angle, angle + SILHOUETTE_EPSILON]);
        }
    }

    let mut angles: Vec<f64> = raw
        .into_iter()
        .map(|angle| angle_delta(angle, camera.rotation))
        .filter(|delta| delta.abs() <= half + FOV_FILTER_EPSILON)
        .map(|delta| camera.rotation + delta)
        .collect();
    angles.sort_by(f64::total_cmp);
    angles
}

/// Endpoint of a ray from `origin` at `angle`: the nearest occluder hit, or
/// the point at `range` when nothing is in the way.
#[must_use]
pub fn cast_ray(origin: Point, angle: f64, range: f64, occluders: &[Segment]) -> Point {
    let end = origin.offset_polar(angle, range);
    let mut best = end;
    let mut best_dist = range;
    for seg in occluders {
        if let Some(hit) = segment_intersection(origin, end, seg.a, seg.b) {
            let dist = origin.distance(hit);
            if dist < best_dist {
                best = hit;
                best_dist = dist;
            }
        }
    }
    best
}

/// Coverage polygon for `camera` against `occluders`. `None` when fewer than
/// two rays survive.
#[must_use]
pub fn coverage_polygon(camera: &CameraShape, occluders: &[Segment]) -> Option<CoveragePolygon> {
    let origin = camera.position();
    let vertices: Vec<Point> = candidate_angles(camera, occluders)
        .into_iter()
        .map(|angle| cast_ray(origin, angle, camera.range, occluders))
        .collect();
    if vertices.len() < 2 {
        return None;
    }
    Some(CoveragePolygon { origin, vertices })
}

/// Coverage for every camera on the floor's visible layers, in draw order.
#[must_use]
pub fn floor_coverage(floor: &Floor) -> Vec<(ObjectId, CoveragePolygon)> {
    // Cameras never occlude, so one occluder set serves every camera.
    let blockers = occluders(floor.visible_objects(), None);
    floor
        .visible_objects()
        .filter_map(|obj| {
            let camera = obj.as_camera()?;
            coverage_polygon(camera, &blockers).map(|poly| (obj.id.clone(), poly))
        })
        .collect()
}
