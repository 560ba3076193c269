//! Rendering: draws the scene through a [`Painter`].
//!
//! The painter is the only thing that touches pixels. This module receives
//! read-only views of the floor, viewport and gesture state and issues draw
//! calls in a fixed order; it never mutates application state and is safe to
//! call once per animation frame.
//!
//! Fallible painter calls propagate through `Result<(), P::Error>`. The
//! browser binding lives in [`crate::web`].

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::consts::{
    CAMERA_HIT_RADIUS_PX, HANDLE_SIZE_PX, MEASUREMENT_FONT_PX, ROTATE_HANDLE_RADIUS_PX, SELECTION_DASH_PX,
    SELECTION_PADDING_PX,
};
use crate::doc::{Background, CameraKind, Floor, RectShape, SceneObject, SegmentKind, SegmentShape, Shape, TextShape};
use crate::export::ExportRequest;
use crate::geom::Point;
use crate::hit::{TextMeasure, rotate_handle_position, text_box};
use crate::measure::{Measurement, measurements};
use crate::viewport::Viewport;
use crate::visibility::{CoveragePolygon, floor_coverage};

const RECT_STROKE: &str = "#0ea5e9";
const RECT_LINE_WIDTH: f64 = 2.0;
const WALL_STROKE: &str = "#374151";
const WALL_LINE_WIDTH: f64 = 3.0;
const WIRING_STROKE: &str = "#dc2626";
const WIRING_LINE_WIDTH: f64 = 2.0;
const WIRING_DASH: f64 = 5.0;
const TEXT_FILL: &str = "#1f2937";
const LABEL_FILL: &str = "#374151";
const COVERAGE_FILL: &str = "rgba(255, 193, 7, 0.3)";
const SELECTION_COLOR: &str = "#f59e0b";
const PREVIEW_FILL: &str = "rgba(59, 130, 246, 0.3)";
const PREVIEW_STROKE: &str = "#3b82f6";
const EXPORT_FILL: &str = "white";

/// Where a text string is anchored relative to its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    /// Object text: position is the top-left of the glyph box.
    TopLeft,
    /// Dimension labels: position is the bottom-center of the baseline.
    BottomCenter,
}

/// The drawing surface the renderer needs. Mirrors a 2D canvas context.
pub trait Painter {
    type Error;
    /// Host image type for backgrounds.
    type Image;

    fn save(&mut self);
    fn restore(&mut self);
    /// Replace the current transform with `scale` followed by a translation.
    fn set_transform(&mut self, scale: f64, dx: f64, dy: f64) -> Result<(), Self::Error>;
    fn translate(&mut self, dx: f64, dy: f64) -> Result<(), Self::Error>;
    fn rotate(&mut self, angle: f64) -> Result<(), Self::Error>;
    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64);

    fn set_fill_style(&mut self, color: &str);
    fn set_stroke_style(&mut self, color: &str);
    fn set_line_width(&mut self, width: f64);
    /// Empty slice turns dashing off.
    fn set_line_dash(&mut self, segments: &[f64]) -> Result<(), Self::Error>;

    fn begin_path(&mut self);
    fn move_to(&mut self, p: Point);
    fn line_to(&mut self, p: Point);
    /// Full circle.
    fn circle(&mut self, center: Point, radius: f64) -> Result<(), Self::Error>;
    fn close_path(&mut self);
    fn fill(&mut self);
    fn stroke(&mut self);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64);

    fn fill_text(&mut self, text: &str, at: Point, font_px: f64, anchor: TextAnchor) -> Result<(), Self::Error>;
    /// Draw `image` at its natural size with its top-left at `at`.
    fn draw_image(&mut self, image: &Self::Image, at: Point) -> Result<(), Self::Error>;
    /// Camera glyph centered on `at`, pointing along `rotation`.
    fn draw_camera_icon(&mut self, kind: CameraKind, at: Point, rotation: f64) -> Result<(), Self::Error>;
}

/// Read-only view of everything one frame draws.
pub struct Scene<'a, I> {
    pub floor: &'a Floor,
    pub viewport: &'a Viewport,
    /// Selected object, already re-resolved against the current project.
    pub selected: Option<&'a SceneObject>,
    /// Shape being dragged out by a drawing tool.
    pub preview: Option<&'a Shape>,
    /// Decoded background, present only when the image cache reports it ready.
    pub background: Option<&'a I>,
    pub measure: &'a dyn TextMeasure,
    /// Surface size in screen pixels.
    pub width: f64,
    pub height: f64,
}

/// Draw the full scene.
///
/// Order: background, coverage polygons, objects layer by layer, selection
/// outline and handles, drawing preview.
///
/// # Errors
///
/// Returns the first painter error.
pub fn draw<P: Painter>(p: &mut P, scene: &Scene<'_, P::Image>) -> Result<(), P::Error> {
    let scale = scene.viewport.scale;

    // Layer 1: clear and set up the view transform.
    p.set_transform(1.0, 0.0, 0.0)?;
    p.clear_rect(0.0, 0.0, scene.width, scene.height);
    p.save();
    p.set_transform(scale, scene.viewport.offset_x, scene.viewport.offset_y)?;

    // Layer 2: background page.
    if let (Some(bg), Some(image)) = (&scene.floor.background, scene.background) {
        draw_background(p, bg, image)?;
    }

    // Layer 3: camera coverage.
    for (_, poly) in floor_coverage(scene.floor) {
        draw_coverage(p, &poly);
    }

    // Layer 4: objects, bottom layer first.
    for obj in scene.floor.visible_objects() {
        draw_object(p, &obj.shape, scale)?;
    }

    // Layer 5: selection UI.
    if let Some(sel) = scene.selected {
        draw_selection(p, sel, scale, scene.measure)?;
    }

    // Layer 6: in-progress drawing.
    if let Some(shape) = scene.preview {
        draw_preview(p, shape, scale)?;
    }

    p.restore();
    Ok(())
}

/// Paint an export request onto a surface sized to its padded bounds.
///
/// Objects are drawn at unit scale without coverage or selection UI.
///
/// # Errors
///
/// Returns the first painter error.
pub fn draw_export<P: Painter>(p: &mut P, req: &ExportRequest, background: Option<&P::Image>) -> Result<(), P::Error> {
    let (w, h) = (req.bounds.width(), req.bounds.height());
    p.set_transform(1.0, 0.0, 0.0)?;
    p.set_fill_style(EXPORT_FILL);
    p.fill_rect(0.0, 0.0, w, h);

    p.save();
    let origin = req.bounds.origin();
    p.translate(-origin.x, -origin.y)?;
    if let (Some(bg), Some(image)) = (&req.background, background) {
        draw_background(p, bg, image)?;
    }
    for obj in &req.objects {
        draw_object(p, &obj.shape, 1.0)?;
    }
    p.restore();
    Ok(())
}

// =============================================================
// Scene layers
// =============================================================

fn draw_background<P: Painter>(p: &mut P, bg: &Background, image: &P::Image) -> Result<(), P::Error> {
    p.draw_image(image, Point::new(bg.x, bg.y))
}

fn draw_coverage<P: Painter>(p: &mut P, poly: &CoveragePolygon) {
    p.save();
    p.set_fill_style(COVERAGE_FILL);
    p.begin_path();
    let mut points = poly.outline();
    if let Some(first) = points.next() {
        p.move_to(first);
    }
    for pt in points {
        p.line_to(pt);
    }
    p.close_path();
    p.fill();
    p.restore();
}

fn draw_object<P: Painter>(p: &mut P, shape: &Shape, scale: f64) -> Result<(), P::Error> {
    match shape {
        Shape::Rect(r) => draw_rect(p, r),
        Shape::Segment(s) => draw_segment(p, s)?,
        Shape::Text(t) => draw_text(p, t)?,
        Shape::Camera(c) => p.draw_camera_icon(c.kind, c.position(), c.rotation)?,
    }
    for m in measurements(shape) {
        draw_measurement(p, &m, scale)?;
    }
    Ok(())
}

fn draw_rect<P: Painter>(p: &mut P, r: &RectShape) {
    p.save();
    p.set_stroke_style(RECT_STROKE);
    p.set_line_width(RECT_LINE_WIDTH);
    p.stroke_rect(r.x, r.y, r.w, r.h);
    p.restore();
}

fn draw_segment<P: Painter>(p: &mut P, s: &SegmentShape) -> Result<(), P::Error> {
    p.save();
    match s.kind {
        SegmentKind::Wall => {
            p.set_stroke_style(WALL_STROKE);
            p.set_line_width(WALL_LINE_WIDTH);
        }
        SegmentKind::Wiring => {
            p.set_stroke_style(WIRING_STROKE);
            p.set_line_width(WIRING_LINE_WIDTH);
            p.set_line_dash(&[WIRING_DASH, WIRING_DASH])?;
        }
    }
    p.begin_path();
    p.move_to(s.a());
    p.line_to(s.b());
    p.stroke();
    p.restore();
    Ok(())
}

fn draw_text<P: Painter>(p: &mut P, t: &TextShape) -> Result<(), P::Error> {
    p.save();
    p.set_fill_style(TEXT_FILL);
    p.fill_text(&t.content, Point::new(t.x, t.y), t.size, TextAnchor::TopLeft)?;
    p.restore();
    Ok(())
}

fn draw_measurement<P: Painter>(p: &mut P, m: &Measurement, scale: f64) -> Result<(), P::Error> {
    p.save();
    p.set_fill_style(LABEL_FILL);
    p.translate(m.anchor.x, m.anchor.y)?;
    p.rotate(m.angle)?;
    p.fill_text(&m.text, Point::new(0.0, 0.0), MEASUREMENT_FONT_PX / scale, TextAnchor::BottomCenter)?;
    p.restore();
    Ok(())
}

fn draw_selection<P: Painter>(
    p: &mut P,
    obj: &SceneObject,
    scale: f64,
    measure: &dyn TextMeasure,
) -> Result<(), P::Error> {
    let pad = SELECTION_PADDING_PX / scale;
    let dash = SELECTION_DASH_PX / scale;

    p.save();
    p.set_stroke_style(SELECTION_COLOR);
    p.set_fill_style(SELECTION_COLOR);
    p.set_line_width(1.0 / scale);
    p.set_line_dash(&[dash, dash])?;

    match &obj.shape {
        Shape::Rect(r) => {
            p.stroke_rect(r.x - pad, r.y - pad, r.w + pad * 2.0, r.h + pad * 2.0);
            p.set_line_dash(&[])?;
            let size = HANDLE_SIZE_PX / scale;
            for (_, h) in r.handles().iter() {
                p.fill_rect(h.x - size / 2.0, h.y - size / 2.0, size, size);
            }
        }
        Shape::Camera(c) => {
            p.begin_path();
            p.circle(c.position(), CAMERA_HIT_RADIUS_PX / scale)?;
            p.stroke();
            p.set_line_dash(&[])?;
            p.begin_path();
            p.circle(rotate_handle_position(c, scale), ROTATE_HANDLE_RADIUS_PX / scale)?;
            p.fill();
        }
        Shape::Segment(_) => {
            let (min, max) = obj.shape.bounds();
            stroke_padded_box(p, min, max, pad);
        }
        Shape::Text(t) => {
            let (min, max) = text_box(t, measure);
            stroke_padded_box(p, min, max, pad);
        }
    }

    p.restore();
    Ok(())
}

fn stroke_padded_box<P: Painter>(p: &mut P, min: Point, max: Point, pad: f64) {
    p.stroke_rect(min.x - pad, min.y - pad, max.x - min.x + pad * 2.0, max.y - min.y + pad * 2.0);
}

fn draw_preview<P: Painter>(p: &mut P, shape: &Shape, scale: f64) -> Result<(), P::Error> {
    match shape {
        Shape::Rect(r) => {
            p.save();
            p.set_fill_style(PREVIEW_FILL);
            p.set_stroke_style(PREVIEW_STROKE);
            p.set_line_width(RECT_LINE_WIDTH);
            p.fill_rect(r.x, r.y, r.w, r.h);
            p.stroke_rect(r.x, r.y, r.w, r.h);
            p.restore();
        }
        Shape::Segment(s) => draw_segment(p, s)?,
        Shape::Text(_) | Shape::Camera(_) => return Ok(()),
    }
    for m in measurements(shape) {
        draw_measurement(p, &m, scale)?;
    }
    Ok(())
}
