//! Browser binding: a [`Painter`] over `CanvasRenderingContext2d` and the
//! [`Engine`] that owns the canvas element.
//!
//! Only compiled with the `web` feature. Everything here is a thin adapter;
//! behaviour lives in [`crate::engine::EngineCore`] and [`crate::render`].

use std::f64::consts::TAU;

use tracing::warn;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::background::{BackgroundError, ImageCache, ImageDecoder, ImageHandle, RasterizedPage};
use crate::doc::CameraKind;
use crate::engine::{Action, EngineCore};
use crate::export::ExportRequest;
use crate::geom::Point;
use crate::hit::{ApproxTextMeasure, TextMeasure};
use crate::input::{Button, Key, Modifiers, Tool, WheelDelta};
use crate::render::{Painter, Scene, TextAnchor, draw, draw_export};

const CAMERA_BODY: &str = "#1e3a8a";
const CAMERA_LENS: &str = "#93c5fd";
const FONT_FAMILY: &str = "sans-serif";

// =============================================================
// Painter
// =============================================================

/// Draws onto a 2D context. Transforms are pre-multiplied by the device
/// pixel ratio so callers work in CSS pixels.
pub struct WebPainter<'a> {
    ctx: &'a CanvasRenderingContext2d,
    dpr: f64,
}

impl<'a> WebPainter<'a> {
    #[must_use]
    pub fn new(ctx: &'a CanvasRenderingContext2d, dpr: f64) -> Self {
        Self { ctx, dpr }
    }
}

impl Painter for WebPainter<'_> {
    type Error = JsValue;
    type Image = HtmlImageElement;

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn set_transform(&mut self, scale: f64, dx: f64, dy: f64) -> Result<(), JsValue> {
        let s = scale * self.dpr;
        self.ctx.set_transform(s, 0.0, 0.0, s, dx * self.dpr, dy * self.dpr)
    }

    fn translate(&mut self, dx: f64, dy: f64) -> Result<(), JsValue> {
        self.ctx.translate(dx, dy)
    }

    fn rotate(&mut self, angle: f64) -> Result<(), JsValue> {
        self.ctx.rotate(angle)
    }

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.clear_rect(x, y, w, h);
    }

    fn set_fill_style(&mut self, color: &str) {
        self.ctx.set_fill_style_str(color);
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.ctx.set_stroke_style_str(color);
    }

    fn set_line_width(&mut self, width: f64) {
        self.ctx.set_line_width(width);
    }

    fn set_line_dash(&mut self, segments: &[f64]) -> Result<(), JsValue> {
        let dash_array = js_sys::Array::new();
        for s in segments {
            dash_array.push(&(*s).into());
        }
        self.ctx.set_line_dash(&dash_array)
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, p: Point) {
        self.ctx.move_to(p.x, p.y);
    }

    fn line_to(&mut self, p: Point) {
        self.ctx.line_to(p.x, p.y);
    }

    fn circle(&mut self, center: Point, radius: f64) -> Result<(), JsValue> {
        self.ctx.arc(center.x, center.y, radius, 0.0, TAU)
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn fill(&mut self) {
        self.ctx.fill();
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.fill_rect(x, y, w, h);
    }

    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.stroke_rect(x, y, w, h);
    }

    fn fill_text(&mut self, text: &str, at: Point, font_px: f64, anchor: TextAnchor) -> Result<(), JsValue> {
        let (align, baseline) = match anchor {
            TextAnchor::TopLeft => ("left", "top"),
            TextAnchor::BottomCenter => ("center", "bottom"),
        };
        self.ctx.set_text_align(align);
        self.ctx.set_text_baseline(baseline);
        self.ctx.set_font(&format!("{font_px}px {FONT_FAMILY}"));
        self.ctx.fill_text(text, at.x, at.y)
    }

    fn draw_image(&mut self, image: &HtmlImageElement, at: Point) -> Result<(), JsValue> {
        self.ctx.draw_image_with_html_image_element(image, at.x, at.y)
    }

    fn draw_camera_icon(&mut self, kind: CameraKind, at: Point, rotation: f64) -> Result<(), JsValue> {
        let ctx = self.ctx;
        ctx.save();
        ctx.translate(at.x, at.y)?;
        ctx.rotate(rotation)?;
        ctx.set_fill_style_str(CAMERA_BODY);
        match kind {
            CameraKind::Bullet => {
                // Body with the lens hood opening along +x.
                ctx.fill_rect(-10.0, -6.0, 14.0, 12.0);
                ctx.begin_path();
                ctx.move_to(4.0, -3.0);
                ctx.line_to(10.0, -6.0);
                ctx.line_to(10.0, 6.0);
                ctx.line_to(4.0, 3.0);
                ctx.close_path();
                ctx.fill();
            }
            CameraKind::Dome => {
                ctx.begin_path();
                ctx.arc(0.0, 0.0, 10.0, 0.0, TAU)?;
                ctx.fill();
                ctx.set_fill_style_str(CAMERA_LENS);
                ctx.begin_path();
                ctx.arc(4.0, 0.0, 3.0, 0.0, TAU)?;
                ctx.fill();
            }
        }
        ctx.restore();
        Ok(())
    }
}

// =============================================================
// Images and text metrics
// =============================================================

impl ImageHandle for HtmlImageElement {
    fn is_complete(&self) -> bool {
        self.complete()
    }
}

/// Decodes data URLs by handing them to an `<img>` element. Loading
/// completes asynchronously; the cache reports the image once it is ready.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlImageDecoder;

impl ImageDecoder for HtmlImageDecoder {
    type Image = HtmlImageElement;

    fn decode(&self, data: &str) -> Result<HtmlImageElement, BackgroundError> {
        let img = HtmlImageElement::new().map_err(|e| BackgroundError::Decode(format!("{e:?}")))?;
        img.set_src(data);
        Ok(img)
    }
}

/// Text metrics from the canvas font engine.
pub struct CanvasTextMeasure {
    ctx: CanvasRenderingContext2d,
}

impl CanvasTextMeasure {
    #[must_use]
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }
}

impl TextMeasure for CanvasTextMeasure {
    fn text_width(&self, text: &str, size: f64) -> f64 {
        self.ctx.save();
        self.ctx.set_font(&format!("{size}px {FONT_FAMILY}"));
        let width = match self.ctx.measure_text(text) {
            Ok(metrics) => metrics.width(),
            Err(_) => ApproxTextMeasure.text_width(text, size),
        };
        self.ctx.restore();
        width
    }
}

// =============================================================
// Engine
// =============================================================

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    pub core: EngineCore,
    images: ImageCache<HtmlImageElement>,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    ///
    /// # Errors
    ///
    /// Returns `Err` when the canvas has no 2D context.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        let core = EngineCore::with_measure(Box::new(CanvasTextMeasure::new(ctx.clone())));
        Ok(Self { canvas, ctx, core, images: ImageCache::new() })
    }

    // --- Viewport ---

    /// Update viewport dimensions and resize the backing store to match.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) -> Vec<Action> {
        self.canvas.set_width((width_css * dpr).round().max(0.0) as u32);
        self.canvas.set_height((height_css * dpr).round().max(0.0) as u32);
        self.core.set_viewport(width_css, height_css, dpr)
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_down(screen_pt, button, modifiers)
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_move(screen_pt, modifiers)
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_up(screen_pt, button, modifiers)
    }

    pub fn on_pointer_leave(&mut self, screen_pt: Point) -> Vec<Action> {
        self.core.on_pointer_leave(screen_pt)
    }

    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_wheel(screen_pt, delta, modifiers)
    }

    pub fn on_touch_start(&mut self, touches: &[Point]) -> Vec<Action> {
        self.core.on_touch_start(touches)
    }

    pub fn on_touch_move(&mut self, touches: &[Point]) -> Vec<Action> {
        self.core.on_touch_move(touches)
    }

    pub fn on_touch_end(&mut self, remaining: usize) -> Vec<Action> {
        self.core.on_touch_end(remaining)
    }

    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_key_down(key, modifiers)
    }

    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        self.core.set_tool(tool)
    }

    pub fn set_tool_named(&mut self, name: &str) -> Vec<Action> {
        self.core.set_tool_named(name)
    }

    // --- Background ---

    /// Import a rasterized page and start decoding it.
    ///
    /// # Errors
    ///
    /// Returns the validation or decode error; a decode failure leaves the
    /// background recorded but undrawn.
    pub fn import_background(&mut self, page: RasterizedPage) -> Result<Vec<Action>, BackgroundError> {
        let actions = self.core.import_background(page)?;
        self.decode_background()?;
        Ok(actions)
    }

    fn decode_background(&mut self) -> Result<(), BackgroundError> {
        if let Some(bg) = self.core.active_floor().and_then(|f| f.background.as_ref()) {
            self.images.get_or_decode(&bg.data, &HtmlImageDecoder)?;
        }
        Ok(())
    }

    // --- Render ---

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if any `Canvas2D` call fails.
    pub fn render(&mut self) -> Result<(), JsValue> {
        if let Err(e) = self.decode_background() {
            warn!(error = %e, "background decode failed");
        }
        let core = &self.core;
        let Some(floor) = core.active_floor() else {
            return Ok(());
        };
        let preview = core.preview();
        let scene = Scene {
            floor,
            viewport: &core.viewport,
            selected: core.selected_object(),
            preview: preview.as_ref(),
            background: floor.background.as_ref().and_then(|bg| self.images.ready(&bg.data)),
            measure: core.measure.as_ref(),
            width: core.viewport_width,
            height: core.viewport_height,
        };
        draw(&mut WebPainter::new(&self.ctx, core.dpr), &scene)
    }

    /// Paint the active floor onto `target` for the PDF collaborator.
    ///
    /// # Errors
    ///
    /// Returns `Err` when there is nothing to export, the target has no 2D
    /// context, or a `Canvas2D` call fails.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn export_to(&self, target: &HtmlCanvasElement) -> Result<ExportRequest, JsValue> {
        let req = self.core.export_request().map_err(|e| JsValue::from_str(&e.to_string()))?;
        target.set_width(req.bounds.width().ceil() as u32);
        target.set_height(req.bounds.height().ceil() as u32);
        let ctx = target
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        let background = req.background.as_ref().and_then(|bg| self.images.ready(&bg.data));
        draw_export(&mut WebPainter::new(&ctx, 1.0), &req, background)?;
        Ok(req)
    }
}
