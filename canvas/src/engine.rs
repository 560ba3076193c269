//! Engine core: the input state machine and the editor's one-shot actions.
//!
//! [`EngineCore`] owns the history, the viewport and the gesture state and
//! has no browser dependencies, so every behaviour here is unit-tested
//! directly. Handlers return the [`Action`]s a host needs to react to; the
//! host never inspects engine fields to discover what changed.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use tracing::{debug, warn};

use crate::background::{BackgroundError, PageRasterizer, RasterizedPage};
use crate::consts::*;
use crate::doc::{Background, Floor, ObjectId, Project, RectShape, SceneObject, SegmentShape, Shape};
use crate::error::EditError;
use crate::export::{ExportRequest, export_request};
use crate::geom::Point;
use crate::history::History;
use crate::hit::{ApproxTextMeasure, Hit, HitPart, TextMeasure, hit_test};
use crate::input::{
    Button, Cursor, InputState, Key, Modifiers, PanTarget, Tool, UiState, WheelDelta, cursor_for, resize_rect,
};
use crate::measure::wiring_meters;
use crate::viewport::Viewport;
use crate::visibility::{CoveragePolygon, floor_coverage};

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ObjectCreated(SceneObject),
    ObjectUpdated { id: ObjectId },
    ObjectDeleted { id: ObjectId },
    SelectionChanged(Option<ObjectId>),
    ToolChanged(Tool),
    /// A text object was placed; the host may prompt for its content and
    /// answer with [`EngineCore::set_text_content`].
    EditTextRequested { id: ObjectId, text: String },
    SetCursor(Cursor),
    /// A history entry was added or the cursor moved.
    HistoryChanged,
    RenderNeeded,
}

/// Core engine state: all logic that doesn't depend on the canvas element.
pub struct EngineCore {
    pub history: History,
    pub viewport: Viewport,
    pub ui: UiState,
    pub input: InputState,
    pub measure: Box<dyn TextMeasure>,
    /// Drawing surface size in CSS pixels.
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub dpr: f64,
    cursor: Cursor,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::with_measure(Box::new(ApproxTextMeasure))
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine that measures text with the host's metrics.
    #[must_use]
    pub fn with_measure(measure: Box<dyn TextMeasure>) -> Self {
        Self {
            history: History::default(),
            viewport: Viewport::default(),
            ui: UiState::default(),
            input: InputState::default(),
            measure,
            viewport_width: 0.0,
            viewport_height: 0.0,
            dpr: 1.0,
            cursor: Cursor::Default,
        }
    }

    // =============================================================
    // Pointer input
    // =============================================================

    pub fn on_pointer_down(&mut self, screen: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        let mut actions = Vec::new();
        match button {
            Button::Secondary => return actions,
            Button::Middle => {
                self.start_pan(screen, PanTarget::Viewport, &mut actions);
                return actions;
            }
            Button::Primary => {}
        }

        let world = self.viewport.screen_to_world(screen);
        match self.ui.tool {
            Tool::MoveBackground => self.start_pan(screen, PanTarget::Background, &mut actions),
            Tool::Select => self.begin_select(world, &mut actions),
            Tool::Rect | Tool::Wall | Tool::Wiring => {
                self.input = InputState::Drawing { start_world: world, current_world: world };
            }
            tool @ (Tool::Text | Tool::BulletCam | Tool::DomeCam) => self.place_object(tool, world, &mut actions),
        }
        actions
    }

    pub fn on_pointer_move(&mut self, screen: Point, _modifiers: Modifiers) -> Vec<Action> {
        let world = self.viewport.screen_to_world(screen);
        let mut actions = Vec::new();
        let mut state = std::mem::take(&mut self.input);
        match &mut state {
            InputState::Idle => self.hover(world, &mut actions),
            InputState::PinchZooming { .. } => {}
            InputState::Panning { last_screen, target, recorded } => {
                let delta = screen - *last_screen;
                *last_screen = screen;
                self.pan(delta, *target, recorded, &mut actions);
            }
            InputState::Dragging { id, start_world, orig, recorded } => {
                let mut shape = orig.clone();
                shape.translate(world.x - start_world.x, world.y - start_world.y);
                self.edit_shape(id, shape, recorded, &mut actions);
            }
            InputState::Resizing { id, corner, orig, recorded } => {
                let shape = Shape::Rect(resize_rect(orig, *corner, world));
                self.edit_shape(id, shape, recorded, &mut actions);
            }
            InputState::Rotating { id, recorded } => {
                if let Some(cam) = self.history.current().find_object(id).and_then(SceneObject::as_camera) {
                    let mut next = *cam;
                    next.rotation = cam.position().angle_to(world);
                    self.edit_shape(id, Shape::Camera(next), recorded, &mut actions);
                }
            }
            InputState::Drawing { current_world, .. } => {
                *current_world = world;
                actions.push(Action::RenderNeeded);
            }
        }
        self.input = state;
        actions
    }

    pub fn on_pointer_up(&mut self, screen: Point, _button: Button, _modifiers: Modifiers) -> Vec<Action> {
        let world = self.viewport.screen_to_world(screen);
        let mut actions = Vec::new();
        match std::mem::take(&mut self.input) {
            InputState::Idle => return actions,
            InputState::Panning { .. } => self.set_cursor(cursor_for(self.ui.tool, None), &mut actions),
            InputState::Resizing { id, mut recorded, .. } => {
                let current = self.history.current().find_object(&id).and_then(SceneObject::as_rect).copied();
                if let Some(rect) = current {
                    self.edit_shape(&id, Shape::Rect(rect.normalized()), &mut recorded, &mut actions);
                }
            }
            InputState::Drawing { start_world, .. } => self.commit_drawing(start_world, world, &mut actions),
            InputState::Dragging { .. } | InputState::Rotating { .. } | InputState::PinchZooming { .. } => {}
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// The pointer left the surface: finish the gesture as if released there.
    pub fn on_pointer_leave(&mut self, screen: Point) -> Vec<Action> {
        self.on_pointer_up(screen, Button::Primary, Modifiers::default())
    }

    pub fn on_wheel(&mut self, screen: Point, delta: WheelDelta, _modifiers: Modifiers) -> Vec<Action> {
        let factor = if delta.dy < 0.0 { WHEEL_ZOOM_STEP } else { 1.0 / WHEEL_ZOOM_STEP };
        if self.viewport.zoom_at(factor, screen) { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    // =============================================================
    // Touch input
    // =============================================================

    /// Two or more touches start a pinch; any gesture in progress is dropped.
    pub fn on_touch_start(&mut self, touches: &[Point]) -> Vec<Action> {
        if let [a, b, ..] = touches {
            self.input = InputState::PinchZooming { last_distance: a.distance(*b) };
        }
        Vec::new()
    }

    /// Zoom by the ratio of successive touch distances, centered between the
    /// first two touches.
    pub fn on_touch_move(&mut self, touches: &[Point]) -> Vec<Action> {
        let [a, b, ..] = touches else {
            return Vec::new();
        };
        let distance = a.distance(*b);
        let mut actions = Vec::new();
        if let InputState::PinchZooming { last_distance } = &mut self.input {
            if *last_distance > 0.0 && self.viewport.zoom_at(distance / *last_distance, a.midpoint(*b)) {
                actions.push(Action::RenderNeeded);
            }
            *last_distance = distance;
        } else {
            self.input = InputState::PinchZooming { last_distance: distance };
        }
        actions
    }

    /// `remaining` is the number of touches still down.
    pub fn on_touch_end(&mut self, remaining: usize) -> Vec<Action> {
        if remaining < 2 && matches!(self.input, InputState::PinchZooming { .. }) {
            self.input = InputState::Idle;
        }
        Vec::new()
    }

    // =============================================================
    // Keyboard input
    // =============================================================

    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        match key.0.as_str() {
            "Delete" | "Backspace" => self.delete_selected(),
            "z" | "Z" if modifiers.command() && modifiers.shift => self.redo(),
            "z" if modifiers.command() => self.undo(),
            "y" if modifiers.command() => self.redo(),
            "Escape" => self.set_tool(Tool::Select),
            _ => Vec::new(),
        }
    }

    // =============================================================
    // Tools and view
    // =============================================================

    /// Switch tools. Any gesture in progress is dropped without committing.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        let mut actions = Vec::new();
        self.input = InputState::Idle;
        if self.ui.tool != tool {
            self.ui.tool = tool;
            actions.push(Action::ToolChanged(tool));
        }
        self.set_cursor(cursor_for(tool, None), &mut actions);
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Switch tools by the name a toolbar button carries. Unknown names are
    /// logged and ignored.
    pub fn set_tool_named(&mut self, name: &str) -> Vec<Action> {
        match Tool::from_name(name) {
            Some(tool) => self.set_tool(tool),
            None => {
                warn!(name, "unknown tool");
                Vec::new()
            }
        }
    }

    /// Update viewport dimensions (CSS pixels) and device pixel ratio.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) -> Vec<Action> {
        self.viewport_width = width_css;
        self.viewport_height = height_css;
        self.dpr = dpr;
        vec![Action::RenderNeeded]
    }

    pub fn zoom_in(&mut self) -> Vec<Action> {
        self.zoom_centered(BUTTON_ZOOM_STEP)
    }

    pub fn zoom_out(&mut self) -> Vec<Action> {
        self.zoom_centered(1.0 / BUTTON_ZOOM_STEP)
    }

    fn zoom_centered(&mut self, factor: f64) -> Vec<Action> {
        let center = Point::new(self.viewport_width / 2.0, self.viewport_height / 2.0);
        if self.viewport.zoom_at(factor, center) { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    // =============================================================
    // History
    // =============================================================

    /// Step back one edit. The selection is cleared.
    pub fn undo(&mut self) -> Vec<Action> {
        if !self.history.undo() {
            return Vec::new();
        }
        self.after_history_jump()
    }

    /// Re-apply the most recently undone edit. The selection is cleared.
    pub fn redo(&mut self) -> Vec<Action> {
        if !self.history.redo() {
            return Vec::new();
        }
        self.after_history_jump()
    }

    fn after_history_jump(&mut self) -> Vec<Action> {
        let mut actions = vec![Action::HistoryChanged];
        self.input = InputState::Idle;
        self.select(None, &mut actions);
        actions.push(Action::RenderNeeded);
        actions
    }

    // =============================================================
    // Object edits
    // =============================================================

    /// Remove the selected object from every floor and layer.
    pub fn delete_selected(&mut self) -> Vec<Action> {
        let Some(id) = self.ui.selected_id.clone() else {
            return Vec::new();
        };
        let mut actions = Vec::new();
        if self.history.current().find_object(&id).is_some() {
            self.history.record_update(|p| {
                p.remove_object(&id);
            });
            debug!(%id, "object deleted");
            actions.push(Action::HistoryChanged);
            actions.push(Action::ObjectDeleted { id });
        }
        self.input = InputState::Idle;
        self.select(None, &mut actions);
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Field of view of the selected camera, clamped to its kind's range.
    pub fn set_camera_fov(&mut self, fov: f64) -> Vec<Action> {
        if !fov.is_finite() {
            return Vec::new();
        }
        self.edit_selected(|shape| {
            if let Shape::Camera(cam) = shape {
                cam.fov = fov.clamp(MIN_FOV, cam.kind.max_fov());
            }
        })
    }

    pub fn set_camera_range(&mut self, range: f64) -> Vec<Action> {
        if !range.is_finite() {
            return Vec::new();
        }
        self.edit_selected(|shape| {
            if let Shape::Camera(cam) = shape {
                cam.range = range.clamp(MIN_CAMERA_RANGE, MAX_CAMERA_RANGE);
            }
        })
    }

    pub fn set_text_content(&mut self, content: &str) -> Vec<Action> {
        self.edit_selected(|shape| {
            if let Shape::Text(text) = shape {
                content.clone_into(&mut text.content);
            }
        })
    }

    pub fn set_text_size(&mut self, size: f64) -> Vec<Action> {
        if !size.is_finite() {
            return Vec::new();
        }
        self.edit_selected(|shape| {
            if let Shape::Text(text) = shape {
                text.size = size.clamp(MIN_TEXT_SIZE, MAX_TEXT_SIZE);
            }
        })
    }

    // =============================================================
    // Layers
    // =============================================================

    /// Append an empty layer to the active floor. Blank names are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::NoFloors`] if the active floor does not resolve.
    pub fn add_layer(&mut self, name: &str) -> Result<Vec<Action>, EditError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(Vec::new());
        }
        let id = self.try_edit("add layer", |p| Ok(active_floor_mut(p)?.add_layer(name)))?;
        debug!(layer = %id, "layer added");
        Ok(vec![Action::HistoryChanged, Action::RenderNeeded])
    }

    /// Delete the active layer and its objects.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::LastLayer`] when the floor has a single layer;
    /// nothing is recorded.
    pub fn delete_active_layer(&mut self) -> Result<Vec<Action>, EditError> {
        self.try_edit("delete layer", |p| active_floor_mut(p)?.delete_active_layer())?;
        let mut actions = vec![Action::HistoryChanged];
        if self.selected_object().is_none() {
            self.input = InputState::Idle;
            self.select(None, &mut actions);
        }
        actions.push(Action::RenderNeeded);
        Ok(actions)
    }

    /// # Errors
    ///
    /// Returns [`EditError::LayerNotFound`] for an unknown id.
    pub fn toggle_layer_visibility(&mut self, id: &str) -> Result<Vec<Action>, EditError> {
        let visible = self.try_edit("toggle layer", |p| active_floor_mut(p)?.toggle_layer_visibility(id))?;
        debug!(layer = id, visible, "layer visibility toggled");
        Ok(vec![Action::HistoryChanged, Action::RenderNeeded])
    }

    /// # Errors
    ///
    /// Returns [`EditError::LayerNotFound`] for an unknown id.
    pub fn set_active_layer(&mut self, id: &str) -> Result<Vec<Action>, EditError> {
        if self.active_floor().is_some_and(|f| f.active_layer_id == id) {
            return Ok(Vec::new());
        }
        self.try_edit("set active layer", |p| active_floor_mut(p)?.set_active_layer(id))?;
        Ok(vec![Action::HistoryChanged, Action::RenderNeeded])
    }

    // =============================================================
    // Floors
    // =============================================================

    /// Append a floor with the default layers and switch to it. Blank names
    /// are ignored.
    pub fn add_floor(&mut self, name: &str) -> Vec<Action> {
        let name = name.trim();
        if name.is_empty() {
            return Vec::new();
        }
        self.history.record_update(|p| {
            p.add_floor(name);
        });
        debug!(floor = name, "floor added");
        self.after_floor_change()
    }

    /// # Errors
    ///
    /// Returns [`EditError::FloorOutOfRange`] for a bad index.
    pub fn rename_floor(&mut self, index: usize, name: &str) -> Result<Vec<Action>, EditError> {
        let name = name.trim();
        let floors = &self.history.current().floors;
        let current = floors.get(index).ok_or(EditError::FloorOutOfRange { index, len: floors.len() })?;
        if name.is_empty() || current.name == name {
            return Ok(Vec::new());
        }
        self.try_edit("rename floor", |p| p.rename_floor(index, name))?;
        Ok(vec![Action::HistoryChanged, Action::RenderNeeded])
    }

    /// # Errors
    ///
    /// Returns [`EditError::FloorOutOfRange`] for a bad index.
    pub fn switch_floor(&mut self, index: usize) -> Result<Vec<Action>, EditError> {
        if self.history.current().active_floor_index == index {
            return Ok(Vec::new());
        }
        self.try_edit("switch floor", |p| p.switch_floor(index))?;
        Ok(self.after_floor_change())
    }

    fn after_floor_change(&mut self) -> Vec<Action> {
        let mut actions = vec![Action::HistoryChanged];
        self.input = InputState::Idle;
        self.select(None, &mut actions);
        actions.push(Action::RenderNeeded);
        actions
    }

    // =============================================================
    // Documents and backgrounds
    // =============================================================

    /// Replace the project with a parsed document. On any error the current
    /// project and history are untouched.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::Parse`] for malformed JSON or the structural error
    /// the document violates.
    pub fn load_project(&mut self, json: &str) -> Result<Vec<Action>, EditError> {
        let project = Project::from_json(json).inspect_err(|e| warn!(error = %e, "project load failed"))?;
        debug!(floors = project.floors.len(), "project loaded");
        self.history.reset(project);
        Ok(self.after_history_jump())
    }

    /// Serialize the current project.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::Parse`] if serialization fails.
    pub fn save_project(&self, pretty: bool) -> Result<String, EditError> {
        self.history.current().to_json(pretty)
    }

    /// Place a rasterized page at the origin of the active floor, replacing
    /// any previous background.
    ///
    /// # Errors
    ///
    /// Returns [`BackgroundError::EmptyPage`] for a page without pixels.
    pub fn import_background(&mut self, page: RasterizedPage) -> Result<Vec<Action>, BackgroundError> {
        page.validate()?;
        let RasterizedPage { data, width, height } = page;
        self.history.record_update(|p| {
            if let Some(floor) = p.active_floor_mut() {
                floor.background = Some(Background { data, width, height, x: 0.0, y: 0.0 });
            }
        });
        debug!(width, height, "background imported");
        Ok(vec![Action::HistoryChanged, Action::RenderNeeded])
    }

    /// Rasterize the first page of `bytes` and import it.
    ///
    /// # Errors
    ///
    /// Propagates the rasterizer's error.
    pub fn import_background_page(
        &mut self,
        rasterizer: &dyn PageRasterizer,
        bytes: &[u8],
    ) -> Result<Vec<Action>, BackgroundError> {
        let page = rasterizer.rasterize(bytes).inspect_err(|e| warn!(error = %e, "background import failed"))?;
        self.import_background(page)
    }

    // =============================================================
    // Queries
    // =============================================================

    #[must_use]
    pub fn project(&self) -> &Project {
        self.history.current()
    }

    #[must_use]
    pub fn active_floor(&self) -> Option<&Floor> {
        self.history.current().active_floor()
    }

    /// The selected id, if any. It may no longer resolve; see
    /// [`EngineCore::selected_object`].
    #[must_use]
    pub fn selection(&self) -> Option<&str> {
        self.ui.selected_id.as_deref()
    }

    /// The selected object, re-resolved against the current project.
    #[must_use]
    pub fn selected_object(&self) -> Option<&SceneObject> {
        let id = self.ui.selected_id.as_deref()?;
        self.history.current().find_object(id)
    }

    #[must_use]
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Shape being dragged out by a drawing tool, if any.
    #[must_use]
    pub fn preview(&self) -> Option<Shape> {
        let InputState::Drawing { start_world: s, current_world: c } = &self.input else {
            return None;
        };
        match self.ui.tool {
            Tool::Rect => Some(Shape::Rect(RectShape { x: s.x, y: s.y, w: c.x - s.x, h: c.y - s.y })),
            tool => {
                let kind = tool.segment_kind()?;
                Some(Shape::Segment(SegmentShape { x1: s.x, y1: s.y, x2: c.x, y2: c.y, kind }))
            }
        }
    }

    /// Coverage polygons of every visible camera on the active floor.
    #[must_use]
    pub fn coverage(&self) -> Vec<(ObjectId, CoveragePolygon)> {
        self.active_floor().map(floor_coverage).unwrap_or_default()
    }

    /// Total visible wiring on the active floor, in meters.
    #[must_use]
    pub fn wiring_meters(&self) -> f64 {
        self.active_floor().map_or(0.0, wiring_meters)
    }

    /// # Errors
    ///
    /// Returns [`EditError::NothingToExport`] for an empty floor.
    pub fn export_request(&self) -> Result<ExportRequest, EditError> {
        export_request(self.active_floor().ok_or(EditError::NoFloors)?)
    }

    // =============================================================
    // Internals
    // =============================================================

    fn hit_at(&self, world: Point) -> Option<Hit> {
        let floor = self.active_floor()?;
        hit_test(world, floor, &self.viewport, self.selected_object(), self.measure.as_ref())
    }

    fn hover(&mut self, world: Point, actions: &mut Vec<Action>) {
        let hit = match self.ui.tool {
            Tool::Select => self.hit_at(world),
            _ => None,
        };
        self.set_cursor(cursor_for(self.ui.tool, hit.as_ref()), actions);
    }

    fn begin_select(&mut self, world: Point, actions: &mut Vec<Action>) {
        let Some(hit) = self.hit_at(world) else {
            self.input = InputState::Idle;
            self.select(None, actions);
            actions.push(Action::RenderNeeded);
            return;
        };
        let Some(obj) = self.history.current().find_object(&hit.object_id) else {
            return;
        };
        let id = hit.object_id.clone();
        self.input = match hit.part {
            HitPart::Body => {
                InputState::Dragging { id, start_world: world, orig: obj.shape.clone(), recorded: false }
            }
            HitPart::ResizeHandle(corner) => match obj.as_rect() {
                Some(rect) => InputState::Resizing { id, corner, orig: *rect, recorded: false },
                None => InputState::Idle,
            },
            HitPart::RotateHandle => InputState::Rotating { id, recorded: false },
        };
        self.select(Some(hit.object_id.clone()), actions);
        self.set_cursor(cursor_for(Tool::Select, Some(&hit)), actions);
        actions.push(Action::RenderNeeded);
    }

    /// Create a camera or text at `world`, select it and return to the select tool.
    fn place_object(&mut self, tool: Tool, world: Point, actions: &mut Vec<Action>) {
        let obj = match tool.camera_kind() {
            Some(kind) => SceneObject::camera(world, kind),
            None => SceneObject::default_text(world),
        };
        if !self.add_to_active_layer(obj.clone(), actions) {
            return;
        }
        self.select(Some(obj.id.clone()), actions);
        actions.extend(self.set_tool(Tool::Select));
        if let Some(text) = obj.as_text() {
            actions.push(Action::EditTextRequested { id: obj.id.clone(), text: text.content.clone() });
        }
    }

    fn commit_drawing(&mut self, start: Point, end: Point, actions: &mut Vec<Action>) {
        let (w, h) = (end.x - start.x, end.y - start.y);
        let obj = match self.ui.tool {
            Tool::Rect if w.abs() > MIN_DRAW_SIZE || h.abs() > MIN_DRAW_SIZE => {
                let r = RectShape { x: start.x, y: start.y, w, h }.normalized();
                Some(SceneObject::rect(r.x, r.y, r.w, r.h))
            }
            Tool::Wall | Tool::Wiring if start.distance(end) > MIN_DRAW_SIZE => {
                self.ui.tool.segment_kind().map(|kind| SceneObject::segment(start, end, kind))
            }
            _ => None,
        };
        match obj {
            Some(obj) => {
                self.add_to_active_layer(obj, actions);
            }
            None => debug!(w, h, "drawing below minimum size discarded"),
        }
    }

    fn add_to_active_layer(&mut self, obj: SceneObject, actions: &mut Vec<Action>) -> bool {
        let created = obj.clone();
        if self.try_edit("add object", |p| active_floor_mut(p)?.add_object(obj)).is_err() {
            return false;
        }
        debug!(id = %created.id, "object created");
        actions.push(Action::HistoryChanged);
        actions.push(Action::ObjectCreated(created));
        true
    }

    /// Move the viewport or the background by a screen-space delta.
    fn pan(&mut self, delta: Point, target: PanTarget, recorded: &mut bool, actions: &mut Vec<Action>) {
        match target {
            PanTarget::Viewport => self.viewport.pan(delta),
            PanTarget::Background => {
                let has_background = self.active_floor().is_some_and(|f| f.background.is_some());
                if !has_background || (delta.x == 0.0 && delta.y == 0.0) {
                    return;
                }
                let scale = self.viewport.scale;
                self.gesture_edit(recorded, actions, |p| {
                    if let Some(bg) = p.active_floor_mut().and_then(|f| f.background.as_mut()) {
                        bg.x += delta.x / scale;
                        bg.y += delta.y / scale;
                    }
                });
            }
        }
        actions.push(Action::RenderNeeded);
    }

    fn start_pan(&mut self, screen: Point, target: PanTarget, actions: &mut Vec<Action>) {
        self.input = InputState::Panning { last_screen: screen, target, recorded: false };
        self.set_cursor(Cursor::Grabbing, actions);
    }

    /// Replace an object's shape as part of a gesture. Frames that change
    /// nothing are not recorded.
    fn edit_shape(&mut self, id: &str, shape: Shape, recorded: &mut bool, actions: &mut Vec<Action>) {
        let unchanged = self.history.current().find_object(id).is_none_or(|obj| obj.shape == shape);
        if unchanged {
            return;
        }
        self.gesture_edit(recorded, actions, |p| {
            if let Some(obj) = p.find_object_mut(id) {
                obj.shape = shape;
            }
        });
        actions.push(Action::ObjectUpdated { id: id.to_owned() });
        actions.push(Action::RenderNeeded);
    }

    /// The first frame of a gesture records an entry; later frames amend it.
    fn gesture_edit(&mut self, recorded: &mut bool, actions: &mut Vec<Action>, mutate: impl FnOnce(&mut Project)) {
        if *recorded {
            self.history.amend(mutate);
        } else {
            self.history.record_update(mutate);
            *recorded = true;
            actions.push(Action::HistoryChanged);
        }
    }

    /// One undo step editing the selected object's shape. No entry is
    /// recorded when the edit changes nothing.
    fn edit_selected(&mut self, edit: impl FnOnce(&mut Shape)) -> Vec<Action> {
        let Some(obj) = self.selected_object() else {
            return Vec::new();
        };
        let id = obj.id.clone();
        let mut shape = obj.shape.clone();
        edit(&mut shape);
        if shape == obj.shape {
            return Vec::new();
        }
        self.history.record_update(|p| {
            if let Some(obj) = p.find_object_mut(&id) {
                obj.shape = shape;
            }
        });
        vec![Action::HistoryChanged, Action::ObjectUpdated { id }, Action::RenderNeeded]
    }

    fn try_edit<T>(
        &mut self,
        what: &'static str,
        mutate: impl FnOnce(&mut Project) -> Result<T, EditError>,
    ) -> Result<T, EditError> {
        self.history.try_record_update(mutate).inspect_err(|e| warn!(error = %e, edit = what, "edit rejected"))
    }

    fn select(&mut self, id: Option<ObjectId>, actions: &mut Vec<Action>) {
        if self.ui.selected_id != id {
            self.ui.selected_id.clone_from(&id);
            actions.push(Action::SelectionChanged(id));
        }
    }

    fn set_cursor(&mut self, cursor: Cursor, actions: &mut Vec<Action>) {
        if self.cursor != cursor {
            self.cursor = cursor;
            actions.push(Action::SetCursor(cursor));
        }
    }
}

fn active_floor_mut(p: &mut Project) -> Result<&mut Floor, EditError> {
    p.active_floor_mut().ok_or(EditError::NoFloors)
}
