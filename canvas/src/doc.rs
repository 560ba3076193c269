//! Document model: projects, floors, layers, and the objects placed on them.
//!
//! A [`Project`] is an ordered list of [`Floor`]s; each floor owns an ordered
//! list of [`Layer`]s; each layer owns an ordered list of [`SceneObject`]s.
//! Objects are addressed everywhere by their string id, never by a
//! structural reference, because the whole document is snapshotted on every
//! edit (see [`crate::history`]).
//!
//! Floors and layers sit behind `Arc`s. Cloning a `Project` only copies the
//! spine; the `*_mut` accessors copy-on-write just the floor and layer they
//! touch, so older snapshots keep sharing everything that did not change.
//!
//! The serde shape mirrors the persisted project document: camel-case keys,
//! objects tagged by `type`.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{
    DEFAULT_CAMERA_FOV, DEFAULT_CAMERA_RANGE, DEFAULT_CAMERA_ROTATION, DEFAULT_TEXT_CONTENT, DEFAULT_TEXT_SIZE,
    MAX_BULLET_FOV, MAX_CAMERA_RANGE, MAX_DOME_FOV, MAX_TEXT_SIZE, MIN_CAMERA_RANGE, MIN_FOV, MIN_TEXT_SIZE,
};
use crate::error::EditError;
use crate::geom::{Point, RectHandles, Segment, rectangle_handles};

/// Unique identifier for a scene object, stable for the object's lifetime.
pub type ObjectId = String;

/// Identifier for a layer, unique within its floor.
pub type LayerId = String;

/// Generate a fresh object id.
#[must_use]
pub fn new_object_id() -> ObjectId {
    format!("obj_{}", Uuid::new_v4().simple())
}

/// Generate a fresh layer id.
#[must_use]
pub fn new_layer_id() -> LayerId {
    format!("l_{}", Uuid::new_v4().simple())
}

// =============================================================
// Shapes
// =============================================================

/// Whether a segment is a wall or a cable run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Solid wall; blocks camera visibility.
    Wall,
    /// Dashed cable run; never blocks visibility.
    Wiring,
}

/// Camera hardware style; controls the allowed field of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraKind {
    /// Directional camera.
    Bullet,
    /// Omnidirectional camera.
    Dome,
}

impl CameraKind {
    /// Widest field of view (degrees) this kind accepts.
    #[must_use]
    pub fn max_fov(self) -> f64 {
        match self {
            Self::Bullet => MAX_BULLET_FOV,
            Self::Dome => MAX_DOME_FOV,
        }
    }
}

/// Axis-aligned rectangle. `w`/`h` may be negative while a resize is in
/// flight; they are normalized when the gesture ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectShape {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl RectShape {
    /// Same rectangle with non-negative width and height and a top-left origin.
    #[must_use]
    pub fn normalized(&self) -> RectShape {
        let mut r = *self;
        if r.w < 0.0 {
            r.x += r.w;
            r.w = -r.w;
        }
        if r.h < 0.0 {
            r.y += r.h;
            r.h = -r.h;
        }
        r
    }

    /// Corner points, named by their role in the stored rectangle.
    #[must_use]
    pub fn handles(&self) -> RectHandles {
        rectangle_handles(self.x, self.y, self.w, self.h)
    }

    /// The four boundary segments, clockwise from the top edge.
    #[must_use]
    pub fn edges(&self) -> [Segment; 4] {
        let h = self.handles();
        [
            Segment::new(h.tl, h.tr),
            Segment::new(h.tr, h.br),
            Segment::new(h.br, h.bl),
            Segment::new(h.bl, h.tl),
        ]
    }

    /// Strict interior test; points on the border are outside.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        let r = self.normalized();
        p.x > r.x && p.x < r.x + r.w && p.y > r.y && p.y < r.y + r.h
    }
}

/// Wall or wiring segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentShape {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub kind: SegmentKind,
}

impl SegmentShape {
    #[must_use]
    pub fn a(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    #[must_use]
    pub fn b(&self) -> Point {
        Point::new(self.x2, self.y2)
    }

    #[must_use]
    pub fn as_segment(&self) -> Segment {
        Segment::new(self.a(), self.b())
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.a().distance(self.b())
    }
}

/// Free-standing text label anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct TextShape {
    pub x: f64,
    pub y: f64,
    pub content: String,
    /// Font size in pixels.
    pub size: f64,
}

/// Security camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraShape {
    pub x: f64,
    pub y: f64,
    /// Facing direction in radians; 0 points along +x.
    pub rotation: f64,
    /// Field of view in degrees.
    pub fov: f64,
    /// Viewing distance in world units.
    pub range: f64,
    pub kind: CameraKind,
}

impl CameraShape {
    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[must_use]
    pub fn fov_radians(&self) -> f64 {
        self.fov.to_radians()
    }
}

/// Geometry payload of a scene object.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect(RectShape),
    Segment(SegmentShape),
    Text(TextShape),
    Camera(CameraShape),
}

impl Shape {
    /// Move the shape by (`dx`, `dy`). Segments move both endpoints.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        match self {
            Shape::Rect(r) => {
                r.x += dx;
                r.y += dy;
            }
            Shape::Segment(s) => {
                s.x1 += dx;
                s.y1 += dy;
                s.x2 += dx;
                s.y2 += dy;
            }
            Shape::Text(t) => {
                t.x += dx;
                t.y += dy;
            }
            Shape::Camera(c) => {
                c.x += dx;
                c.y += dy;
            }
        }
    }

    /// World-space extent as `(min, max)` corners. Text and cameras report
    /// their anchor point only.
    #[must_use]
    pub fn bounds(&self) -> (Point, Point) {
        match self {
            Shape::Rect(r) => {
                let n = r.normalized();
                (Point::new(n.x, n.y), Point::new(n.x + n.w, n.y + n.h))
            }
            Shape::Segment(s) => (
                Point::new(s.x1.min(s.x2), s.y1.min(s.y2)),
                Point::new(s.x1.max(s.x2), s.y1.max(s.y2)),
            ),
            Shape::Text(t) => (Point::new(t.x, t.y), Point::new(t.x, t.y)),
            Shape::Camera(c) => (c.position(), c.position()),
        }
    }
}

// =============================================================
// Scene objects
// =============================================================

/// A placed object: a stable id plus its geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ObjectRecord", into = "ObjectRecord")]
pub struct SceneObject {
    pub id: ObjectId,
    pub shape: Shape,
}

impl SceneObject {
    #[must_use]
    pub fn new(id: ObjectId, shape: Shape) -> Self {
        Self { id, shape }
    }

    /// Rectangle with a fresh id.
    #[must_use]
    pub fn rect(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self::new(new_object_id(), Shape::Rect(RectShape { x, y, w, h }))
    }

    /// Segment of the given kind with a fresh id.
    #[must_use]
    pub fn segment(a: Point, b: Point, kind: SegmentKind) -> Self {
        Self::new(new_object_id(), Shape::Segment(SegmentShape { x1: a.x, y1: a.y, x2: b.x, y2: b.y, kind }))
    }

    /// Text label with a fresh id.
    #[must_use]
    pub fn text(at: Point, content: impl Into<String>, size: f64) -> Self {
        Self::new(new_object_id(), Shape::Text(TextShape { x: at.x, y: at.y, content: content.into(), size }))
    }

    /// Text label with the default content and size.
    #[must_use]
    pub fn default_text(at: Point) -> Self {
        Self::text(at, DEFAULT_TEXT_CONTENT, DEFAULT_TEXT_SIZE)
    }

    /// Camera with default rotation, fov and range.
    #[must_use]
    pub fn camera(at: Point, kind: CameraKind) -> Self {
        Self::new(
            new_object_id(),
            Shape::Camera(CameraShape {
                x: at.x,
                y: at.y,
                rotation: DEFAULT_CAMERA_ROTATION,
                fov: DEFAULT_CAMERA_FOV,
                range: DEFAULT_CAMERA_RANGE,
                kind,
            }),
        )
    }

    #[must_use]
    pub fn as_rect(&self) -> Option<&RectShape> {
        match &self.shape {
            Shape::Rect(r) => Some(r),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_segment(&self) -> Option<&SegmentShape> {
        match &self.shape {
            Shape::Segment(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&TextShape> {
        match &self.shape {
            Shape::Text(t) => Some(t),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_camera(&self) -> Option<&CameraShape> {
        match &self.shape {
            Shape::Camera(c) => Some(c),
            _ => None,
        }
    }

    /// Coordinates are finite and camera/text properties sit inside the
    /// ranges the property editor clamps to.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        let finite = |values: &[f64]| values.iter().all(|v| v.is_finite());
        match &self.shape {
            Shape::Rect(r) => finite(&[r.x, r.y, r.w, r.h]),
            Shape::Segment(s) => finite(&[s.x1, s.y1, s.x2, s.y2]),
            Shape::Text(t) => finite(&[t.x, t.y]) && (MIN_TEXT_SIZE..=MAX_TEXT_SIZE).contains(&t.size),
            Shape::Camera(c) => {
                finite(&[c.x, c.y, c.rotation])
                    && (MIN_FOV..=c.kind.max_fov()).contains(&c.fov)
                    && (MIN_CAMERA_RANGE..=MAX_CAMERA_RANGE).contains(&c.range)
            }
        }
    }
}

/// On-disk form of a scene object: one flat record tagged by `type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
enum ObjectRecord {
    #[serde(rename = "rect")]
    Rect { id: ObjectId, x: f64, y: f64, w: f64, h: f64 },
    #[serde(rename = "line")]
    Line { id: ObjectId, x1: f64, y1: f64, x2: f64, y2: f64 },
    #[serde(rename = "wiring")]
    Wiring { id: ObjectId, x1: f64, y1: f64, x2: f64, y2: f64 },
    #[serde(rename = "text")]
    Text { id: ObjectId, x: f64, y: f64, content: String, size: f64 },
    #[serde(rename = "bulletCam")]
    BulletCam { id: ObjectId, x: f64, y: f64, rotation: f64, fov: f64, range: f64 },
    #[serde(rename = "domeCam")]
    DomeCam { id: ObjectId, x: f64, y: f64, rotation: f64, fov: f64, range: f64 },
}

impl From<ObjectRecord> for SceneObject {
    fn from(record: ObjectRecord) -> Self {
        match record {
            ObjectRecord::Rect { id, x, y, w, h } => Self::new(id, Shape::Rect(RectShape { x, y, w, h })),
            ObjectRecord::Line { id, x1, y1, x2, y2 } => {
                Self::new(id, Shape::Segment(SegmentShape { x1, y1, x2, y2, kind: SegmentKind::Wall }))
            }
            ObjectRecord::Wiring { id, x1, y1, x2, y2 } => {
                Self::new(id, Shape::Segment(SegmentShape { x1, y1, x2, y2, kind: SegmentKind::Wiring }))
            }
            ObjectRecord::Text { id, x, y, content, size } => Self::new(id, Shape::Text(TextShape { x, y, content, size })),
            ObjectRecord::BulletCam { id, x, y, rotation, fov, range } => Self::new(
                id,
                Shape::Camera(CameraShape { x, y, rotation, fov, range, kind: CameraKind::Bullet }),
            ),
            ObjectRecord::DomeCam { id, x, y, rotation, fov, range } => {
                Self::new(id, Shape::Camera(CameraShape { x, y, rotation, fov, range, kind: CameraKind::Dome }))
            }
        }
    }
}

impl From<SceneObject> for ObjectRecord {
    fn from(obj: SceneObject) -> Self {
        let id = obj.id;
        match obj.shape {
            Shape::Rect(RectShape { x, y, w, h }) => Self::Rect { id, x, y, w, h },
            Shape::Segment(SegmentShape { x1, y1, x2, y2, kind: SegmentKind::Wall }) => Self::Line { id, x1, y1, x2, y2 },
            Shape::Segment(SegmentShape { x1, y1, x2, y2, kind: SegmentKind::Wiring }) => {
                Self::Wiring { id, x1, y1, x2, y2 }
            }
            Shape::Text(TextShape { x, y, content, size }) => Self::Text { id, x, y, content, size },
            Shape::Camera(CameraShape { x, y, rotation, fov, range, kind: CameraKind::Bullet }) => {
                Self::BulletCam { id, x, y, rotation, fov, range }
            }
            Shape::Camera(CameraShape { x, y, rotation, fov, range, kind: CameraKind::Dome }) => {
                Self::DomeCam { id, x, y, rotation, fov, range }
            }
        }
    }
}

// =============================================================
// Background, layers, floors
// =============================================================

/// Rasterized page image placed behind a floor's objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Background {
    /// Encoded image (data URL); also the decoded-image cache key.
    pub data: String,
    /// Pixel width of the decoded image.
    pub width: f64,
    /// Pixel height of the decoded image.
    pub height: f64,
    /// World-space placement of the image's top-left corner.
    pub x: f64,
    pub y: f64,
}

fn default_visible() -> bool {
    true
}

/// A named, toggleable group of objects on a floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    #[serde(default)]
    pub objects: Vec<SceneObject>,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

impl Layer {
    /// Empty visible layer with a fresh id.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(new_layer_id(), name)
    }

    #[must_use]
    pub fn with_id(id: impl Into<LayerId>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into(), objects: Vec::new(), visible: true }
    }
}

/// Name of the first default layer on a new floor.
pub const WALLS_LAYER_NAME: &str = "Walls and structure";

/// Name of the second default layer on a new floor; active by default.
pub const CAMERAS_LAYER_NAME: &str = "Cameras and notes";

/// One plan surface with its own layers and optional background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Floor {
    pub name: String,
    pub layers: Vec<Arc<Layer>>,
    pub active_layer_id: LayerId,
    #[serde(default, rename = "pdfBackground")]
    pub background: Option<Background>,
}

impl Floor {
    /// Floor with the two default layers, the second one active.
    #[must_use]
    pub fn with_default_layers(name: impl Into<String>) -> Self {
        let walls = Layer::new(WALLS_LAYER_NAME);
        let cameras = Layer::new(CAMERAS_LAYER_NAME);
        let active_layer_id = cameras.id.clone();
        Self {
            name: name.into(),
            layers: vec![Arc::new(walls), Arc::new(cameras)],
            active_layer_id,
            background: None,
        }
    }

    #[must_use]
    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id).map(AsRef::as_ref)
    }

    /// Mutable access to a layer, copying it first if a snapshot shares it.
    pub fn layer_mut(&mut self, id: &str) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id == id).map(Arc::make_mut)
    }

    #[must_use]
    pub fn active_layer(&self) -> Option<&Layer> {
        self.layer(&self.active_layer_id)
    }

    pub fn active_layer_mut(&mut self) -> Option<&mut Layer> {
        let id = self.active_layer_id.clone();
        self.layer_mut(&id)
    }

    /// Objects on visible layers, bottom layer first, in draw order.
    pub fn visible_objects(&self) -> impl Iterator<Item = &SceneObject> {
        self.layers
            .iter()
            .filter(|l| l.visible)
            .flat_map(|l| l.objects.iter())
    }

    /// Push `obj` onto the active layer.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::NoActiveLayer`] when `activeLayerId` is dangling.
    pub fn add_object(&mut self, obj: SceneObject) -> Result<(), EditError> {
        let layer = self.active_layer_mut().ok_or(EditError::NoActiveLayer)?;
        layer.objects.push(obj);
        Ok(())
    }

    /// Append a visible, empty layer and return its id.
    pub fn add_layer(&mut self, name: impl Into<String>) -> LayerId {
        let layer = Layer::new(name);
        let id = layer.id.clone();
        self.layers.push(Arc::new(layer));
        id
    }

    /// Remove the active layer and activate the first remaining one.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::LastLayer`] when it is the only layer.
    pub fn delete_active_layer(&mut self) -> Result<(), EditError> {
        if self.layers.len() <= 1 {
            return Err(EditError::LastLayer);
        }
        let before = self.layers.len();
        let active = self.active_layer_id.clone();
        self.layers.retain(|l| l.id != active);
        if self.layers.len() == before {
            return Err(EditError::NoActiveLayer);
        }
        if let Some(first) = self.layers.first() {
            self.active_layer_id = first.id.clone();
        }
        Ok(())
    }

    /// Flip a layer's visibility and return the new value.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::LayerNotFound`] for an unknown id.
    pub fn toggle_layer_visibility(&mut self, id: &str) -> Result<bool, EditError> {
        let layer = self.layer_mut(id).ok_or_else(|| EditError::LayerNotFound(id.to_owned()))?;
        layer.visible = !layer.visible;
        Ok(layer.visible)
    }

    /// Make `id` the layer new objects are added to.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::LayerNotFound`] for an unknown id.
    pub fn set_active_layer(&mut self, id: &str) -> Result<(), EditError> {
        if self.layer(id).is_none() {
            return Err(EditError::LayerNotFound(id.to_owned()));
        }
        self.active_layer_id = id.to_owned();
        Ok(())
    }
}

// =============================================================
// Project
// =============================================================

/// Name of the floor in a new project.
pub const DEFAULT_FLOOR_NAME: &str = "Ground floor";

/// The persisted document: floors plus which one is being edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub floors: Vec<Arc<Floor>>,
    pub active_floor_index: usize,
}

impl Default for Project {
    fn default() -> Self {
        Self { floors: vec![Arc::new(Floor::with_default_layers(DEFAULT_FLOOR_NAME))], active_floor_index: 0 }
    }
}

/// Position of an object inside the layer tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectLocation {
    pub floor: usize,
    pub layer: usize,
    pub index: usize,
}

impl Project {
    /// Parse a project document and check its structural invariants.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::Parse`] for malformed JSON and the matching
    /// structural error when [`Project::validate`] fails.
    pub fn from_json(json: &str) -> Result<Self, EditError> {
        let project: Project = serde_json::from_str(json)?;
        project.validate()?;
        Ok(project)
    }

    /// Serialize to the persisted document format.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::Parse`] if serialization fails (non-string map keys
    /// cannot occur in this model, so in practice it does not).
    pub fn to_json(&self, pretty: bool) -> Result<String, EditError> {
        let json = if pretty { serde_json::to_string_pretty(self)? } else { serde_json::to_string(self)? };
        Ok(json)
    }

    /// Check the document invariants: at least one floor, active index in
    /// range, every floor has a layer and a resolvable active layer, object
    /// ids are unique across the project, and every object is well formed.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), EditError> {
        if self.floors.is_empty() {
            return Err(EditError::NoFloors);
        }
        if self.active_floor_index >= self.floors.len() {
            return Err(EditError::FloorOutOfRange { index: self.active_floor_index, len: self.floors.len() });
        }
        let mut seen = HashSet::new();
        for floor in &self.floors {
            if floor.layers.is_empty() {
                return Err(EditError::EmptyFloor(floor.name.clone()));
            }
            if floor.active_layer().is_none() {
                return Err(EditError::LayerNotFound(floor.active_layer_id.clone()));
            }
            for obj in floor.layers.iter().flat_map(|l| l.objects.iter()) {
                if !seen.insert(obj.id.as_str()) {
                    return Err(EditError::DuplicateObjectId(obj.id.clone()));
                }
                if !obj.is_well_formed() {
                    return Err(EditError::InvalidObject(obj.id.clone()));
                }
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn active_floor(&self) -> Option<&Floor> {
        self.floors.get(self.active_floor_index).map(AsRef::as_ref)
    }

    /// Mutable access to the active floor, copying it first if shared.
    pub fn active_floor_mut(&mut self) -> Option<&mut Floor> {
        let index = self.active_floor_index;
        self.floor_mut(index)
    }

    pub fn floor_mut(&mut self, index: usize) -> Option<&mut Floor> {
        self.floors.get_mut(index).map(Arc::make_mut)
    }

    /// Depth-first search floors → layers → objects for `id`.
    #[must_use]
    pub fn locate(&self, id: &str) -> Option<ObjectLocation> {
        for (fi, floor) in self.floors.iter().enumerate() {
            for (li, layer) in floor.layers.iter().enumerate() {
                if let Some(oi) = layer.objects.iter().position(|o| o.id == id) {
                    return Some(ObjectLocation { floor: fi, layer: li, index: oi });
                }
            }
        }
        None
    }

    /// First object with `id` anywhere in the project.
    #[must_use]
    pub fn find_object(&self, id: &str) -> Option<&SceneObject> {
        let loc = self.locate(id)?;
        self.floors[loc.floor].layers[loc.layer].objects.get(loc.index)
    }

    /// Mutable access to the object with `id`, copying only the floor and
    /// layer on its path.
    pub fn find_object_mut(&mut self, id: &str) -> Option<&mut SceneObject> {
        let loc = self.locate(id)?;
        let floor = Arc::make_mut(self.floors.get_mut(loc.floor)?);
        let layer = Arc::make_mut(floor.layers.get_mut(loc.layer)?);
        layer.objects.get_mut(loc.index)
    }

    /// Remove every object with `id` from every layer of every floor.
    /// Returns whether anything was removed.
    pub fn remove_object(&mut self, id: &str) -> bool {
        let mut removed = false;
        for floor in &mut self.floors {
            if !floor.layers.iter().any(|l| l.objects.iter().any(|o| o.id == id)) {
                continue;
            }
            let floor = Arc::make_mut(floor);
            for layer in &mut floor.layers {
                if layer.objects.iter().any(|o| o.id == id) {
                    Arc::make_mut(layer).objects.retain(|o| o.id != id);
                    removed = true;
                }
            }
        }
        removed
    }

    /// Append a floor with default layers, make it active, return its index.
    pub fn add_floor(&mut self, name: impl Into<String>) -> usize {
        self.floors.push(Arc::new(Floor::with_default_layers(name)));
        self.active_floor_index = self.floors.len() - 1;
        self.active_floor_index
    }

    /// Rename floor `index`.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::FloorOutOfRange`] for a bad index.
    pub fn rename_floor(&mut self, index: usize, name: impl Into<String>) -> Result<(), EditError> {
        let len = self.floors.len();
        let floor = self.floor_mut(index).ok_or(EditError::FloorOutOfRange { index, len })?;
        floor.name = name.into();
        Ok(())
    }

    /// Make floor `index` the active one.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::FloorOutOfRange`] for a bad index.
    pub fn switch_floor(&mut self, index: usize) -> Result<(), EditError> {
        if index >= self.floors.len() {
            return Err(EditError::FloorOutOfRange { index, len: self.floors.len() });
        }
        self.active_floor_index = index;
        Ok(())
    }
}
