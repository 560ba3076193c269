//! Input model: tools, modifier keys, pointer buttons, cursors, and the
//! gesture state machine.
//!
//! `Tool` and `Modifiers` capture the user's intent at the time of a pointer
//! event. `InputState` is the gesture tracked between pointer-down and
//! pointer-up; each variant carries the pre-gesture values needed to compute
//! absolute updates from the gesture start rather than accumulating per-frame
//! deltas.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::doc::{CameraKind, ObjectId, RectShape, SegmentKind, Shape};
use crate::geom::{Corner, Point};
use crate::hit::{Hit, HitPart};

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Select, move, resize and rotate existing objects.
    #[default]
    Select,
    /// Drag the floor's background image.
    MoveBackground,
    /// Place a text label.
    Text,
    /// Draw a rectangle.
    Rect,
    /// Draw a wall segment.
    Wall,
    /// Draw a wiring segment.
    Wiring,
    /// Place a directional camera.
    BulletCam,
    /// Place an omnidirectional camera.
    DomeCam,
}

impl Tool {
    /// Tools that create an object by dragging out its extent.
    #[must_use]
    pub fn is_drawing(self) -> bool {
        matches!(self, Self::Rect | Self::Wall | Self::Wiring)
    }

    /// Tools that create an object with a single press.
    #[must_use]
    pub fn is_placement(self) -> bool {
        matches!(self, Self::Text | Self::BulletCam | Self::DomeCam)
    }

    #[must_use]
    pub fn camera_kind(self) -> Option<CameraKind> {
        match self {
            Self::BulletCam => Some(CameraKind::Bullet),
            Self::DomeCam => Some(CameraKind::Dome),
            _ => None,
        }
    }

    #[must_use]
    pub fn segment_kind(self) -> Option<SegmentKind> {
        match self {
            Self::Wall => Some(SegmentKind::Wall),
            Self::Wiring => Some(SegmentKind::Wiring),
            _ => None,
        }
    }

    /// Parse the tool names used by hosts (`"select"`, `"movePdf"`, `"rect"`, ...).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "select" => Self::Select,
            "movePdf" | "moveBackground" => Self::MoveBackground,
            "text" => Self::Text,
            "rect" => Self::Rect,
            "line" | "wall" => Self::Wall,
            "wiring" => Self::Wiring,
            "bulletCam" => Self::BulletCam,
            "domeCam" => Self::DomeCam,
            _ => return None,
        })
    }
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Command on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Pointer button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button or a single touch.
    Primary,
    /// Middle mouse button; always pans.
    Middle,
    /// Right mouse button.
    Secondary,
}

/// A keyboard key as reported by the host (e.g. `"Delete"`, `"z"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    pub dx: f64,
    /// Positive = scroll down = zoom out.
    pub dy: f64,
}

/// Pointer cursor shown over the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Move,
    Alias,
    NwseResize,
    NeswResize,
    Grab,
    Grabbing,
    Copy,
    Crosshair,
}

impl Cursor {
    /// CSS `cursor` keyword.
    #[must_use]
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Move => "move",
            Self::Alias => "alias",
            Self::NwseResize => "nwse-resize",
            Self::NeswResize => "nesw-resize",
            Self::Grab => "grab",
            Self::Grabbing => "grabbing",
            Self::Copy => "copy",
            Self::Crosshair => "crosshair",
        }
    }
}

/// Cursor for hovering with `tool` over whatever `hit` resolved to.
#[must_use]
pub fn cursor_for(tool: Tool, hit: Option<&Hit>) -> Cursor {
    match tool {
        Tool::Select => match hit.map(|h| h.part) {
            Some(HitPart::Body) => Cursor::Move,
            Some(HitPart::RotateHandle) => Cursor::Alias,
            Some(HitPart::ResizeHandle(Corner::TopLeft | Corner::BottomRight)) => Cursor::NwseResize,
            Some(HitPart::ResizeHandle(_)) => Cursor::NeswResize,
            None => Cursor::Default,
        },
        Tool::MoveBackground => Cursor::Grab,
        Tool::Text | Tool::BulletCam | Tool::DomeCam => Cursor::Copy,
        Tool::Rect | Tool::Wall | Tool::Wiring => Cursor::Crosshair,
    }
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub tool: Tool,
    /// Selected object id. Re-resolved against the current project on every read.
    pub selected_id: Option<ObjectId>,
}

/// What a panning gesture moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanTarget {
    /// The viewport offset, in screen pixels.
    Viewport,
    /// The active floor's background placement, in world units.
    Background,
}

/// Internal state for the input state machine.
///
/// Gestures that edit the document carry a `recorded` flag: the first frame
/// that changes something records a history entry and later frames amend it,
/// so one gesture is one undo step.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Dragging the viewport or the background.
    Panning {
        /// Screen position of the previous pointer event.
        last_screen: Point,
        target: PanTarget,
        recorded: bool,
    },
    /// Two touches active; pointer panning is suppressed.
    PinchZooming {
        /// Distance between the touches at the previous frame.
        last_distance: f64,
    },
    /// Moving an existing object.
    Dragging {
        id: ObjectId,
        /// World position of the press.
        start_world: Point,
        /// Object geometry at the press.
        orig: Shape,
        recorded: bool,
    },
    /// Dragging one corner of a rectangle.
    Resizing {
        id: ObjectId,
        corner: Corner,
        orig: RectShape,
        recorded: bool,
    },
    /// Turning a camera by its rotate handle.
    Rotating { id: ObjectId, recorded: bool },
    /// Dragging out a new rectangle or segment.
    Drawing { start_world: Point, current_world: Point },
}

/// Rectangle after dragging `corner` of `orig` to `pointer`.
///
/// The diagonally opposite corner stays fixed. Width and height may come out
/// negative when the pointer crosses that corner; see [`RectShape::normalized`].
#[must_use]
pub fn resize_rect(orig: &RectShape, corner: Corner, pointer: Point) -> RectShape {
    let RectShape { mut x, mut y, mut w, mut h } = *orig;
    match corner {
        Corner::TopLeft => {
            w += x - pointer.x;
            h += y - pointer.y;
            x = pointer.x;
            y = pointer.y;
        }
        Corner::TopRight => {
            w = pointer.x - x;
            h += y - pointer.y;
            y = pointer.y;
        }
        Corner::BottomLeft => {
            w += x - pointer.x;
            h = pointer.y - y;
            x = pointer.x;
        }
        Corner::BottomRight => {
            w = pointer.x - x;
            h = pointer.y - y;
        }
    }
    RectShape { x, y, w, h }
}
