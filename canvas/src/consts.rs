//! Shared numeric constants for the canvas crate.

use std::f64::consts::FRAC_PI_2;

// ── Units ───────────────────────────────────────────────────────

/// World units per meter. Drives the grid pitch, measurement labels and the
/// wiring budget.
pub const PIXELS_PER_METER: f64 = 50.0;

// ── Viewport ────────────────────────────────────────────────────

/// Smallest allowed viewport scale.
pub const MIN_SCALE: f64 = 0.1;

/// Largest allowed viewport scale.
pub const MAX_SCALE: f64 = 10.0;

/// Scale factor applied per wheel notch.
pub const WHEEL_ZOOM_STEP: f64 = 1.1;

/// Scale factor applied by the zoom in / zoom out buttons.
pub const BUTTON_ZOOM_STEP: f64 = 1.2;

// ── Hit-testing ─────────────────────────────────────────────────

/// Rectangle corner handle size in screen pixels; also its hit radius.
pub const HANDLE_SIZE_PX: f64 = 8.0;

/// Distance from a camera's center to its rotate handle, in screen pixels.
pub const ROTATE_HANDLE_OFFSET_PX: f64 = 30.0;

/// Hit radius of the rotate handle, in screen pixels.
pub const ROTATE_HANDLE_HIT_PX: f64 = 8.0;

/// Drawn radius of the rotate handle, in screen pixels.
pub const ROTATE_HANDLE_RADIUS_PX: f64 = 6.0;

/// Hit radius around a camera's center, in screen pixels.
pub const CAMERA_HIT_RADIUS_PX: f64 = 20.0;

/// Hit slop around walls and wiring, in screen pixels.
pub const SEGMENT_HIT_PX: f64 = 10.0;

// ── Selection UI ────────────────────────────────────────────────

/// Gap between an object and its selection outline, in screen pixels.
pub const SELECTION_PADDING_PX: f64 = 5.0;

/// Selection outline dash length, in screen pixels.
pub const SELECTION_DASH_PX: f64 = 5.0;

/// Measurement label font size, in screen pixels.
pub const MEASUREMENT_FONT_PX: f64 = 12.0;

/// Gap between a rectangle edge and its dimension label, in world units.
pub const RECT_LABEL_OFFSET: f64 = 5.0;

/// Lift of a segment's length label above its midpoint, in world units.
pub const SEGMENT_LABEL_OFFSET: f64 = 8.0;

// ── Drawing tools ───────────────────────────────────────────────

/// Minimum drag extent (world units) before a drawn shape is committed.
pub const MIN_DRAW_SIZE: f64 = 5.0;

// ── Visibility ──────────────────────────────────────────────────

/// Angular step of the uniform field-of-view sweep, in degrees.
pub const FOV_SWEEP_STEP_DEG: f64 = 2.0;

/// Offset (radians) of the extra rays cast either side of an occluder corner.
pub const SILHOUETTE_EPSILON: f64 = 0.001;

/// Tolerance (radians) when testing whether an angle falls inside the fov.
pub const FOV_FILTER_EPSILON: f64 = 0.001;

// ── Defaults for placed objects ─────────────────────────────────

/// Range of a newly placed camera, in world units.
pub const DEFAULT_CAMERA_RANGE: f64 = 100.0;

/// Rotation of a newly placed camera (pointing up the screen).
pub const DEFAULT_CAMERA_ROTATION: f64 = -FRAC_PI_2;

/// Field of view of a newly placed camera, in degrees.
pub const DEFAULT_CAMERA_FOV: f64 = 90.0;

/// Content of a newly placed text label.
pub const DEFAULT_TEXT_CONTENT: &str = "Text";

/// Font size of a newly placed text label, in pixels.
pub const DEFAULT_TEXT_SIZE: f64 = 16.0;

// ── Property ranges ─────────────────────────────────────────────

/// Narrowest camera field of view, in degrees.
pub const MIN_FOV: f64 = 10.0;

/// Widest field of view for a directional (bullet) camera.
pub const MAX_BULLET_FOV: f64 = 180.0;

/// Widest field of view for an omnidirectional (dome) camera.
pub const MAX_DOME_FOV: f64 = 359.0;

/// Camera range bounds, in world units.
pub const MIN_CAMERA_RANGE: f64 = 20.0;
pub const MAX_CAMERA_RANGE: f64 = 400.0;

/// Text size bounds, in pixels.
pub const MIN_TEXT_SIZE: f64 = 8.0;
pub const MAX_TEXT_SIZE: f64 = 48.0;

// ── Export ──────────────────────────────────────────────────────

/// Padding around exported content, in world units.
pub const EXPORT_PADDING: f64 = 50.0;
