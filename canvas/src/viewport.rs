#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use crate::consts::{MAX_SCALE, MIN_SCALE};
use crate::geom::Point;

/// Pan/zoom state for the editing surface.
///
/// `offset_x` / `offset_y` are in screen pixels; `scale` is a uniform factor
/// clamped to `[MIN_SCALE, MAX_SCALE]`. This is session state: it is never
/// written into the project document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub offset_x: f64,
    pub offset_y: f64,
    pub scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { offset_x: 0.0, offset_y: 0.0, scale: 1.0 }
    }
}

impl Viewport {
    /// Convert a screen-space point (device pixels) to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.offset_x) / self.scale,
            y: (screen.y - self.offset_y) / self.scale,
        }
    }

    /// Convert a world-space point to screen coordinates.
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point {
            x: world.x * self.scale + self.offset_x,
            y: world.y * self.scale + self.offset_y,
        }
    }

    /// Convert a screen-space length (pixels) to a world-space length.
    ///
    /// Handles, hit slop and selection outlines use this so they keep a
    /// constant on-screen size at every zoom level.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.scale
    }

    /// Multiply the scale by `factor`, keeping the world point under
    /// `screen_center` fixed on screen.
    ///
    /// Returns `false` (and changes nothing) when the clamped scale equals the
    /// current one, e.g. zooming in while already at `MAX_SCALE`.
    pub fn zoom_at(&mut self, factor: f64, screen_center: Point) -> bool {
        let new_scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        if !new_scale.is_finite() || new_scale == self.scale {
            return false;
        }

        let world_before = self.screen_to_world(screen_center);
        self.scale = new_scale;
        self.offset_x = screen_center.x - world_before.x * new_scale;
        self.offset_y = screen_center.y - world_before.y * new_scale;
        true
    }

    /// Translate the view by a raw screen-space delta.
    pub fn pan(&mut self, delta: Point) {
        self.offset_x += delta.x;
        self.offset_y += delta.y;
    }
}
