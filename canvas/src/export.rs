//! Export: the flattened visible content of a floor and the page it lands on.
//!
//! The PDF collaborator receives an [`ExportRequest`], paints it with
//! [`crate::render::draw_export`] onto a surface of `bounds` size, and lays
//! the result out on a single page.

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use crate::consts::EXPORT_PADDING;
use crate::doc::{Background, Floor, SceneObject};
use crate::error::EditError;
use crate::geom::Point;

/// Axis-aligned world-space box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl ExportBounds {
    fn around(p: Point) -> Self {
        Self { min_x: p.x, min_y: p.y, max_x: p.x, max_y: p.y }
    }

    fn include(&mut self, p: Point) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    /// The same box grown by `pad` on every side.
    #[must_use]
    pub fn padded(&self, pad: f64) -> Self {
        Self { min_x: self.min_x - pad, min_y: self.min_y - pad, max_x: self.max_x + pad, max_y: self.max_y + pad }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.min_x, self.min_y)
    }
}

/// Page orientation for the exported document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Everything the PDF collaborator needs for one floor.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    pub file_name: String,
    /// Content box with padding applied; also the page size in pixels.
    pub bounds: ExportBounds,
    pub orientation: Orientation,
    pub background: Option<Background>,
    /// Visible objects in draw order.
    pub objects: Vec<SceneObject>,
}

/// Unpadded box around the floor's background and visible objects.
#[must_use]
pub fn content_bounds(floor: &Floor) -> Option<ExportBounds> {
    let mut bounds: Option<ExportBounds> = None;
    let mut include = |p: Point| match bounds.as_mut() {
        Some(b) => b.include(p),
        None => bounds = Some(ExportBounds::around(p)),
    };
    if let Some(bg) = &floor.background {
        include(Point::new(bg.x, bg.y));
        include(Point::new(bg.x + bg.width, bg.y + bg.height));
    }
    for obj in floor.visible_objects() {
        let (min, max) = obj.shape.bounds();
        include(min);
        include(max);
    }
    bounds
}

/// Build the export request for `floor`.
///
/// # Errors
///
/// Returns [`EditError::NothingToExport`] when the floor has no background
/// and no visible objects.
pub fn export_request(floor: &Floor) -> Result<ExportRequest, EditError> {
    let bounds = content_bounds(floor).ok_or(EditError::NothingToExport)?.padded(EXPORT_PADDING);
    let orientation = if bounds.width() > bounds.height() { Orientation::Landscape } else { Orientation::Portrait };
    Ok(ExportRequest {
        file_name: format!("{}_export.pdf", floor.name),
        bounds,
        orientation,
        background: floor.background.clone(),
        objects: floor.visible_objects().cloned().collect(),
    })
}
