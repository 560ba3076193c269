//! Errors surfaced by document edits and loads.
//!
//! None of these are fatal: each one means an edit was rejected before it
//! touched the document, so no history entry was created.

use crate::doc::{LayerId, ObjectId};

/// Error returned by rejected structural edits, loads and exports.
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    /// Deleting the only layer of a floor.
    #[error("cannot delete the last layer of a floor")]
    LastLayer,
    /// A layer id that does not exist on the active floor.
    #[error("layer not found: {0}")]
    LayerNotFound(LayerId),
    /// A floor index past the end of the floor list.
    #[error("floor index {index} out of range (project has {len} floors)")]
    FloorOutOfRange { index: usize, len: usize },
    /// The active floor's `activeLayerId` points at no layer.
    #[error("floor has no active layer")]
    NoActiveLayer,
    /// A project with an empty floor list.
    #[error("project has no floors")]
    NoFloors,
    /// A floor with an empty layer list.
    #[error("floor {0:?} has no layers")]
    EmptyFloor(String),
    /// Two objects share an id.
    #[error("duplicate object id: {0}")]
    DuplicateObjectId(ObjectId),
    /// An object with non-finite coordinates or a property out of range.
    #[error("object {0} has an out-of-range property")]
    InvalidObject(ObjectId),
    /// Export requested on a floor with nothing visible.
    #[error("nothing to export")]
    NothingToExport,
    /// The project document is not valid JSON for the model.
    #[error("failed to parse project: {0}")]
    Parse(#[from] serde_json::Error),
}
