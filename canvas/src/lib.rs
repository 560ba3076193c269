//! Scene engine for the floor-plan coverage editor.
//!
//! This crate owns everything between raw pointer input and the pixels a host
//! paints: translating device events into document edits, keeping the
//! pan/zoom viewport, hit-testing objects and handles, computing each
//! camera's occlusion-aware coverage polygon, and recording every edit as an
//! undoable snapshot. The host is responsible only for wiring input events to
//! [`engine::EngineCore`], implementing [`render::Painter`] for its drawing
//! surface, and persisting the document.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine: input handling, tool actions, queries |
//! | [`doc`] | Project / floor / layer / object model and its invariants |
//! | [`history`] | Linear snapshot history behind every edit |
//! | [`geom`] | Point math, segment intersection, rectangle handles |
//! | [`viewport`] | Pan/zoom transform and coordinate conversions |
//! | [`visibility`] | Camera coverage polygons by ray casting against occluders |
//! | [`hit`] | Hit-testing against objects and selection handles |
//! | [`input`] | Tools, buttons, cursors, and the gesture state machine |
//! | [`render`] | Painter contract and scene drawing order |
//! | [`background`] | Page rasterizer contract and decoded-image cache |
//! | [`export`] | Export bounds and flattened content for the PDF collaborator |
//! | [`measure`] | World-unit to meter conversions and the wiring budget |
//! | [`error`] | Edit and load errors |
//! | [`consts`] | Shared numeric constants (zoom limits, handle sizes, etc.) |
//! | `web` | Browser canvas painter and engine wrapper (`web` feature) |

pub mod background;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod error;
pub mod export;
pub mod geom;
pub mod history;
pub mod hit;
pub mod input;
pub mod measure;
pub mod render;
pub mod viewport;
pub mod visibility;
#[cfg(feature = "web")]
pub mod web;
