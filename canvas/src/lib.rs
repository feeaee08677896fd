//! Scene editing core for the Stagehand 2D editor.
//!
//! This crate compiles to WebAssembly for the browser editor and natively for
//! the command-line tools. It owns the project document, the transform and
//! hit-testing math behind select/move/resize/rotate gestures, z-ordering,
//! and rendering through the [`surface::Surface`] abstraction. The host layer
//! only wires DOM events to the engine and reacts to the returned
//! [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Editor engine and the testable [`engine::EngineCore`] |
//! | [`doc`] | Project document: scenes, objects, sprites, scripts, animations |
//! | [`transform`] | Local/world coordinate conversion for rotated objects |
//! | [`hit`] | Hit-testing against object bodies and handles |
//! | [`input`] | UI state and the gesture state machine |
//! | [`layer`] | Draw order, hit order, and layer reordering |
//! | [`render`] | Editor and runtime scene rendering |
//! | [`surface`] | Drawing-call abstraction and the recording surface |
//! | [`web`] | Canvas2D surface for the browser |
//! | [`snapshot`] | Whole-project JSON import/export |
//! | [`consts`] | Shared numeric constants (handle sizes, minimum sizes, etc.) |

pub mod consts;
pub mod doc;
pub mod engine;
pub mod hit;
pub mod input;
pub mod layer;
pub mod render;
pub mod snapshot;
pub mod surface;
pub mod transform;
pub mod web;
