//! Playback runtime for Stagehand scenes.
//!
//! Runs a scene the way the exported game does: a live copy of the scene's
//! objects, user scripts in a rhai sandbox, tweens advanced per frame, and
//! clicks dispatched to script handlers. The same [`session::Session`] backs
//! the browser player ([`web::StagePlayer`]) and headless playback from the
//! command line.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`session`] | Frame loop, click dispatch, start/stop |
//! | [`sandbox`] | Script engine, script-facing API, fault capture |
//! | [`tween`] | Property interpolation over session time |
//! | [`live`] | Shared, mutable copy of a scene's objects |
//! | [`export`] | Standalone HTML and JSON export |
//! | [`web`] | `requestAnimationFrame`-driven browser player |

pub mod export;
pub mod live;
pub mod sandbox;
pub mod session;
pub mod tween;
pub mod web;
