//! Shared numeric constants for the canvas crate.

// ── Geometry ────────────────────────────────────────────────────

/// Smallest width or height an interactive resize may produce.
pub const MIN_OBJECT_SIZE: f64 = 20.0;

/// Default canvas width for new scenes.
pub const DEFAULT_SCENE_WIDTH: f64 = 800.0;

/// Default canvas height for new scenes.
pub const DEFAULT_SCENE_HEIGHT: f64 = 600.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Side length of a corner resize handle; also its grab tolerance.
pub const HANDLE_SIZE: f64 = 12.0;

/// Distance from the top edge to the rotate handle, in local units.
pub const ROTATE_HANDLE_OFFSET: f64 = 30.0;

/// Grab radius of the rotate handle.
pub const ROTATE_HANDLE_TOLERANCE: f64 = 10.0;

/// Angle added to the pointer bearing so that "up" from center is 0°.
pub const ROTATE_BEARING_OFFSET_DEG: f64 = 90.0;

// ── Rendering ───────────────────────────────────────────────────

/// Spacing of the editor background grid.
pub const GRID_SPACING: f64 = 50.0;

/// Default label font size in pixels.
pub const DEFAULT_FONT_SIZE: f64 = 16.0;
