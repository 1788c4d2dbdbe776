//! Shared constants for the form builder core.

/// Vertical tolerance band within which `order` decides element sequencing
/// instead of the raw `y` coordinate.
pub const ORDER_TOLERANCE: f64 = 5.0;

/// Vertical spacing applied after the last element when computing an
/// end-of-list insertion point.
pub const INSERTION_SPACING: f64 = 80.0;

/// Default grid cell size for snap-to-grid operations.
pub const DEFAULT_GRID_SIZE: f64 = 10.0;

/// Default bound on the undo and redo stacks.
pub const DEFAULT_MAX_HISTORY: usize = 100;

/// Window within which rapid successive property edits merge into a single
/// history entry, in milliseconds.
pub const MERGE_WINDOW_MS: i64 = 1_000;

/// Default quiet period before a pending command batch is flushed to
/// history, in milliseconds.
pub const BATCH_DELAY_MS: u64 = 300;

/// Zoom clamp range and step factor for the canvas viewport.
pub const MIN_ZOOM: f64 = 0.25;
pub const MAX_ZOOM: f64 = 4.0;
pub const ZOOM_STEP: f64 = 1.2;

/// Default canvas dimensions for a new form.
pub const DEFAULT_CANVAS_WIDTH: f64 = 800.0;
pub const DEFAULT_CANVAS_HEIGHT: f64 = 1200.0;
