//! Viewport and coordinate transformation for the form canvas.
//!
//! Handles conversion between screen coordinates and canvas coordinates.
//! The form canvas is y-down screen space, so the mapping is a plain
//! scale-and-pan with no axis flip.

use std::fmt;

use formkit_core::constants::{MAX_ZOOM, MIN_ZOOM, ZOOM_STEP};

use crate::positioning::{Point, Rect};

/// Viewport transformation state (zoom and pan).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    zoom: f64,
    pan_x: f64,
    pan_y: f64,
    view_width: f64,
    view_height: f64,
}

impl Viewport {
    /// Creates a new viewport with the given visible dimensions.
    pub fn new(view_width: f64, view_height: f64) -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
            view_width,
            view_height,
        }
    }

    /// Gets the visible width in screen units.
    pub fn view_width(&self) -> f64 {
        self.view_width
    }

    /// Gets the visible height in screen units.
    pub fn view_height(&self) -> f64 {
        self.view_height
    }

    /// Sets the visible dimensions (typically on window resize).
    pub fn set_view_size(&mut self, width: f64, height: f64) {
        self.view_width = width;
        self.view_height = height;
    }

    /// Gets the current zoom level (1.0 = 100%).
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Sets the zoom level, clamped to the supported range.
    pub fn set_zoom(&mut self, zoom: f64) {
        if (MIN_ZOOM..=MAX_ZOOM).contains(&zoom) {
            self.zoom = zoom;
        }
    }

    /// Zooms in by one step.
    pub fn zoom_in(&mut self) {
        self.set_zoom((self.zoom * ZOOM_STEP).min(MAX_ZOOM));
    }

    /// Zooms out by one step.
    pub fn zoom_out(&mut self) {
        self.set_zoom((self.zoom / ZOOM_STEP).max(MIN_ZOOM));
    }

    /// Resets zoom to 1.0.
    pub fn reset_zoom(&mut self) {
        self.zoom = 1.0;
    }

    /// Gets the pan offset (x).
    pub fn pan_x(&self) -> f64 {
        self.pan_x
    }

    /// Gets the pan offset (y).
    pub fn pan_y(&self) -> f64 {
        self.pan_y
    }

    /// Sets the pan offset.
    pub fn set_pan(&mut self, x: f64, y: f64) {
        self.pan_x = x;
        self.pan_y = y;
    }

    /// Pans by a delta amount.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Converts screen coordinates to canvas coordinates.
    ///
    /// ```text
    /// canvas_x = (screen_x - pan_x) / zoom
    /// canvas_y = (screen_y - pan_y) / zoom
    /// ```
    pub fn screen_to_canvas(&self, screen_x: f64, screen_y: f64) -> Point {
        Point::new(
            (screen_x - self.pan_x) / self.zoom,
            (screen_y - self.pan_y) / self.zoom,
        )
    }

    /// Converts canvas coordinates to screen coordinates.
    pub fn canvas_to_screen(&self, canvas_x: f64, canvas_y: f64) -> Point {
        Point::new(
            canvas_x * self.zoom + self.pan_x,
            canvas_y * self.zoom + self.pan_y,
        )
    }

    /// The canvas-space rectangle currently visible on screen.
    pub fn visible_rect(&self) -> Rect {
        let top_left = self.screen_to_canvas(0.0, 0.0);
        let bottom_right = self.screen_to_canvas(self.view_width, self.view_height);
        Rect::new(top_left.x, top_left.y, bottom_right.x, bottom_right.y)
    }

    /// Centers the viewport on a canvas coordinate.
    pub fn center_on(&mut self, canvas_x: f64, canvas_y: f64) {
        self.pan_x = self.view_width / 2.0 - canvas_x * self.zoom;
        self.pan_y = self.view_height / 2.0 - canvas_y * self.zoom;
    }

    /// Resets to default state (1:1 zoom, no pan).
    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.pan_x = 0.0;
        self.pan_y = 0.0;
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Zoom: {:.2}x | Pan: ({:.1}, {:.1})",
            self.zoom, self.pan_x, self.pan_y
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1200.0, 800.0)
    }
}
