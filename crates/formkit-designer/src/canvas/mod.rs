//! Canvas layer: selection plus multi-element operations over the form's
//! element collection.
//!
//! The canvas does not own elements and never touches undo/redo. It holds
//! selection and viewport state, and computes position updates that the
//! command layer turns into history entries.

mod operations;
mod types;

pub use types::{Alignment, DistributeDirection};

use formkit_core::constants::DEFAULT_GRID_SIZE;
use formkit_core::FormElement;

use crate::positioning::{self, Rect};
use crate::selection::SelectionManager;
use crate::viewport::Viewport;

/// Canvas state: selection, viewport, and grid settings.
#[derive(Debug, Clone)]
pub struct Canvas {
    pub selection: SelectionManager,
    viewport: Viewport,
    grid_size: f64,
    snap_enabled: bool,
}

impl Canvas {
    /// Creates a new canvas with default viewport dimensions.
    pub fn new() -> Self {
        Self {
            selection: SelectionManager::new(),
            viewport: Viewport::default(),
            grid_size: DEFAULT_GRID_SIZE,
            snap_enabled: true,
        }
    }

    /// Creates a canvas with specified view dimensions.
    pub fn with_view_size(width: f64, height: f64) -> Self {
        Self {
            viewport: Viewport::new(width, height),
            ..Self::new()
        }
    }

    /// Gets the viewport.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Gets the viewport mutably.
    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// Gets the grid cell size.
    pub fn grid_size(&self) -> f64 {
        self.grid_size
    }

    /// Sets the grid cell size. Non-positive values disable snapping.
    pub fn set_grid_size(&mut self, size: f64) {
        self.grid_size = size;
    }

    /// Whether snap-to-grid is applied to canvas operations.
    pub fn snap_enabled(&self) -> bool {
        self.snap_enabled
    }

    /// Enables or disables snap-to-grid.
    pub fn set_snap_enabled(&mut self, enabled: bool) {
        self.snap_enabled = enabled;
    }

    /// The grid size to apply for snapping, or `None` when disabled.
    pub(crate) fn effective_grid(&self) -> Option<f64> {
        (self.snap_enabled && self.grid_size > 0.0).then_some(self.grid_size)
    }

    /// Bounding box of the selected elements' positions, or `None` when the
    /// selection is empty.
    pub fn selection_bounds(&self, elements: &[FormElement]) -> Option<Rect> {
        let selected: Vec<FormElement> = elements
            .iter()
            .filter(|e| self.selection.is_selected(e.id))
            .cloned()
            .collect();
        positioning::calculate_bounding_box(&selected)
    }

    /// Elements whose position falls inside the current view.
    pub fn visible_elements<'a>(&self, elements: &'a [FormElement]) -> Vec<&'a FormElement> {
        let view = self.viewport.visible_rect();
        elements
            .iter()
            .filter(|e| {
                view.contains_point(&crate::positioning::Point::new(
                    e.position.x,
                    e.position.y,
                ))
            })
            .collect()
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}
