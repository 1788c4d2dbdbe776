//! Multi-element manipulation operations for Canvas.

use formkit_core::{ElementPosition, FormElement, Size};
use uuid::Uuid;

use super::types::{Alignment, DistributeDirection};
use super::Canvas;
use crate::positioning;

impl Canvas {
    /// Collects the selected elements in input order.
    fn selected_elements(&self, elements: &[FormElement]) -> Vec<FormElement> {
        elements
            .iter()
            .filter(|e| self.selection.is_selected(e.id))
            .cloned()
            .collect()
    }

    /// Computes new positions for moving every selected element by
    /// (dx, dy), constrained to the canvas and snapped to the grid when
    /// snapping is on.
    ///
    /// Returns (id, new position) pairs; input is not mutated.
    pub fn move_selected(
        &self,
        elements: &[FormElement],
        canvas_size: Size,
        dx: f64,
        dy: f64,
    ) -> Vec<(Uuid, ElementPosition)> {
        let mut updates = Vec::new();

        for el in elements.iter().filter(|e| self.selection.is_selected(e.id)) {
            let mut pos = ElementPosition::new(
                el.position.x + dx,
                el.position.y + dy,
                el.position.order,
            );
            if let Some(grid) = self.effective_grid() {
                pos = positioning::snap_to_grid(pos, grid);
            }
            // Position-only model: constrain the anchor point itself
            pos = positioning::constrain_to_canvas(pos, canvas_size, Size::new(0.0, 0.0));
            if pos != el.position {
                updates.push((el.id, pos));
            }
        }

        updates
    }

    /// Computes alignment updates for the selected elements.
    ///
    /// Follows the geometry contract: fewer than two selected elements is a
    /// no-op; left/top align to the minimum, right/bottom to the maximum,
    /// center/middle to the mean.
    pub fn align_selected(
        &self,
        elements: &[FormElement],
        alignment: Alignment,
    ) -> Vec<(Uuid, ElementPosition)> {
        let selected = self.selected_elements(elements);
        let mut updates: Vec<(Uuid, ElementPosition)> =
            positioning::align_elements(&selected, alignment)
                .into_iter()
                .collect();
        // Deterministic ordering for the command layer
        updates.sort_by_key(|(id, _)| *id);
        updates
    }

    /// Computes distribution updates for the selected elements.
    /// Fewer than three selected elements is a no-op.
    pub fn distribute_selected(
        &self,
        elements: &[FormElement],
        direction: DistributeDirection,
    ) -> Vec<(Uuid, ElementPosition)> {
        let selected = self.selected_elements(elements);
        let mut updates: Vec<(Uuid, ElementPosition)> =
            positioning::distribute_elements(&selected, direction)
                .into_iter()
                .collect();
        updates.sort_by_key(|(id, _)| *id);
        updates
    }

    /// Computes snapped positions for every selected element that is off
    /// the grid.
    pub fn snap_selected_to_grid(
        &self,
        elements: &[FormElement],
    ) -> Vec<(Uuid, ElementPosition)> {
        let Some(grid) = self.effective_grid() else {
            return Vec::new();
        };

        let mut updates = Vec::new();
        for el in elements.iter().filter(|e| self.selection.is_selected(e.id)) {
            let snapped = positioning::snap_to_grid(el.position, grid);
            if snapped != el.position {
                updates.push((el.id, snapped));
            }
        }
        updates
    }
}
