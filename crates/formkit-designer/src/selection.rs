//! Element selection state and selection operations.

use std::collections::HashSet;

use formkit_core::FormElement;
use uuid::Uuid;

use crate::positioning::Rect;

/// Manages element selection state for the canvas layer.
///
/// `SelectionManager` is responsible for:
/// - Tracking which element is the "primary" selection
/// - Multi-select operations (Shift+click toggling)
/// - Rectangle-based selection (drag-select)
///
/// # Selection Model
///
/// - **Primary selection**: one element id, driving the property panel
/// - **Selection set**: all selected ids, driving align/distribute/move
///
/// The manager is independent of undo/redo; selection changes are not
/// history entries and are exempt from the undo/redo inverse law.
#[derive(Debug, Clone, Default)]
pub struct SelectionManager {
    primary: Option<Uuid>,
    selected: HashSet<Uuid>,
}

impl SelectionManager {
    /// Creates a new `SelectionManager` with no selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the primary selected element id.
    pub fn primary(&self) -> Option<Uuid> {
        self.primary
    }

    /// Returns `true` if the given element is selected.
    pub fn is_selected(&self, id: Uuid) -> bool {
        self.selected.contains(&id)
    }

    /// Number of selected elements.
    pub fn count(&self) -> usize {
        self.selected.len()
    }

    /// Returns `true` if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// The selected ids, unordered.
    pub fn ids(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.selected.iter().copied()
    }

    /// Selects a single element.
    ///
    /// With `multi` false the previous selection is replaced; with `multi`
    /// true the element is toggled in and out of the selection set without
    /// affecting other members (Shift+click behavior).
    pub fn select(&mut self, id: Uuid, multi: bool) {
        if !multi {
            self.selected.clear();
            self.selected.insert(id);
            self.primary = Some(id);
            return;
        }

        if self.selected.contains(&id) {
            self.selected.remove(&id);
            if self.primary == Some(id) {
                self.primary = self.selected.iter().next().copied();
            }
        } else {
            self.selected.insert(id);
            self.primary = Some(id);
        }
    }

    /// Selects every element in the collection. The last element in
    /// sequence order becomes primary.
    pub fn select_all(&mut self, elements: &[FormElement]) {
        self.selected = elements.iter().map(|e| e.id).collect();
        let mut sorted: Vec<&FormElement> = elements.iter().collect();
        sorted.sort_by(|a, b| a.position.sequence_cmp(&b.position));
        self.primary = sorted.last().map(|e| e.id);
    }

    /// Selects all elements whose position falls inside the rectangle.
    /// With `multi` true the matches are added to the current selection.
    pub fn select_in_rect(&mut self, elements: &[FormElement], rect: &Rect, multi: bool) {
        if !multi {
            self.clear();
        }
        for el in elements {
            let p = crate::positioning::Point::new(el.position.x, el.position.y);
            if rect.contains_point(&p) {
                self.selected.insert(el.id);
                if self.primary.is_none() {
                    self.primary = Some(el.id);
                }
            }
        }
    }

    /// Removes a single element from the selection.
    pub fn deselect(&mut self, id: Uuid) {
        self.selected.remove(&id);
        if self.primary == Some(id) {
            self.primary = self.selected.iter().next().copied();
        }
    }

    /// Clears the selection.
    pub fn clear(&mut self) {
        self.selected.clear();
        self.primary = None;
    }

    /// Drops ids that no longer exist in the element collection.
    ///
    /// Called after removals so the selection never points at dead ids.
    pub fn retain_existing(&mut self, elements: &[FormElement]) {
        let live: HashSet<Uuid> = elements.iter().map(|e| e.id).collect();
        self.selected.retain(|id| live.contains(id));
        if let Some(p) = self.primary {
            if !live.contains(&p) {
                self.primary = self.selected.iter().next().copied();
            }
        }
    }
}
