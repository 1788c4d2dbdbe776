//! Builder state aggregate for a single editing session.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH};
use crate::element::FormElement;
use crate::error::{Result, StateError};

/// Width and height pair used for canvas and element dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Creates a new size.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// The aggregate root for one form being edited.
///
/// Exactly one `FormBuilderState` is live per editing session and it is
/// owned exclusively by one command manager; every mutation flows through
/// the command interface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormBuilderState {
    pub form_id: Uuid,
    pub title: String,
    pub description: String,
    /// Full ordered collection of placed elements.
    pub elements: Vec<FormElement>,
    /// Current single-selection. Multi-select sets live in the canvas
    /// layer and are not part of undo/redo equality.
    pub selected_id: Option<Uuid>,
    pub canvas_size: Size,
    pub zoom: f64,
    pub show_grid: bool,
}

impl FormBuilderState {
    /// Creates an empty state for a new form.
    pub fn new(form_id: Uuid) -> Self {
        Self {
            form_id,
            title: "Untitled Form".to_string(),
            description: String::new(),
            elements: Vec::new(),
            selected_id: None,
            canvas_size: Size::new(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT),
            zoom: 1.0,
            show_grid: true,
        }
    }

    /// Creates a state seeded with an initial element collection.
    ///
    /// Fails if two elements share an id.
    pub fn with_elements(form_id: Uuid, elements: Vec<FormElement>) -> Result<Self> {
        let mut seen = std::collections::HashSet::new();
        for el in &elements {
            if !seen.insert(el.id) {
                return Err(StateError::DuplicateElement { id: el.id }.into());
            }
        }
        let mut state = Self::new(form_id);
        state.elements = elements;
        Ok(state)
    }

    /// Returns the element with the given id.
    pub fn element(&self, id: Uuid) -> Option<&FormElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Returns a mutable reference to the element with the given id.
    pub fn element_mut(&mut self, id: Uuid) -> Option<&mut FormElement> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    /// Returns the index of the element with the given id.
    pub fn element_index(&self, id: Uuid) -> Option<usize> {
        self.elements.iter().position(|e| e.id == id)
    }

    /// Number of elements on the canvas.
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Next free insertion-order value.
    pub fn next_order(&self) -> u32 {
        self.elements
            .iter()
            .map(|e| e.position.order)
            .max()
            .map(|o| o + 1)
            .unwrap_or(0)
    }

    /// Structural equality over the undoable content: elements, title, and
    /// description. Transient UI fields (selection, zoom, grid visibility)
    /// are exempt, matching the undo/redo inverse law.
    pub fn content_eq(&self, other: &Self) -> bool {
        self.title == other.title
            && self.description == other.description
            && self.elements == other.elements
    }
}
