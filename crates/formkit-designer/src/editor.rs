//! Integration facade for the form editor.
//!
//! `FormEditor` wraps a [`CommandManager`] and a [`Canvas`] behind the
//! surface an application shell needs: command constructors for user
//! gestures, undo/redo with derived flags, and a configurable keyboard
//! shortcut table.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use formkit_core::{
    ElementPosition, ElementType, EventFilter, FormBuilderState, FormElement, Result,
    SubscriptionId,
};

use crate::canvas::{Alignment, Canvas, DistributeDirection};
use crate::commands::FormCommand;
use crate::manager::{CommandManager, CommandResult, ManagerConfig};

/// Modifier keys held during a keystroke.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    /// Cmd on macOS.
    pub meta: bool,
}

/// One bindable key chord.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyCombination {
    /// Lowercase key name, e.g. `"z"`.
    pub key: String,
    pub modifiers: Modifiers,
}

impl KeyCombination {
    /// Creates a Ctrl-modified chord.
    pub fn ctrl(key: &str) -> Self {
        Self {
            key: key.to_string(),
            modifiers: Modifiers { ctrl: true, ..Modifiers::default() },
        }
    }

    /// Creates a Ctrl+Shift-modified chord.
    pub fn ctrl_shift(key: &str) -> Self {
        Self {
            key: key.to_string(),
            modifiers: Modifiers { ctrl: true, shift: true, ..Modifiers::default() },
        }
    }

    /// Creates a Cmd-modified chord (macOS).
    pub fn meta(key: &str) -> Self {
        Self {
            key: key.to_string(),
            modifiers: Modifiers { meta: true, ..Modifiers::default() },
        }
    }

    /// Creates a Cmd+Shift-modified chord (macOS).
    pub fn meta_shift(key: &str) -> Self {
        Self {
            key: key.to_string(),
            modifiers: Modifiers { meta: true, shift: true, ..Modifiers::default() },
        }
    }

    fn matches(&self, key: &str, modifiers: Modifiers) -> bool {
        self.key.eq_ignore_ascii_case(key) && self.modifiers == modifiers
    }
}

/// Keyboard shortcut table for undo/redo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    pub undo: Vec<KeyCombination>,
    pub redo: Vec<KeyCombination>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            undo: vec![KeyCombination::ctrl("z"), KeyCombination::meta("z")],
            redo: vec![
                KeyCombination::ctrl("y"),
                KeyCombination::ctrl_shift("z"),
                KeyCombination::meta("y"),
                KeyCombination::meta_shift("z"),
            ],
        }
    }
}

/// Editor-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditorConfig {
    pub manager: ManagerConfig,
    pub key_bindings: KeyBindings,
}

/// Minimal seed for a fresh editing session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorSeed {
    pub form_id: Uuid,
    #[serde(default)]
    pub initial_elements: Vec<FormElement>,
}

/// The editing session facade.
pub struct FormEditor {
    manager: CommandManager,
    canvas: Canvas,
    key_bindings: KeyBindings,
}

impl FormEditor {
    /// Creates an editor around an existing state.
    pub fn new(state: FormBuilderState) -> Self {
        Self::with_config(state, EditorConfig::default())
    }

    /// Creates an editor with custom configuration.
    pub fn with_config(state: FormBuilderState, config: EditorConfig) -> Self {
        Self {
            manager: CommandManager::with_config(state, config.manager),
            canvas: Canvas::new(),
            key_bindings: config.key_bindings,
        }
    }

    /// Creates an editor from a minimal seed.
    pub fn from_seed(seed: EditorSeed) -> Result<Self> {
        let state = FormBuilderState::with_elements(seed.form_id, seed.initial_elements)?;
        Ok(Self::new(state))
    }

    /// The authoritative state.
    pub fn state(&self) -> &FormBuilderState {
        self.manager.state()
    }

    /// The command manager.
    pub fn manager(&self) -> &CommandManager {
        &self.manager
    }

    /// The command manager, mutably.
    pub fn manager_mut(&mut self) -> &mut CommandManager {
        &mut self.manager
    }

    /// The canvas layer (selection, viewport, grid).
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// The canvas layer, mutably.
    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    /// Whether undo is currently available.
    pub fn can_undo(&self) -> bool {
        self.manager.can_undo()
    }

    /// Whether redo is currently available.
    pub fn can_redo(&self) -> bool {
        self.manager.can_redo()
    }

    /// Subscribes to editor events; the manager publishes on every
    /// transition, so flags stay current without polling.
    pub fn subscribe<F>(&self, filter: EventFilter, handler: F) -> SubscriptionId
    where
        F: Fn(&formkit_core::EditorEvent) + Send + Sync + 'static,
    {
        self.manager.events().subscribe(filter, handler)
    }

    /// Executes an arbitrary command.
    pub fn execute(&mut self, command: FormCommand) -> CommandResult {
        let result = self.manager.execute_command(command);
        self.sync_selection();
        result
    }

    /// Adds an element of the given type at a position.
    pub fn add_element(
        &mut self,
        element_type: ElementType,
        position: ElementPosition,
    ) -> CommandResult {
        self.execute(FormCommand::add_element(element_type, position))
    }

    /// Removes an element.
    pub fn remove_element(&mut self, id: Uuid) -> CommandResult {
        self.execute(FormCommand::remove_element(id))
    }

    /// Moves an element to a new position.
    pub fn move_element(&mut self, id: Uuid, position: ElementPosition) -> CommandResult {
        self.execute(FormCommand::move_element(id, position))
    }

    /// Shallow-merges properties into an element.
    pub fn update_element_properties(
        &mut self,
        id: Uuid,
        properties: Map<String, Value>,
    ) -> CommandResult {
        self.execute(FormCommand::update_element_properties(id, properties))
    }

    /// Updates form title and/or description.
    pub fn update_form_properties(
        &mut self,
        title: Option<String>,
        description: Option<String>,
    ) -> CommandResult {
        self.execute(FormCommand::update_form_properties(title, description))
    }

    /// Aligns the selected elements, one move command per element so the
    /// whole operation lands as mergeless discrete entries.
    pub fn align_selected(&mut self, alignment: Alignment) -> Vec<CommandResult> {
        let updates = self
            .canvas
            .align_selected(&self.manager.state().elements, alignment);
        updates
            .into_iter()
            .map(|(id, pos)| self.execute(FormCommand::move_element(id, pos)))
            .collect()
    }

    /// Distributes the selected elements along an axis.
    pub fn distribute_selected(&mut self, direction: DistributeDirection) -> Vec<CommandResult> {
        let updates = self
            .canvas
            .distribute_selected(&self.manager.state().elements, direction);
        updates
            .into_iter()
            .map(|(id, pos)| self.execute(FormCommand::move_element(id, pos)))
            .collect()
    }

    /// Undoes the most recent command.
    pub fn undo(&mut self) -> CommandResult {
        let result = self.manager.undo();
        self.sync_selection();
        result
    }

    /// Re-applies the most recently undone command.
    pub fn redo(&mut self) -> CommandResult {
        let result = self.manager.redo();
        self.sync_selection();
        result
    }

    /// Routes a keystroke through the binding table.
    ///
    /// Returns `None` when the chord is unbound (the shell should let the
    /// keystroke fall through to focused form fields).
    pub fn handle_key(&mut self, key: &str, modifiers: Modifiers) -> Option<CommandResult> {
        if self.key_bindings.undo.iter().any(|c| c.matches(key, modifiers)) {
            return Some(self.undo());
        }
        if self.key_bindings.redo.iter().any(|c| c.matches(key, modifiers)) {
            return Some(self.redo());
        }
        None
    }

    /// Commands mutate `selected_id` on the state; mirror those changes
    /// into the canvas selection set and drop ids of removed elements.
    fn sync_selection(&mut self) {
        let state = self.manager.state();
        self.canvas.selection.retain_existing(&state.elements);
        if let Some(id) = state.selected_id {
            if !self.canvas.selection.is_selected(id) {
                self.canvas.selection.select(id, false);
            }
        }
    }
}

impl std::fmt::Debug for FormEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormEditor")
            .field("form_id", &self.manager.state().form_id)
            .field("elements", &self.manager.state().element_count())
            .field("manager", &self.manager)
            .finish()
    }
}
