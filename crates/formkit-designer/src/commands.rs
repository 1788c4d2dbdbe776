//! Invertible form commands.
//!
//! Every mutation of a [`FormBuilderState`] is described by a
//! [`FormCommand`]: a self-contained record that knows how to apply itself
//! and how to restore the state it replaced. Captured previous values are
//! explicit fields, so a serialized command replays correctly after a round
//! trip with no closure state.
//!
//! Apply captures, undo restores:
//! 1. `apply()` records whatever it is about to overwrite (position,
//!    properties, full element snapshot) on first application only.
//! 2. `undo()` writes the captured value back. Undoing a command that was
//!    never applied is a contract violation and fails loudly.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use formkit_core::{
    CommandError, ElementPosition, ElementType, Error, FormBuilderState, FormElement, Result,
};

/// Command type tag, used for merge checks and serialized records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    AddElement,
    RemoveElement,
    MoveElement,
    UpdateElementProperties,
    UpdateFormProperties,
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandKind::AddElement => write!(f, "add_element"),
            CommandKind::RemoveElement => write!(f, "remove_element"),
            CommandKind::MoveElement => write!(f, "move_element"),
            CommandKind::UpdateElementProperties => write!(f, "update_element_properties"),
            CommandKind::UpdateFormProperties => write!(f, "update_form_properties"),
        }
    }
}

/// Adds a newly constructed element with type defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddElement {
    pub element_type: ElementType,
    pub position: ElementPosition,
    /// The element id. Generated on first apply when the caller does not
    /// supply one, then kept so undo targets the right element.
    pub id: Option<Uuid>,
}

/// Removes an element, keeping a full snapshot for undo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveElement {
    pub id: Uuid,
    /// Full copy of the removed element, captured at apply time.
    pub snapshot: Option<FormElement>,
    /// Index the element occupied, so undo restores collection order.
    pub index: Option<usize>,
}

/// Moves an element to a new position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveElement {
    pub id: Uuid,
    pub new_position: ElementPosition,
    /// Position before the first application. Merging keeps the earliest
    /// one so a collapsed drag undoes to where the gesture started.
    pub previous_position: Option<ElementPosition>,
}

/// Shallow-merges new entries into an element's property record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateElementProperties {
    pub id: Uuid,
    pub new_properties: Map<String, Value>,
    /// The whole property record before the first application.
    pub previous_properties: Option<Map<String, Value>>,
}

/// Title and description before an update, captured as a pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormMetadata {
    pub title: String,
    pub description: String,
}

/// Updates the form's title and/or description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateFormProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_description: Option<String>,
    pub previous: Option<FormMetadata>,
}

/// Payload variants, one per command kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommandPayload {
    AddElement(AddElement),
    RemoveElement(RemoveElement),
    MoveElement(MoveElement),
    UpdateElementProperties(UpdateElementProperties),
    UpdateFormProperties(UpdateFormProperties),
}

/// A self-contained, invertible description of one state mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormCommand {
    pub id: Uuid,
    /// Creation time, epoch milliseconds. Drives merge windows.
    pub timestamp: i64,
    pub payload: CommandPayload,
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

impl FormCommand {
    fn with_payload(payload: CommandPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: now_ms(),
            payload,
        }
    }

    /// Command that adds an element of the given type, generating the
    /// element id at first apply.
    pub fn add_element(element_type: ElementType, position: ElementPosition) -> Self {
        Self::with_payload(CommandPayload::AddElement(AddElement {
            element_type,
            position,
            id: None,
        }))
    }

    /// Like [`FormCommand::add_element`] with a caller-chosen element id.
    pub fn add_element_with_id(
        id: Uuid,
        element_type: ElementType,
        position: ElementPosition,
    ) -> Self {
        Self::with_payload(CommandPayload::AddElement(AddElement {
            element_type,
            position,
            id: Some(id),
        }))
    }

    /// Command that removes the element with the given id.
    pub fn remove_element(id: Uuid) -> Self {
        Self::with_payload(CommandPayload::RemoveElement(RemoveElement {
            id,
            snapshot: None,
            index: None,
        }))
    }

    /// Command that moves the element with the given id.
    pub fn move_element(id: Uuid, new_position: ElementPosition) -> Self {
        Self::with_payload(CommandPayload::MoveElement(MoveElement {
            id,
            new_position,
            previous_position: None,
        }))
    }

    /// Command that shallow-merges properties into the element's record.
    pub fn update_element_properties(id: Uuid, new_properties: Map<String, Value>) -> Self {
        Self::with_payload(CommandPayload::UpdateElementProperties(
            UpdateElementProperties {
                id,
                new_properties,
                previous_properties: None,
            },
        ))
    }

    /// Command that updates form title and/or description.
    pub fn update_form_properties(
        new_title: Option<String>,
        new_description: Option<String>,
    ) -> Self {
        Self::with_payload(CommandPayload::UpdateFormProperties(UpdateFormProperties {
            new_title,
            new_description,
            previous: None,
        }))
    }

    /// The command's type tag.
    pub fn kind(&self) -> CommandKind {
        match &self.payload {
            CommandPayload::AddElement(_) => CommandKind::AddElement,
            CommandPayload::RemoveElement(_) => CommandKind::RemoveElement,
            CommandPayload::MoveElement(_) => CommandKind::MoveElement,
            CommandPayload::UpdateElementProperties(_) => CommandKind::UpdateElementProperties,
            CommandPayload::UpdateFormProperties(_) => CommandKind::UpdateFormProperties,
        }
    }

    /// Human-readable description for history UI and logging.
    pub fn description(&self) -> String {
        match &self.payload {
            CommandPayload::AddElement(cmd) => {
                format!("Add {}", cmd.element_type.default_label().to_lowercase())
            }
            CommandPayload::RemoveElement(cmd) => match &cmd.snapshot {
                Some(el) => format!("Remove {}", el.label.to_lowercase()),
                None => "Remove element".to_string(),
            },
            CommandPayload::MoveElement(cmd) => format!(
                "Move element to ({:.0}, {:.0})",
                cmd.new_position.x, cmd.new_position.y
            ),
            CommandPayload::UpdateElementProperties(_) => "Update element properties".to_string(),
            CommandPayload::UpdateFormProperties(cmd) => {
                match (&cmd.new_title, &cmd.new_description) {
                    (Some(_), None) => "Rename form".to_string(),
                    _ => "Update form properties".to_string(),
                }
            }
        }
    }

    /// Applies the command to the state.
    ///
    /// Each kind validates before it mutates, so a failed apply leaves the
    /// state untouched. First application captures previous values;
    /// re-application (redo) keeps the original capture.
    pub fn apply(&mut self, state: &mut FormBuilderState) -> Result<()> {
        match &mut self.payload {
            CommandPayload::AddElement(cmd) => {
                let id = *cmd.id.get_or_insert_with(Uuid::new_v4);
                let element = FormElement::with_defaults(id, cmd.element_type, cmd.position);
                debug!(element = %id, kind = %cmd.element_type, "adding element");
                state.elements.push(element);
                state.selected_id = Some(id);
                Ok(())
            }
            CommandPayload::RemoveElement(cmd) => {
                let index = state
                    .element_index(cmd.id)
                    .ok_or(CommandError::ElementNotFound { id: cmd.id })?;
                let element = state.elements.remove(index);
                debug!(element = %cmd.id, index, "removing element");
                cmd.snapshot = Some(element);
                cmd.index = Some(index);
                if state.selected_id == Some(cmd.id) {
                    state.selected_id = None;
                }
                Ok(())
            }
            CommandPayload::MoveElement(cmd) => {
                let element = state
                    .element_mut(cmd.id)
                    .ok_or(CommandError::ElementNotFound { id: cmd.id })?;
                if cmd.previous_position.is_none() {
                    cmd.previous_position = Some(element.position);
                }
                element.position = cmd.new_position;
                Ok(())
            }
            CommandPayload::UpdateElementProperties(cmd) => {
                let element = state
                    .element_mut(cmd.id)
                    .ok_or(CommandError::ElementNotFound { id: cmd.id })?;
                if cmd.previous_properties.is_none() {
                    cmd.previous_properties = Some(element.properties.clone());
                }
                for (key, value) in &cmd.new_properties {
                    element.properties.insert(key.clone(), value.clone());
                }
                Ok(())
            }
            CommandPayload::UpdateFormProperties(cmd) => {
                if cmd.previous.is_none() {
                    cmd.previous = Some(FormMetadata {
                        title: state.title.clone(),
                        description: state.description.clone(),
                    });
                }
                if let Some(title) = &cmd.new_title {
                    state.title = title.clone();
                }
                if let Some(description) = &cmd.new_description {
                    state.description = description.clone();
                }
                Ok(())
            }
        }
    }

    /// Inverts the command against the state.
    pub fn undo(&mut self, state: &mut FormBuilderState) -> Result<()> {
        match &mut self.payload {
            CommandPayload::AddElement(cmd) => {
                let id = cmd.id.ok_or_else(|| CommandError::NotYetApplied {
                    command: "add element".to_string(),
                })?;
                let index = state
                    .element_index(id)
                    .ok_or(CommandError::ElementNotFound { id })?;
                state.elements.remove(index);
                if state.selected_id == Some(id) {
                    state.selected_id = None;
                }
                Ok(())
            }
            CommandPayload::RemoveElement(cmd) => {
                let snapshot = cmd
                    .snapshot
                    .clone()
                    .ok_or_else(|| CommandError::NotYetApplied {
                        command: "remove element".to_string(),
                    })?;
                let index = cmd.index.unwrap_or(state.elements.len());
                let index = index.min(state.elements.len());
                state.selected_id = Some(snapshot.id);
                state.elements.insert(index, snapshot);
                Ok(())
            }
            CommandPayload::MoveElement(cmd) => {
                let previous =
                    cmd.previous_position
                        .ok_or_else(|| CommandError::NotYetApplied {
                            command: "move element".to_string(),
                        })?;
                let element = state
                    .element_mut(cmd.id)
                    .ok_or(CommandError::ElementNotFound { id: cmd.id })?;
                element.position = previous;
                Ok(())
            }
            CommandPayload::UpdateElementProperties(cmd) => {
                let previous =
                    cmd.previous_properties
                        .clone()
                        .ok_or_else(|| CommandError::NotYetApplied {
                            command: "update element properties".to_string(),
                        })?;
                let element = state
                    .element_mut(cmd.id)
                    .ok_or(CommandError::ElementNotFound { id: cmd.id })?;
                element.properties = previous;
                Ok(())
            }
            CommandPayload::UpdateFormProperties(cmd) => {
                let previous = cmd
                    .previous
                    .clone()
                    .ok_or_else(|| CommandError::NotYetApplied {
                        command: "update form properties".to_string(),
                    })?;
                state.title = previous.title;
                state.description = previous.description;
                Ok(())
            }
        }
    }

    /// Whether `newer` can fold into this command as one history entry.
    ///
    /// Moves merge with moves of the same element regardless of timing (a
    /// drag produces an unbroken run). Property updates merge with updates
    /// of the same target arriving within `merge_window_ms`. Add and remove
    /// never merge: each is a discrete, user-visible event.
    pub fn can_merge_with(&self, newer: &FormCommand, merge_window_ms: i64) -> bool {
        match (&self.payload, &newer.payload) {
            (CommandPayload::MoveElement(a), CommandPayload::MoveElement(b)) => a.id == b.id,
            (
                CommandPayload::UpdateElementProperties(a),
                CommandPayload::UpdateElementProperties(b),
            ) => a.id == b.id && (newer.timestamp - self.timestamp) <= merge_window_ms,
            (
                CommandPayload::UpdateFormProperties(_),
                CommandPayload::UpdateFormProperties(_),
            ) => (newer.timestamp - self.timestamp) <= merge_window_ms,
            _ => false,
        }
    }

    /// Folds `newer` into this command.
    ///
    /// The merged command keeps this command's captured previous values and
    /// takes `newer`'s targets, so applying it from the original pre-merge
    /// state matches executing both in sequence, and undoing it restores
    /// the true original state.
    pub fn merge_from(&mut self, newer: FormCommand) -> Result<()> {
        if !self.can_merge_with(&newer, i64::MAX) {
            return Err(Error::Command(CommandError::IncompatibleMerge {
                older: self.description(),
                newer: newer.description(),
            }));
        }

        match (&mut self.payload, newer.payload) {
            (CommandPayload::MoveElement(a), CommandPayload::MoveElement(b)) => {
                a.new_position = b.new_position;
            }
            (
                CommandPayload::UpdateElementProperties(a),
                CommandPayload::UpdateElementProperties(b),
            ) => {
                for (key, value) in b.new_properties {
                    a.new_properties.insert(key, value);
                }
            }
            (
                CommandPayload::UpdateFormProperties(a),
                CommandPayload::UpdateFormProperties(b),
            ) => {
                if b.new_title.is_some() {
                    a.new_title = b.new_title;
                }
                if b.new_description.is_some() {
                    a.new_description = b.new_description;
                }
            }
            _ => unreachable!("can_merge_with checked above"),
        }
        Ok(())
    }

    /// Serializes to a plain record for persistence or transmission.
    pub fn to_record(&self) -> Result<CommandRecord> {
        let data = match &self.payload {
            CommandPayload::AddElement(cmd) => serde_json::to_value(cmd)?,
            CommandPayload::RemoveElement(cmd) => serde_json::to_value(cmd)?,
            CommandPayload::MoveElement(cmd) => serde_json::to_value(cmd)?,
            CommandPayload::UpdateElementProperties(cmd) => serde_json::to_value(cmd)?,
            CommandPayload::UpdateFormProperties(cmd) => serde_json::to_value(cmd)?,
        };
        Ok(CommandRecord {
            id: self.id,
            kind: self.kind(),
            timestamp: self.timestamp,
            description: self.description(),
            data,
            metadata: None,
        })
    }

    /// Reconstructs a command from a serialized record.
    pub fn from_record(record: &CommandRecord) -> Result<Self> {
        let payload = match record.kind {
            CommandKind::AddElement => {
                CommandPayload::AddElement(serde_json::from_value(record.data.clone())?)
            }
            CommandKind::RemoveElement => {
                CommandPayload::RemoveElement(serde_json::from_value(record.data.clone())?)
            }
            CommandKind::MoveElement => {
                CommandPayload::MoveElement(serde_json::from_value(record.data.clone())?)
            }
            CommandKind::UpdateElementProperties => CommandPayload::UpdateElementProperties(
                serde_json::from_value(record.data.clone())?,
            ),
            CommandKind::UpdateFormProperties => {
                CommandPayload::UpdateFormProperties(serde_json::from_value(record.data.clone())?)
            }
        };
        Ok(Self {
            id: record.id,
            timestamp: record.timestamp,
            payload,
        })
    }
}

/// The serialized shape of one command: everything needed to reconstruct
/// apply/undo behavior, with captured previous values explicit in `data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandRecord {
    pub id: Uuid,
    pub kind: CommandKind,
    /// Epoch milliseconds.
    pub timestamp: i64,
    pub description: String,
    pub data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}
