//! Error handling for FormKit.
//!
//! Two families of failure exist in the editor core:
//! - Programming-contract violations (a command undone before it was ever
//!   applied, a mutation referencing a nonexistent element) are raised as
//!   `CommandError` values and must propagate to the caller's error handler.
//! - Expected empty-operation conditions (undo on an empty stack, redo on an
//!   empty stack) are reported through `CommandResult` and never raised here.
//!
//! All error types use `thiserror`.

use thiserror::Error;
use uuid::Uuid;

/// Command lifecycle error type
///
/// Represents misuse of the command contract. These are not recoverable user
/// errors; they indicate the integration layer drove a command outside its
/// lifecycle.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    /// The command references an element that is not in the state tree
    #[error("Element {id} not found")]
    ElementNotFound {
        /// The missing element's id.
        id: Uuid,
    },

    /// Undo was requested before the command had ever been applied
    #[error("Cannot undo '{command}': command was never applied")]
    NotYetApplied {
        /// The command description.
        command: String,
    },

    /// Two commands of incompatible type or target were merged
    #[error("Cannot merge '{newer}' into '{older}'")]
    IncompatibleMerge {
        /// Description of the command already in history.
        older: String,
        /// Description of the incoming command.
        newer: String,
    },

    /// A dispatch arrived while another command was being applied
    #[error("Command dispatched while '{in_flight}' is executing")]
    ReentrantDispatch {
        /// Description of the operation currently in flight.
        in_flight: String,
    },
}

/// Builder state error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StateError {
    /// A seed or loaded state failed validation
    #[error("Invalid builder state: {reason}")]
    Invalid {
        /// The reason the state is invalid.
        reason: String,
    },

    /// Two elements share the same id
    #[error("Duplicate element id {id}")]
    DuplicateElement {
        /// The duplicated id.
        id: Uuid,
    },
}

/// Main error type for FormKit
///
/// A unified error type that can represent any error from the core and
/// designer layers. This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Command lifecycle error
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Builder state error
    #[error(transparent)]
    State(#[from] StateError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a command contract violation
    pub fn is_command_error(&self) -> bool {
        matches!(self, Error::Command(_))
    }

    /// Check if this is a missing-element error
    pub fn is_element_not_found(&self) -> bool {
        matches!(self, Error::Command(CommandError::ElementNotFound { .. }))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
