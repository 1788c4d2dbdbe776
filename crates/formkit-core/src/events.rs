//! Editor event hub.
//!
//! The command manager publishes an [`EditorEvent`] on every state
//! transition, so integration layers track undo/redo availability by
//! subscription instead of polling manager state on a timer. Handlers run
//! synchronously on the publishing thread.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Subscription handle for unsubscribing from events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Undo/redo history transitions.
    History,
    /// Builder state commits.
    State,
    /// Failed command applications.
    Error,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::History => write!(f, "History"),
            EventCategory::State => write!(f, "State"),
            EventCategory::Error => write!(f, "Error"),
        }
    }
}

/// Events published by the command manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EditorEvent {
    /// A command was applied and recorded.
    CommandExecuted {
        /// Human-readable command description.
        description: String,
        /// Undo stack depth after the execution.
        undo_depth: usize,
    },
    /// The most recent command was undone.
    CommandUndone {
        description: String,
        undo_depth: usize,
        redo_depth: usize,
    },
    /// A previously undone command was re-applied.
    CommandRedone {
        description: String,
        undo_depth: usize,
        redo_depth: usize,
    },
    /// A pending batch of mergeable commands was folded into history.
    BatchFlushed {
        /// Commands that were pending before the fold.
        commands: usize,
        /// History entries produced by the fold.
        entries: usize,
    },
    /// Undo and redo stacks were cleared.
    HistoryCleared,
    /// A staged state was committed (non-optimistic mode).
    StateCommitted,
    /// A command application or inversion failed.
    ExecutionFailed {
        description: String,
        error: String,
    },
}

impl EditorEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            EditorEvent::CommandExecuted { .. }
            | EditorEvent::CommandUndone { .. }
            | EditorEvent::CommandRedone { .. }
            | EditorEvent::BatchFlushed { .. }
            | EditorEvent::HistoryCleared => EventCategory::History,
            EditorEvent::StateCommitted => EventCategory::State,
            EditorEvent::ExecutionFailed { .. } => EventCategory::Error,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            EditorEvent::CommandExecuted { description, .. } => {
                format!("Executed: {}", description)
            }
            EditorEvent::CommandUndone { description, .. } => {
                format!("Undone: {}", description)
            }
            EditorEvent::CommandRedone { description, .. } => {
                format!("Redone: {}", description)
            }
            EditorEvent::BatchFlushed { commands, entries } => {
                format!("Flushed {} commands into {} entries", commands, entries)
            }
            EditorEvent::HistoryCleared => "History cleared".to_string(),
            EditorEvent::StateCommitted => "State committed".to_string(),
            EditorEvent::ExecutionFailed { description, error } => {
                format!("Failed: {} ({})", description, error)
            }
        }
    }
}

/// Filter to receive only specific event types
#[derive(Debug, Clone, Default)]
pub enum EventFilter {
    /// Receive all events.
    #[default]
    All,
    /// Receive events matching any of these categories.
    Categories(Vec<EventCategory>),
}

impl EventFilter {
    /// Check if an event matches this filter
    pub fn matches(&self, event: &EditorEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Categories(categories) => categories.contains(&event.category()),
        }
    }
}

/// Type alias for event handler functions
type EventHandler = Box<dyn Fn(&EditorEvent) + Send + Sync>;

/// Synchronous listener registry for editor events.
#[derive(Default)]
pub struct EventHub {
    handlers: RwLock<HashMap<SubscriptionId, (EventFilter, EventHandler)>>,
}

impl EventHub {
    /// Create an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for events matching the filter.
    pub fn subscribe<F>(&self, filter: EventFilter, handler: F) -> SubscriptionId
    where
        F: Fn(&EditorEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId::new();
        self.handlers
            .write()
            .insert(id, (filter, Box::new(handler)));
        id
    }

    /// Remove a handler. Returns `true` if the subscription existed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.handlers.write().remove(&id).is_some()
    }

    /// Publish an event to all matching handlers.
    pub fn publish(&self, event: &EditorEvent) {
        tracing::trace!(event = %event.description(), "publishing editor event");
        let handlers = self.handlers.read();
        for (filter, handler) in handlers.values() {
            if filter.matches(event) {
                handler(event);
            }
        }
    }

    /// Number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.read().len()
    }
}

impl std::fmt::Debug for EventHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHub")
            .field("handlers", &self.handler_count())
            .finish()
    }
}
