//! # FormKit Core
//!
//! Core types, events, and error handling for the FormKit form builder.
//! Provides the element model, the builder state aggregate, the editor
//! event hub, and the shared error taxonomy consumed by the designer crate.

pub mod constants;
pub mod element;
pub mod error;
pub mod events;
pub mod state;

pub use element::{
    ElementPosition, ElementStyle, ElementType, FormElement, ValidationRule,
};
pub use error::{CommandError, Error, Result, StateError};
pub use events::{
    EditorEvent, EventCategory, EventFilter, EventHub, SubscriptionId,
};
pub use state::{FormBuilderState, Size};
