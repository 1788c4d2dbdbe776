//! # FormKit Designer
//!
//! The editing core of the FormKit form builder:
//!
//! - **Positioning**: Pure geometry utilities - grid snapping, bounding
//!   boxes, alignment, distribution, insertion points
//! - **Collision**: Drop-target resolution for in-progress drags
//! - **Canvas**: Selection management and multi-element operations
//! - **Commands**: Invertible mutation descriptors over the builder state
//! - **Manager**: Undo/redo stacks, merge and batch policy
//! - **Editor**: Integration facade with keyboard shortcuts
//!
//! The crate is a synchronous library. All mutation of a
//! [`formkit_core::FormBuilderState`] flows through [`manager::CommandManager`];
//! the geometry and collision layers are stateless and never touch history.

pub mod canvas;
pub mod collision;
pub mod commands;
pub mod editor;
pub mod manager;
pub mod positioning;
pub mod selection;
pub mod serialization;
pub mod viewport;

pub use canvas::{Alignment, Canvas, DistributeDirection};
pub use collision::{
    AcceptPolicy, CollisionConfig, CollisionStrategy, DragContext, DropCandidate, DropZone,
    DropZoneKind, DropTargetResolver,
};
pub use commands::{CommandKind, CommandRecord, FormCommand};
pub use editor::{EditorConfig, EditorSeed, FormEditor, KeyBindings, KeyCombination, Modifiers};
pub use manager::{CommandManager, CommandResult, ManagerConfig, RollbackCommand};
pub use positioning::{InsertionPoint, Point, Rect};
pub use selection::SelectionManager;
pub use viewport::Viewport;
