//! Drag-and-drop interpretation.
//!
//! # Responsibility
//! - Map pointer geometry to a discrete placement (`resolver`).
//! - Track one in-progress drag and turn a drop into a command (`machine`).

pub mod machine;
pub mod resolver;

pub use machine::{DragCommand, DragMachine, DragSource, DragState, DragSubject, DropOutcome};
pub use resolver::{resolve_hover, resolve_placement, DropTarget, HoverTarget, Placement};
