//! Host-facing outline services.
//!
//! # Responsibility
//! - Turn user gestures into outline commands with no-op error semantics.
//! - Define the collaborator contracts the core consumes (ids, time,
//!   notifications).

pub mod collaborators;
pub mod context_menu;
pub mod outline_service;
