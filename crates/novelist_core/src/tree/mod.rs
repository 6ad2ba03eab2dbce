//! Outline tree queries and invariant checks.
//!
//! # Responsibility
//! - Locate items in the live outline and in trash.
//! - Validate outline invariants before any new tree is accepted.
//! - Walk the two-level hierarchy for rendering.

pub mod invariants;
pub mod locate;
pub mod walk;

pub use invariants::{validate, validate_structure, InvariantViolation};
pub use locate::{find_live, locate, ItemRef, Location};
