//! Outline domain model.
//!
//! # Responsibility
//! - Define the novel outline shape: volumes, chapters and trash entries.
//! - Keep presentation-only state out of the structural records.
//!
//! # Invariants
//! - Every item is identified by a stable `ItemId`.
//! - Deletion moves items to trash; only permanent delete destroys them.

pub mod item;
pub mod novel;
pub mod view;
