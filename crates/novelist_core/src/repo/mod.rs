//! Persistence adapters for novel outlines.
//!
//! # Responsibility
//! - Define the storage contract hosts use to keep outlines across sessions.
//! - Isolate SQLite query details from the outline engine.
//!
//! # Invariants
//! - Repositories only accept and return outlines that pass validation.

pub mod novel_repo;
