//! Flutter-facing bindings for the Novelist outline core.

pub mod api;
