//! Core outline engine for Novelist.
//! This crate owns the volume/chapter tree, its drag-and-drop interpretation,
//! and the soft-delete trash. Every structural invariant is enforced here.

pub mod db;
pub mod drag;
pub mod engine;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod tree;

pub use drag::{
    DragCommand, DragMachine, DragSource, DragState, DragSubject, DropOutcome, DropTarget,
    HoverTarget, Placement,
};
pub use engine::{Mutation, MutationError, MutationResult};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::item::{Chapter, ChapterStatus, ItemId, ItemKind, NovelItem, Volume};
pub use model::novel::{ForeignEntity, Novel, TrashItem, TrashedEntity};
pub use model::view::ViewState;
pub use repo::novel_repo::{
    NovelRepository, NovelSummary, RepoError, RepoResult, SqliteNovelRepository,
};
pub use service::collaborators::{
    Clock, FixedClock, IdSource, LogNotifier, Notification, NotificationKind, Notifier,
    SequentialIdSource, SystemClock, UuidIdSource,
};
pub use service::context_menu::{ContextMenu, MenuAction, MenuEntry, MenuTarget};
pub use service::outline_service::{CommandEffect, CommandOutcome, OutlineService};
pub use tree::walk::OutlineRow;
pub use tree::InvariantViolation;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
