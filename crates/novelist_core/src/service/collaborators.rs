//! Collaborator contracts consumed by the outline service.
//!
//! # Responsibility
//! - Abstract id generation, wall-clock time and user notifications.
//! - Provide default implementations for production hosts.
//!
//! # Invariants
//! - `IdSource` implementations must not hand out the same id twice.
//! - `Notifier` implementations must not fail the calling command.

use crate::model::item::{ItemId, ItemKind};
use log::info;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Source of unique ids for newly created items.
pub trait IdSource {
    fn next_id(&mut self, kind: ItemKind) -> ItemId;
}

/// Random v4 UUID ids.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdSource;

impl IdSource for UuidIdSource {
    fn next_id(&mut self, _kind: ItemKind) -> ItemId {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic `<prefix>-<kind>-<n>` ids for scripted sessions.
#[derive(Debug, Clone)]
pub struct SequentialIdSource {
    prefix: String,
    next: u64,
}

impl SequentialIdSource {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl IdSource for SequentialIdSource {
    fn next_id(&mut self, kind: ItemKind) -> ItemId {
        let id = format!("{}-{}-{}", self.prefix, kind.as_str(), self.next);
        self.next += 1;
        id
    }
}

/// Wall-clock source for `deleted_at` stamps.
pub trait Clock {
    /// Unix epoch milliseconds.
    fn now_ms(&self) -> i64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or(0)
    }
}

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_ms(&self) -> i64 {
        self.0
    }
}

/// User-visible feedback kinds for destructive operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    MovedToTrash,
    Restored,
    PermanentlyDeleted,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MovedToTrash => "moved_to_trash",
            Self::Restored => "restored",
            Self::PermanentlyDeleted => "permanently_deleted",
        }
    }
}

/// One user-visible notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub item_id: ItemId,
    /// Display title for toast text; never written to logs.
    pub title: String,
}

/// Publish side of the host's toast/log channel.
pub trait Notifier {
    fn notify(&self, notification: &Notification);
}

/// Writes notifications to the core log as metadata-only lines.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) {
        info!(
            "event=notification module=service status=ok kind={} item_id={}",
            notification.kind.as_str(),
            notification.item_id
        );
    }
}
