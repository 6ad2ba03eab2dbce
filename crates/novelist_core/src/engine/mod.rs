//! Outline mutation engine.
//!
//! # Responsibility
//! - Apply moves, renames, status changes, creation, deletion and restore to
//!   a novel outline.
//! - Reject any request that cannot be applied cleanly.
//!
//! # Invariants
//! - Every operation is pure: it reads `&Novel` and returns a whole new
//!   `Novel`, or an error and no new tree. Callers swap the tree in one step.
//! - A returned tree always passes `tree::validate_structure`.
//!
//! # See also
//! - `service::outline_service` for the no-op command surface built on top.

use crate::model::item::{ItemId, ItemKind};
use crate::model::novel::Novel;
use crate::tree::InvariantViolation;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod outline;
mod placement;
pub mod trash;

pub use outline::{
    insert_item, move_item, rename_item, select_chapter, update_chapter_status,
};
pub use trash::{
    delete_item, permanent_delete, restore_item, restore_item_to_location, structural_trash,
};

/// Result type used by mutation engine operations.
pub type MutationResult = Result<Mutation, MutationError>;

/// New outline produced by one successful operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation {
    pub novel: Novel,
    /// Ids that left the live outline (soft or permanent delete).
    pub removed_ids: Vec<ItemId>,
}

impl Mutation {
    pub(crate) fn new(novel: Novel) -> Self {
        Self {
            novel,
            removed_ids: Vec::new(),
        }
    }

    pub(crate) fn with_removed(novel: Novel, removed_ids: Vec<ItemId>) -> Self {
        Self { novel, removed_ids }
    }
}

/// Reasons an outline operation is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    /// Dragged item dropped onto itself.
    SelfDrop(ItemId),
    /// Item to act on is not where the operation looks for it.
    ItemNotFound(ItemId),
    /// Drop target does not exist.
    TargetNotFound(ItemId),
    /// Drop target is in trash; only live items can be targeted.
    TargetInTrash(ItemId),
    /// A volume would end up inside a volume.
    VolumeIntoVolume {
        volume_id: ItemId,
        target_id: ItemId,
    },
    /// Operation needs a volume.
    NotAVolume(ItemId),
    /// Operation needs a chapter.
    NotAChapter(ItemId),
    /// Trash entry is owned by another subsystem and cannot enter the outline.
    NotRestorable(ItemId),
    /// Declared item kind does not match the stored one.
    KindMismatch {
        id: ItemId,
        expected: ItemKind,
        actual: ItemKind,
    },
    /// Title is blank after trim.
    EmptyTitle,
    /// The resulting tree would break an outline invariant.
    Invariant(InvariantViolation),
}

impl Display for MutationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SelfDrop(id) => write!(f, "item cannot be dropped onto itself: {id}"),
            Self::ItemNotFound(id) => write!(f, "outline item not found: {id}"),
            Self::TargetNotFound(id) => write!(f, "drop target not found: {id}"),
            Self::TargetInTrash(id) => write!(f, "drop target is in trash: {id}"),
            Self::VolumeIntoVolume {
                volume_id,
                target_id,
            } => write!(
                f,
                "volume {volume_id} cannot be placed inside a volume (target {target_id})"
            ),
            Self::NotAVolume(id) => write!(f, "outline item is not a volume: {id}"),
            Self::NotAChapter(id) => write!(f, "outline item is not a chapter: {id}"),
            Self::NotRestorable(id) => write!(f, "trash entry cannot be restored: {id}"),
            Self::KindMismatch {
                id,
                expected,
                actual,
            } => write!(
                f,
                "outline item {id} is a {}, not a {}",
                actual.as_str(),
                expected.as_str()
            ),
            Self::EmptyTitle => write!(f, "title must not be blank"),
            Self::Invariant(err) => write!(f, "{err}"),
        }
    }
}

impl Error for MutationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invariant(err) => Some(err),
            _ => None,
        }
    }
}

impl From<InvariantViolation> for MutationError {
    fn from(value: InvariantViolation) -> Self {
        Self::Invariant(value)
    }
}

impl MutationError {
    /// Stable snake_case code for log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::SelfDrop(_) => "self_drop",
            Self::ItemNotFound(_) => "item_not_found",
            Self::TargetNotFound(_) => "target_not_found",
            Self::TargetInTrash(_) => "target_in_trash",
            Self::VolumeIntoVolume { .. } => "volume_into_volume",
            Self::NotAVolume(_) => "not_a_volume",
            Self::NotAChapter(_) => "not_a_chapter",
            Self::NotRestorable(_) => "not_restorable",
            Self::KindMismatch { .. } => "kind_mismatch",
            Self::EmptyTitle => "empty_title",
            Self::Invariant(_) => "invariant_violation",
        }
    }
}
