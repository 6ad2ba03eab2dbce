//! Structural invariant checks for a novel outline.
//!
//! # Invariants checked
//! - Ids are non-empty and unique across live items, nested chapters and
//!   trash entries (nested chapters of trashed volumes included).
//! - The active chapter, when set, names a live chapter.
//!
//! Single ownership of chapters, the two-level depth limit and order
//! significance are carried by the types themselves: a chapter is stored by
//! value in exactly one `Vec`, and `Volume::chapters` can only hold chapters.

use crate::model::item::{ItemId, NovelItem};
use crate::model::novel::{Novel, TrashItem};
use crate::tree::locate::{find_live, ItemRef};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Outline invariant violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// An item carries a blank id.
    EmptyId,
    /// The same id appears more than once across the outline and trash.
    DuplicateId(ItemId),
    /// `active_chapter_id` does not name a live chapter.
    DanglingActiveChapter(ItemId),
}

impl Display for InvariantViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "outline item id must not be blank"),
            Self::DuplicateId(id) => write!(f, "outline id is not unique: {id}"),
            Self::DanglingActiveChapter(id) => {
                write!(f, "active chapter is not a live chapter: {id}")
            }
        }
    }
}

impl Error for InvariantViolation {}

/// Checks id uniqueness across the outline and trash.
///
/// Mutation engine operations run this before handing back a new tree; the
/// active chapter pointer is left to [`validate`].
pub fn validate_structure(novel: &Novel) -> Result<(), InvariantViolation> {
    let mut seen: HashSet<&str> = HashSet::new();
    let live = novel.items.iter().flat_map(NovelItem::held_ids);
    let trashed = novel.trash.iter().flat_map(TrashItem::held_ids);
    for id in live.chain(trashed) {
        if id.trim().is_empty() {
            return Err(InvariantViolation::EmptyId);
        }
        if !seen.insert(id) {
            return Err(InvariantViolation::DuplicateId(id.to_string()));
        }
    }
    Ok(())
}

/// Checks every outline invariant, active chapter pointer included.
pub fn validate(novel: &Novel) -> Result<(), InvariantViolation> {
    validate_structure(novel)?;
    if let Some(active) = novel.active_chapter_id.as_deref() {
        if !matches!(find_live(novel, active), Some(ItemRef::Chapter(_))) {
            return Err(InvariantViolation::DanglingActiveChapter(
                active.to_string(),
            ));
        }
    }
    Ok(())
}
