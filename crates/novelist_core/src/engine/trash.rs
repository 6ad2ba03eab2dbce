//! Soft delete, restore and permanent delete.
//!
//! # Invariants
//! - Deleting a volume moves it to trash as one entry, chapters nested.
//! - Restore targets live items only; a target held in trash is rejected.
//! - Foreign trash entries never enter the outline.

use crate::drag::resolver::Placement;
use crate::engine::placement::{attach, check_target, detach};
use crate::engine::{Mutation, MutationError, MutationResult};
use crate::model::item::{ItemKind, NovelItem};
use crate::model::novel::{Novel, TrashItem, TrashedEntity};
use crate::tree::locate::{find_live, trash_index};
use crate::tree::validate_structure;

/// Moves a live item (a volume with its whole chapter list) to the end of
/// trash, stamped with `deleted_at`.
///
/// `kind` must match the stored item. The returned mutation lists every id
/// that left the outline; clearing an affected active chapter is up to the
/// caller.
pub fn delete_item(novel: &Novel, id: &str, kind: ItemKind, deleted_at: i64) -> MutationResult {
    let actual = find_live(novel, id)
        .map(|item| item.kind())
        .ok_or_else(|| MutationError::ItemNotFound(id.to_string()))?;
    if actual != kind {
        return Err(MutationError::KindMismatch {
            id: id.to_string(),
            expected: kind,
            actual,
        });
    }

    let mut next = novel.clone();
    let item =
        detach(&mut next.items, id).ok_or_else(|| MutationError::ItemNotFound(id.to_string()))?;
    let removed_ids = item.ids();
    next.trash.push(TrashItem {
        entity: TrashedEntity::from(item),
        deleted_at,
    });
    validate_structure(&next)?;
    Ok(Mutation::with_removed(next, removed_ids))
}

/// Restores a trash entry to the end of the root sequence.
pub fn restore_item(novel: &Novel, id: &str) -> MutationResult {
    restore_item_to_location(novel, id, None, Placement::After)
}

/// Restores a trash entry next to (or into) a live target.
///
/// Placement follows the same rules as [`crate::engine::move_item`].
pub fn restore_item_to_location(
    novel: &Novel,
    id: &str,
    target_id: Option<&str>,
    placement: Placement,
) -> MutationResult {
    let index = trash_index(novel, id).ok_or_else(|| MutationError::ItemNotFound(id.to_string()))?;
    let kind = novel.trash[index]
        .entity
        .kind()
        .ok_or_else(|| MutationError::NotRestorable(id.to_string()))?;
    check_target(novel, id, kind, target_id, placement)?;

    let mut next = novel.clone();
    let entry = next.trash.remove(index);
    let item: NovelItem = entry
        .entity
        .into_item()
        .map_err(|_| MutationError::NotRestorable(id.to_string()))?;
    attach(&mut next.items, item, target_id, placement)?;
    validate_structure(&next)?;
    Ok(Mutation::new(next))
}

/// Removes a trash entry for good.
pub fn permanent_delete(novel: &Novel, id: &str) -> MutationResult {
    let index = trash_index(novel, id).ok_or_else(|| MutationError::ItemNotFound(id.to_string()))?;
    let mut next = novel.clone();
    let entry = next.trash.remove(index);
    Ok(Mutation::with_removed(next, entry.ids()))
}

/// Trash entries that belong to the outline (volumes and chapters), in
/// deletion order.
pub fn structural_trash(novel: &Novel) -> Vec<&TrashItem> {
    novel
        .trash
        .iter()
        .filter(|entry| entry.is_structural())
        .collect()
}
