//! Shared detach/attach logic for moves and restores.

use crate::drag::resolver::Placement;
use crate::engine::MutationError;
use crate::model::item::{ItemKind, NovelItem};
use crate::model::novel::Novel;
use crate::tree::locate::{is_in_trash, locate, Location};

/// Checks a drop target against the current tree before anything is detached.
pub(crate) fn check_target(
    novel: &Novel,
    item_id: &str,
    item_kind: ItemKind,
    target_id: Option<&str>,
    placement: Placement,
) -> Result<(), MutationError> {
    let Some(target_id) = target_id else {
        return Ok(());
    };
    if target_id == item_id {
        return Err(MutationError::SelfDrop(item_id.to_string()));
    }

    let Some(location) = locate(&novel.items, target_id) else {
        if is_in_trash(novel, target_id) {
            return Err(MutationError::TargetInTrash(target_id.to_string()));
        }
        return Err(MutationError::TargetNotFound(target_id.to_string()));
    };

    match (placement, location) {
        (Placement::Inside, Location::Root { index }) => {
            if novel.items[index].kind() != ItemKind::Volume {
                return Err(MutationError::NotAVolume(target_id.to_string()));
            }
            if item_kind == ItemKind::Volume {
                return Err(volume_into_volume(item_id, target_id));
            }
            Ok(())
        }
        (Placement::Inside, Location::Nested { .. }) => {
            Err(MutationError::NotAVolume(target_id.to_string()))
        }
        (Placement::Before | Placement::After, Location::Nested { .. })
            if item_kind == ItemKind::Volume =>
        {
            Err(volume_into_volume(item_id, target_id))
        }
        (Placement::Before | Placement::After, _) => Ok(()),
    }
}

/// Removes the live item `id` from wherever it sits.
pub(crate) fn detach(items: &mut Vec<NovelItem>, id: &str) -> Option<NovelItem> {
    match locate(items, id)? {
        Location::Root { index } => Some(items.remove(index)),
        Location::Nested {
            volume_index,
            index,
        } => match &mut items[volume_index] {
            NovelItem::Volume(volume) => Some(NovelItem::Chapter(volume.chapters.remove(index))),
            NovelItem::Chapter(_) => None,
        },
    }
}

/// Inserts `item` relative to `target_id` in whichever sequence holds it.
///
/// `target_id = None` addresses the root: `Before` prepends, anything else
/// appends.
pub(crate) fn attach(
    items: &mut Vec<NovelItem>,
    item: NovelItem,
    target_id: Option<&str>,
    placement: Placement,
) -> Result<(), MutationError> {
    let Some(target_id) = target_id else {
        match placement {
            Placement::Before => items.insert(0, item),
            Placement::After | Placement::Inside => items.push(item),
        }
        return Ok(());
    };

    let location = locate(items, target_id)
        .ok_or_else(|| MutationError::TargetNotFound(target_id.to_string()))?;

    match (placement, location) {
        (Placement::Inside, Location::Root { index }) => {
            let NovelItem::Volume(volume) = &mut items[index] else {
                return Err(MutationError::NotAVolume(target_id.to_string()));
            };
            let chapter = match item {
                NovelItem::Chapter(chapter) => chapter,
                NovelItem::Volume(volume) => return Err(volume_into_volume(&volume.id, target_id)),
            };
            volume.chapters.push(chapter);
            Ok(())
        }
        (Placement::Inside, Location::Nested { .. }) => {
            Err(MutationError::NotAVolume(target_id.to_string()))
        }
        (Placement::Before | Placement::After, Location::Root { index }) => {
            let at = if placement == Placement::Before {
                index
            } else {
                index + 1
            };
            items.insert(at, item);
            Ok(())
        }
        (
            Placement::Before | Placement::After,
            Location::Nested {
                volume_index,
                index,
            },
        ) => {
            let chapter = match item {
                NovelItem::Chapter(chapter) => chapter,
                NovelItem::Volume(volume) => return Err(volume_into_volume(&volume.id, target_id)),
            };
            let NovelItem::Volume(volume) = &mut items[volume_index] else {
                return Err(MutationError::TargetNotFound(target_id.to_string()));
            };
            let at = if placement == Placement::Before {
                index
            } else {
                index + 1
            };
            volume.chapters.insert(at, chapter);
            Ok(())
        }
    }
}

fn volume_into_volume(volume_id: &str, target_id: &str) -> MutationError {
    MutationError::VolumeIntoVolume {
        volume_id: volume_id.to_string(),
        target_id: target_id.to_string(),
    }
}
