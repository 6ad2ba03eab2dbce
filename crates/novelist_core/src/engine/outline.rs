//! Live outline edits: move, rename, status, creation, selection.

use crate::drag::resolver::Placement;
use crate::engine::placement::{attach, check_target, detach};
use crate::engine::{Mutation, MutationError, MutationResult};
use crate::model::item::{ChapterStatus, NovelItem};
use crate::model::novel::Novel;
use crate::tree::locate::{find_live, locate, ItemRef, Location};
use crate::tree::validate_structure;

/// Moves a live item next to (or into) a target.
///
/// `BEFORE`/`AFTER` insert into whichever sequence currently holds the
/// target, which is how chapters change volumes. `INSIDE` appends to the
/// target volume. `target_id = None` prepends (`BEFORE`) or appends to the
/// root sequence.
pub fn move_item(
    novel: &Novel,
    dragged_id: &str,
    target_id: Option<&str>,
    placement: Placement,
) -> MutationResult {
    if target_id == Some(dragged_id) {
        return Err(MutationError::SelfDrop(dragged_id.to_string()));
    }
    let kind = find_live(novel, dragged_id)
        .map(|item| item.kind())
        .ok_or_else(|| MutationError::ItemNotFound(dragged_id.to_string()))?;
    check_target(novel, dragged_id, kind, target_id, placement)?;

    let mut next = novel.clone();
    let item = detach(&mut next.items, dragged_id)
        .ok_or_else(|| MutationError::ItemNotFound(dragged_id.to_string()))?;
    attach(&mut next.items, item, target_id, placement)?;
    validate_structure(&next)?;
    Ok(Mutation::new(next))
}

/// Renames a live item. Titles are stored trimmed.
pub fn rename_item(novel: &Novel, id: &str, new_title: &str) -> MutationResult {
    let title = new_title.trim();
    if title.is_empty() {
        return Err(MutationError::EmptyTitle);
    }

    let mut next = novel.clone();
    let location =
        locate(&next.items, id).ok_or_else(|| MutationError::ItemNotFound(id.to_string()))?;
    match location {
        Location::Root { index } => match &mut next.items[index] {
            NovelItem::Volume(volume) => volume.title = title.to_string(),
            NovelItem::Chapter(chapter) => chapter.title = title.to_string(),
        },
        Location::Nested {
            volume_index,
            index,
        } => {
            if let NovelItem::Volume(volume) = &mut next.items[volume_index] {
                volume.chapters[index].title = title.to_string();
            }
        }
    }
    Ok(Mutation::new(next))
}

/// Sets the workflow status of a live chapter.
pub fn update_chapter_status(novel: &Novel, id: &str, status: ChapterStatus) -> MutationResult {
    let mut next = novel.clone();
    let location =
        locate(&next.items, id).ok_or_else(|| MutationError::ItemNotFound(id.to_string()))?;
    let chapter = match location {
        Location::Root { index } => match &mut next.items[index] {
            NovelItem::Chapter(chapter) => chapter,
            NovelItem::Volume(_) => return Err(MutationError::NotAChapter(id.to_string())),
        },
        Location::Nested {
            volume_index,
            index,
        } => match &mut next.items[volume_index] {
            NovelItem::Volume(volume) => &mut volume.chapters[index],
            NovelItem::Chapter(_) => return Err(MutationError::ItemNotFound(id.to_string())),
        },
    };
    chapter.status = status;
    Ok(Mutation::new(next))
}

/// Appends a newly created item to the end of its container.
///
/// `parent_id = None` targets the root sequence; otherwise the parent must be
/// a live volume and the item a chapter. The item's ids must not collide with
/// anything in the outline or trash.
pub fn insert_item(novel: &Novel, item: NovelItem, parent_id: Option<&str>) -> MutationResult {
    let mut next = novel.clone();
    match parent_id {
        None => next.items.push(item),
        Some(parent_id) => {
            match find_live(novel, parent_id) {
                Some(ItemRef::Volume(_)) => {}
                Some(ItemRef::Chapter(_)) => {
                    return Err(MutationError::NotAVolume(parent_id.to_string()))
                }
                None => return Err(MutationError::TargetNotFound(parent_id.to_string())),
            }
            attach(&mut next.items, item, Some(parent_id), Placement::Inside)?;
        }
    }
    validate_structure(&next)?;
    Ok(Mutation::new(next))
}

/// Sets or clears the active chapter; only live chapters can be selected.
pub fn select_chapter(novel: &Novel, id: Option<&str>) -> MutationResult {
    if let Some(id) = id {
        match find_live(novel, id) {
            Some(ItemRef::Chapter(_)) => {}
            Some(ItemRef::Volume(_)) => return Err(MutationError::NotAChapter(id.to_string())),
            None => return Err(MutationError::ItemNotFound(id.to_string())),
        }
    }
    let mut next = novel.clone();
    next.active_chapter_id = id.map(str::to_string);
    Ok(Mutation::new(next))
}
