//! Item lookup across the live outline and the trash list.

use crate::model::item::{Chapter, ItemKind, NovelItem, Volume};
use crate::model::novel::Novel;

/// Position of one live item in the outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// Entry of the root `items` sequence.
    Root { index: usize },
    /// Chapter nested in the volume at `items[volume_index]`.
    Nested { volume_index: usize, index: usize },
}

/// Borrowed view of one live item, nested chapters included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemRef<'a> {
    Volume(&'a Volume),
    Chapter(&'a Chapter),
}

impl ItemRef<'_> {
    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Volume(_) => ItemKind::Volume,
            Self::Chapter(_) => ItemKind::Chapter,
        }
    }
}

/// Finds the live location of `id` in `items`.
pub fn locate(items: &[NovelItem], id: &str) -> Option<Location> {
    for (index, item) in items.iter().enumerate() {
        if item.id() == id {
            return Some(Location::Root { index });
        }
        if let NovelItem::Volume(volume) = item {
            if let Some(nested) = volume.chapters.iter().position(|chapter| chapter.id == id) {
                return Some(Location::Nested {
                    volume_index: index,
                    index: nested,
                });
            }
        }
    }
    None
}

/// Returns the live item with `id`, nested chapters included.
pub fn find_live<'a>(novel: &'a Novel, id: &str) -> Option<ItemRef<'a>> {
    match locate(&novel.items, id)? {
        Location::Root { index } => Some(match &novel.items[index] {
            NovelItem::Volume(volume) => ItemRef::Volume(volume),
            NovelItem::Chapter(chapter) => ItemRef::Chapter(chapter),
        }),
        Location::Nested {
            volume_index,
            index,
        } => match &novel.items[volume_index] {
            NovelItem::Volume(volume) => volume.chapters.get(index).map(ItemRef::Chapter),
            NovelItem::Chapter(_) => None,
        },
    }
}

/// Returns the index of the top-level trash entry with `id`.
///
/// Chapters nested inside a trashed volume are not addressable on their own.
pub fn trash_index(novel: &Novel, id: &str) -> Option<usize> {
    novel.trash.iter().position(|entry| entry.id() == id)
}

/// Returns whether `id` is held anywhere in trash, nested chapters included.
pub fn is_in_trash(novel: &Novel, id: &str) -> bool {
    novel
        .trash
        .iter()
        .any(|entry| entry.held_ids().any(|held| held == id))
}

/// Returns the id of the volume holding chapter `id`, if nested.
pub fn parent_volume_id<'a>(novel: &'a Novel, id: &str) -> Option<&'a str> {
    match locate(&novel.items, id)? {
        Location::Nested { volume_index, .. } => Some(novel.items[volume_index].id()),
        Location::Root { .. } => None,
    }
}
