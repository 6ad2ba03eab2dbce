//! Novel aggregate and trash entries.
//!
//! # Responsibility
//! - Hold the ordered outline (`items`) next to the soft-delete list (`trash`).
//! - Track the active chapter selection owned by the host.
//!
//! # Invariants
//! - Ids are unique across `items`, nested chapters and `trash`.
//! - `trash` is append-ordered: most recently deleted entry last.
//! - `active_chapter_id` names a live chapter or is unset.

use crate::model::item::{Chapter, ItemId, ItemKind, NovelItem, Volume};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Trashable entity owned by another subsystem (characters, notes, ...).
///
/// The outline core only carries these through; it never restores them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignEntity {
    pub id: ItemId,
    /// Owner-defined kind label, e.g. `character`.
    pub kind: String,
    pub title: String,
    #[serde(default)]
    pub payload: Value,
}

/// Payload of one trash entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrashedEntity {
    Volume(Volume),
    Chapter(Chapter),
    Foreign(ForeignEntity),
}

impl TrashedEntity {
    pub fn id(&self) -> &str {
        match self {
            Self::Volume(volume) => volume.id.as_str(),
            Self::Chapter(chapter) => chapter.id.as_str(),
            Self::Foreign(entity) => entity.id.as_str(),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Volume(volume) => volume.title.as_str(),
            Self::Chapter(chapter) => chapter.title.as_str(),
            Self::Foreign(entity) => entity.title.as_str(),
        }
    }

    /// Structural kind, or `None` for foreign entities.
    pub fn kind(&self) -> Option<ItemKind> {
        match self {
            Self::Volume(_) => Some(ItemKind::Volume),
            Self::Chapter(_) => Some(ItemKind::Chapter),
            Self::Foreign(_) => None,
        }
    }

    /// Converts back into an outline item; foreign entities stay put.
    pub fn into_item(self) -> Result<NovelItem, Self> {
        match self {
            Self::Volume(volume) => Ok(NovelItem::Volume(volume)),
            Self::Chapter(chapter) => Ok(NovelItem::Chapter(chapter)),
            other @ Self::Foreign(_) => Err(other),
        }
    }
}

impl From<NovelItem> for TrashedEntity {
    fn from(value: NovelItem) -> Self {
        match value {
            NovelItem::Volume(volume) => Self::Volume(volume),
            NovelItem::Chapter(chapter) => Self::Chapter(chapter),
        }
    }
}

/// Soft-deleted entity stamped with its deletion time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrashItem {
    #[serde(flatten)]
    pub entity: TrashedEntity,
    /// Unix epoch milliseconds.
    pub deleted_at: i64,
}

impl TrashItem {
    pub fn id(&self) -> &str {
        self.entity.id()
    }

    pub fn is_structural(&self) -> bool {
        self.entity.kind().is_some()
    }

    /// Ids held by this entry, the entry's own id first, then the nested
    /// chapters of a volume.
    pub fn held_ids(&self) -> impl Iterator<Item = &str> + '_ {
        let (own, chapters): (&str, &[Chapter]) = match &self.entity {
            TrashedEntity::Volume(volume) => (volume.id.as_str(), volume.chapters.as_slice()),
            TrashedEntity::Chapter(chapter) => (chapter.id.as_str(), &[]),
            TrashedEntity::Foreign(entity) => (entity.id.as_str(), &[]),
        };
        std::iter::once(own).chain(chapters.iter().map(|chapter| chapter.id.as_str()))
    }

    /// Owned copy of [`TrashItem::held_ids`].
    pub fn ids(&self) -> Vec<ItemId> {
        self.held_ids().map(str::to_string).collect()
    }
}

/// Outline aggregate for one novel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Novel {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub items: Vec<NovelItem>,
    #[serde(default)]
    pub trash: Vec<TrashItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_chapter_id: Option<ItemId>,
}

impl Novel {
    /// Creates an empty novel.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            items: Vec::new(),
            trash: Vec::new(),
            active_chapter_id: None,
        }
    }

    /// Builder-style helper for seeding the root sequence.
    pub fn with_items(mut self, items: Vec<NovelItem>) -> Self {
        self.items = items;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{ForeignEntity, Novel, TrashItem, TrashedEntity};
    use crate::model::item::{Chapter, Volume};
    use serde_json::Value;

    #[test]
    fn trash_item_flattens_entity_next_to_deleted_at() {
        let entry = TrashItem {
            entity: TrashedEntity::Volume(
                Volume::new("v1", "Part One").with_chapters(vec![Chapter::new("c1", "A")]),
            ),
            deleted_at: 1_700_000_000_000,
        };

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["type"], "VOLUME");
        assert_eq!(value["id"], "v1");
        assert_eq!(value["deletedAt"], 1_700_000_000_000_i64);
        assert_eq!(value["chapters"][0]["id"], "c1");

        let decoded: TrashItem = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, entry);
        assert_eq!(decoded.ids(), vec!["v1", "c1"]);
    }

    #[test]
    fn held_ids_borrow_nested_chapter_ids() {
        let mut chapter = Chapter::new("c2", "B");
        chapter.payload = serde_json::json!({ "content": "kept out of id lookups" });
        let entry = TrashItem {
            entity: TrashedEntity::Volume(
                Volume::new("v1", "Part One")
                    .with_chapters(vec![Chapter::new("c1", "A"), chapter]),
            ),
            deleted_at: 3,
        };

        assert_eq!(entry.held_ids().collect::<Vec<_>>(), vec!["v1", "c1", "c2"]);

        let single = TrashItem {
            entity: TrashedEntity::Chapter(Chapter::new("c9", "Loose")),
            deleted_at: 4,
        };
        assert_eq!(single.held_ids().collect::<Vec<_>>(), vec!["c9"]);
    }

    #[test]
    fn foreign_entries_are_not_structural() {
        let entry = TrashItem {
            entity: TrashedEntity::Foreign(ForeignEntity {
                id: "char-1".to_string(),
                kind: "character".to_string(),
                title: "Ada".to_string(),
                payload: Value::Null,
            }),
            deleted_at: 5,
        };
        assert!(!entry.is_structural());
        assert!(entry.entity.into_item().is_err());
    }

    #[test]
    fn unset_active_chapter_is_omitted_from_wire_shape() {
        let value = serde_json::to_value(Novel::new("n1", "Draft")).unwrap();
        assert!(value.get("activeChapterId").is_none());
        assert_eq!(value["items"], serde_json::json!([]));
    }
}
