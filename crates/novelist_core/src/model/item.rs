//! Outline item model.
//!
//! # Responsibility
//! - Define the Volume/Chapter shapes that make up a novel outline.
//! - Keep chapter payload opaque so moves carry it verbatim.
//!
//! # Invariants
//! - `id` is stable for the item's lifetime and never reused.
//! - A `Volume` owns its chapters; a `Chapter` never owns children.
//! - Only one nesting level exists: volumes cannot hold volumes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stable identifier shared by volumes, chapters and trash entries.
pub type ItemId = String;

/// Structural kind of one outline item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemKind {
    Volume,
    Chapter,
}

impl ItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Volume => "volume",
            Self::Chapter => "chapter",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "volume" => Some(Self::Volume),
            "chapter" => Some(Self::Chapter),
            _ => None,
        }
    }
}

/// Workflow state of one chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChapterStatus {
    #[default]
    Draft,
    Review,
    Done,
}

impl ChapterStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Review => "review",
            Self::Done => "done",
        }
    }

    /// Parses the lowercase storage label.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "review" => Some(Self::Review),
            "done" => Some(Self::Done),
            _ => None,
        }
    }
}

/// Leaf content unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: ItemId,
    pub title: String,
    #[serde(default)]
    pub status: ChapterStatus,
    /// Content, outline and history owned by the editing subsystem.
    #[serde(default)]
    pub payload: Value,
}

impl Chapter {
    /// Creates an empty draft chapter.
    pub fn new(id: impl Into<ItemId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            status: ChapterStatus::Draft,
            payload: Value::Null,
        }
    }
}

/// Ordered container of chapters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    pub id: ItemId,
    pub title: String,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

impl Volume {
    /// Creates an empty volume.
    pub fn new(id: impl Into<ItemId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            chapters: Vec::new(),
        }
    }

    /// Builder-style helper used by hosts that import whole volumes.
    pub fn with_chapters(mut self, chapters: Vec<Chapter>) -> Self {
        self.chapters = chapters;
        self
    }
}

/// One entry of the top-level outline sequence.
///
/// Serialized with a `type` tag (`VOLUME` / `CHAPTER`) so persisted shapes
/// stay readable by hosts that do not share these types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NovelItem {
    Volume(Volume),
    Chapter(Chapter),
}

impl NovelItem {
    pub fn id(&self) -> &str {
        match self {
            Self::Volume(volume) => volume.id.as_str(),
            Self::Chapter(chapter) => chapter.id.as_str(),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Volume(volume) => volume.title.as_str(),
            Self::Chapter(chapter) => chapter.title.as_str(),
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Volume(_) => ItemKind::Volume,
            Self::Chapter(_) => ItemKind::Chapter,
        }
    }

    /// Ids carried by this item, the item's own id first.
    pub fn held_ids(&self) -> impl Iterator<Item = &str> + '_ {
        let chapters: &[Chapter] = match self {
            Self::Volume(volume) => volume.chapters.as_slice(),
            Self::Chapter(_) => &[],
        };
        std::iter::once(self.id()).chain(chapters.iter().map(|chapter| chapter.id.as_str()))
    }

    /// Owned copy of [`NovelItem::held_ids`].
    pub fn ids(&self) -> Vec<ItemId> {
        self.held_ids().map(str::to_string).collect()
    }
}

impl From<Volume> for NovelItem {
    fn from(value: Volume) -> Self {
        Self::Volume(value)
    }
}

impl From<Chapter> for NovelItem {
    fn from(value: Chapter) -> Self {
        Self::Chapter(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{Chapter, ChapterStatus, ItemKind, NovelItem, Volume};
    use serde_json::json;

    #[test]
    fn volume_ids_list_own_id_first() {
        let volume = Volume::new("v1", "Part One")
            .with_chapters(vec![Chapter::new("c1", "A"), Chapter::new("c2", "B")]);
        let item = NovelItem::from(volume);
        assert_eq!(item.ids(), vec!["v1", "c1", "c2"]);
    }

    #[test]
    fn item_serializes_with_type_tag() {
        let mut chapter = Chapter::new("c1", "Opening");
        chapter.status = ChapterStatus::Review;
        chapter.payload = json!({ "content": "It was a dark night." });

        let value = serde_json::to_value(NovelItem::from(chapter.clone())).unwrap();
        assert_eq!(value["type"], "CHAPTER");
        assert_eq!(value["status"], "REVIEW");
        assert_eq!(value["payload"]["content"], "It was a dark night.");

        let decoded: NovelItem = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, NovelItem::Chapter(chapter));
    }

    #[test]
    fn parse_accepts_storage_labels() {
        assert_eq!(ChapterStatus::parse(" Review "), Some(ChapterStatus::Review));
        assert_eq!(ChapterStatus::parse("archived"), None);
        assert_eq!(ItemKind::parse("VOLUME"), Some(ItemKind::Volume));
        assert_eq!(ItemKind::parse("folder"), None);
    }
}
