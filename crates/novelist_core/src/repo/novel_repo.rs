//! Novel outline repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist a whole outline (items, trash, active chapter, view state)
//!   losslessly and load it back.
//! - Keep SQL details inside the repository boundary.
//!
//! # Invariants
//! - Saved outlines must pass `tree::validate`; loaded outlines are checked
//!   again before they are handed out.
//! - Sequence order is stored as dense `sort_order` per container.
//! - Saving replaces the stored outline of one novel in a single transaction.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::item::{Chapter, ChapterStatus, ItemKind, NovelItem, Volume};
use crate::model::novel::{Novel, TrashItem, TrashedEntity};
use crate::model::view::ViewState;
use crate::tree::invariants::{validate, InvariantViolation};
use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use serde_json::Value;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by outline repository operations.
pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from outline repository operations.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// No stored novel with this id.
    NotFound(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Stored rows cannot be turned into an outline.
    InvalidData(String),
    /// Outline breaks an invariant (on save) or stored rows do (on load).
    Invariant(InvariantViolation),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "novel not found: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "outline repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::InvalidData(message) => write!(f, "invalid stored outline: {message}"),
            Self::Invariant(err) => write!(f, "outline invariant violated: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Invariant(err) => Some(err),
            Self::NotFound(_) | Self::UninitializedConnection { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Query(value))
    }
}

impl From<InvariantViolation> for RepoError {
    fn from(value: InvariantViolation) -> Self {
        Self::Invariant(value)
    }
}

/// Listing row for stored novels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NovelSummary {
    pub novel_id: String,
    pub title: String,
    /// Epoch ms of the last save.
    pub updated_at: i64,
}

/// Repository interface for outline persistence.
pub trait NovelRepository {
    /// Stores `novel` and `view`, replacing any previous state for the novel.
    fn save_novel(&self, novel: &Novel, view: &ViewState) -> RepoResult<()>;
    /// Loads one novel with its view state.
    fn load_novel(&self, novel_id: &str) -> RepoResult<Option<(Novel, ViewState)>>;
    /// Lists stored novels ordered by title, then id.
    fn list_novels(&self) -> RepoResult<Vec<NovelSummary>>;
    /// Removes one novel and everything stored for it.
    fn delete_novel(&self, novel_id: &str) -> RepoResult<()>;
}

/// SQLite-backed outline repository.
pub struct SqliteNovelRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNovelRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }
}

impl NovelRepository for SqliteNovelRepository<'_> {
    fn save_novel(&self, novel: &Novel, view: &ViewState) -> RepoResult<()> {
        validate(novel)?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO novels (novel_id, title, active_chapter_id)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(novel_id) DO UPDATE SET
                 title = excluded.title,
                 active_chapter_id = excluded.active_chapter_id,
                 updated_at = (strftime('%s', 'now') * 1000);",
            params![
                novel.id.as_str(),
                novel.title.as_str(),
                novel.active_chapter_id.as_deref(),
            ],
        )?;
        for table in ["outline_items", "trash_entries", "collapsed_volumes"] {
            tx.execute(
                &format!("DELETE FROM {table} WHERE novel_id = ?1;"),
                [novel.id.as_str()],
            )?;
        }

        for (index, item) in novel.items.iter().enumerate() {
            match item {
                NovelItem::Chapter(chapter) => {
                    insert_chapter_row(&tx, &novel.id, None, index, chapter)?;
                }
                NovelItem::Volume(volume) => {
                    tx.execute(
                        "INSERT INTO outline_items (
                            novel_id, item_id, kind, parent_id, sort_order, title, status, payload
                        ) VALUES (?1, ?2, 'volume', NULL, ?3, ?4, NULL, NULL);",
                        params![
                            novel.id.as_str(),
                            volume.id.as_str(),
                            index as i64,
                            volume.title.as_str(),
                        ],
                    )?;
                    for (nested, chapter) in volume.chapters.iter().enumerate() {
                        insert_chapter_row(&tx, &novel.id, Some(&volume.id), nested, chapter)?;
                    }
                }
            }
        }

        for (index, entry) in novel.trash.iter().enumerate() {
            let entity_json = serde_json::to_string(&entry.entity)
                .map_err(|err| RepoError::InvalidData(format!("trash entry encode failed: {err}")))?;
            tx.execute(
                "INSERT INTO trash_entries (novel_id, entry_id, sort_order, deleted_at, entity_json)
                 VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    novel.id.as_str(),
                    entry.id(),
                    index as i64,
                    entry.deleted_at,
                    entity_json,
                ],
            )?;
        }

        for volume_id in view.collapsed_ids() {
            tx.execute(
                "INSERT INTO collapsed_volumes (novel_id, volume_id) VALUES (?1, ?2);",
                params![novel.id.as_str(), volume_id],
            )?;
        }

        tx.commit()?;
        info!(
            "event=novel_save module=repo status=ok novel_id={} items={} trash={}",
            novel.id,
            novel.items.len(),
            novel.trash.len()
        );
        Ok(())
    }

    fn load_novel(&self, novel_id: &str) -> RepoResult<Option<(Novel, ViewState)>> {
        let header = self
            .conn
            .query_row(
                "SELECT title, active_chapter_id FROM novels WHERE novel_id = ?1;",
                [novel_id],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, Option<String>>(1)?)),
            )
            .optional()?;
        let Some((title, active_chapter_id)) = header else {
            debug!("event=novel_load module=repo status=not_found novel_id={novel_id}");
            return Ok(None);
        };

        let mut novel = Novel::new(novel_id, title);
        novel.items = load_items(self.conn, novel_id)?;
        novel.trash = load_trash(self.conn, novel_id)?;
        novel.active_chapter_id = active_chapter_id;
        validate(&novel)?;

        let mut view = ViewState::new();
        let mut stmt = self.conn.prepare(
            "SELECT volume_id FROM collapsed_volumes WHERE novel_id = ?1 ORDER BY volume_id ASC;",
        )?;
        let mut rows = stmt.query([novel_id])?;
        while let Some(row) = rows.next()? {
            let volume_id: String = row.get(0)?;
            view.set_collapsed(&volume_id, true);
        }

        Ok(Some((novel, view)))
    }

    fn list_novels(&self) -> RepoResult<Vec<NovelSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT novel_id, title, updated_at FROM novels ORDER BY title ASC, novel_id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(NovelSummary {
                novel_id: row.get(0)?,
                title: row.get(1)?,
                updated_at: row.get(2)?,
            });
        }
        Ok(items)
    }

    fn delete_novel(&self, novel_id: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM novels WHERE novel_id = ?1;", [novel_id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(novel_id.to_string()));
        }
        Ok(())
    }
}

fn insert_chapter_row(
    tx: &Transaction<'_>,
    novel_id: &str,
    parent_id: Option<&str>,
    index: usize,
    chapter: &Chapter,
) -> RepoResult<()> {
    let payload = if chapter.payload.is_null() {
        None
    } else {
        Some(chapter.payload.to_string())
    };
    tx.execute(
        "INSERT INTO outline_items (
            novel_id, item_id, kind, parent_id, sort_order, title, status, payload
        ) VALUES (?1, ?2, 'chapter', ?3, ?4, ?5, ?6, ?7);",
        params![
            novel_id,
            chapter.id.as_str(),
            parent_id,
            index as i64,
            chapter.title.as_str(),
            chapter.status.as_str(),
            payload,
        ],
    )?;
    Ok(())
}

struct ItemRow {
    item_id: String,
    kind: ItemKind,
    parent_id: Option<String>,
    title: String,
    status: Option<String>,
    payload: Option<String>,
}

fn load_items(conn: &Connection, novel_id: &str) -> RepoResult<Vec<NovelItem>> {
    let mut stmt = conn.prepare(
        "SELECT item_id, kind, parent_id, title, status, payload
         FROM outline_items
         WHERE novel_id = ?1
         ORDER BY sort_order ASC, item_id ASC;",
    )?;
    let mut rows = stmt.query([novel_id])?;

    let mut roots = Vec::new();
    let mut nested: HashMap<String, Vec<Chapter>> = HashMap::new();
    while let Some(row) = rows.next()? {
        let kind_text: String = row.get(1)?;
        let kind = match kind_text.as_str() {
            "volume" => ItemKind::Volume,
            "chapter" => ItemKind::Chapter,
            other => {
                return Err(RepoError::InvalidData(format!(
                    "invalid item kind `{other}` in outline_items.kind"
                )))
            }
        };
        let row = ItemRow {
            item_id: row.get(0)?,
            kind,
            parent_id: row.get(2)?,
            title: row.get(3)?,
            status: row.get(4)?,
            payload: row.get(5)?,
        };

        match (row.kind, row.parent_id.clone()) {
            (ItemKind::Volume, Some(parent_id)) => {
                return Err(RepoError::InvalidData(format!(
                    "volume {} is nested under {parent_id}",
                    row.item_id
                )));
            }
            (ItemKind::Volume, None) => roots.push(NovelItem::Volume(Volume::new(
                row.item_id,
                row.title,
            ))),
            (ItemKind::Chapter, None) => roots.push(NovelItem::Chapter(parse_chapter(row)?)),
            (ItemKind::Chapter, Some(parent_id)) => {
                nested
                    .entry(parent_id)
                    .or_default()
                    .push(parse_chapter(row)?);
            }
        }
    }

    for item in &mut roots {
        if let NovelItem::Volume(volume) = item {
            volume.chapters = nested.remove(&volume.id).unwrap_or_default();
        }
    }
    if let Some(orphan_parent) = nested.keys().next() {
        return Err(RepoError::InvalidData(format!(
            "chapters reference missing volume {orphan_parent}"
        )));
    }
    Ok(roots)
}

fn parse_chapter(row: ItemRow) -> RepoResult<Chapter> {
    let status = match row.status.as_deref() {
        Some(value) => ChapterStatus::parse(value).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid chapter status `{value}` in outline_items.status"
            ))
        })?,
        None => ChapterStatus::Draft,
    };
    let payload = match row.payload.as_deref() {
        Some(text) => serde_json::from_str::<Value>(text).map_err(|err| {
            RepoError::InvalidData(format!(
                "invalid payload for chapter {}: {err}",
                row.item_id
            ))
        })?,
        None => Value::Null,
    };
    Ok(Chapter {
        id: row.item_id,
        title: row.title,
        status,
        payload,
    })
}

fn load_trash(conn: &Connection, novel_id: &str) -> RepoResult<Vec<TrashItem>> {
    let mut stmt = conn.prepare(
        "SELECT entry_id, deleted_at, entity_json
         FROM trash_entries
         WHERE novel_id = ?1
         ORDER BY sort_order ASC;",
    )?;
    let mut rows = stmt.query([novel_id])?;
    let mut trash = Vec::new();
    while let Some(row) = rows.next()? {
        let entry_id: String = row.get(0)?;
        let entity_json: String = row.get(2)?;
        let entity: TrashedEntity = serde_json::from_str(&entity_json).map_err(|err| {
            RepoError::InvalidData(format!("invalid trash entry {entry_id}: {err}"))
        })?;
        if entity.id() != entry_id {
            return Err(RepoError::InvalidData(format!(
                "trash entry {entry_id} holds entity {}",
                entity.id()
            )));
        }
        trash.push(TrashItem {
            entity,
            deleted_at: row.get(1)?,
        });
    }
    Ok(trash)
}
