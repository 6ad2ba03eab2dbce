//! FFI use-case API for Flutter-facing outline calls.
//!
//! # Responsibility
//! - Expose one sync function per outline command to Dart via FRB.
//! - Load, mutate and save the novel around every call so the UI never
//!   holds Rust-side session state.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - `ok=false` means the call never reached the outline (bad input, missing
//!   novel or storage failure). `ok=true, changed=false` means the command was
//!   a no-op and the stored outline is untouched.

use log::warn;
use novelist_core::db::open_db;
use novelist_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    ChapterStatus, CommandOutcome, ItemKind, Novel, NovelRepository, OutlineService, Placement,
    SqliteNovelRepository, ViewState,
};
use std::path::PathBuf;
use std::sync::OnceLock;

const OUTLINE_DB_FILE_NAME: &str = "novelist_outline.sqlite3";
static OUTLINE_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Result envelope shared by every outline command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineActionResponse {
    /// Whether the command reached the outline.
    pub ok: bool,
    /// Whether the stored outline changed.
    pub changed: bool,
    /// Id of the item created by the command, if any.
    pub created_id: Option<String>,
    /// Human-readable message for diagnostics/UI.
    pub message: String,
}

impl OutlineActionResponse {
    fn from_outcome(op: &str, outcome: &CommandOutcome) -> Self {
        match outcome {
            CommandOutcome::Applied(effect) => Self {
                ok: true,
                changed: true,
                created_id: effect.created_id.clone(),
                message: format!("{op} applied."),
            },
            CommandOutcome::Ignored(reason) => Self {
                ok: true,
                changed: false,
                created_id: None,
                message: format!("{op} ignored: {reason}"),
            },
        }
    }

    fn failure(op: &str, message: impl Into<String>) -> Self {
        let message = format!("{op} failed: {}", message.into());
        warn!("event=ffi_call module=ffi status=error op={op} error={message}");
        Self {
            ok: false,
            changed: false,
            created_id: None,
            message,
        }
    }
}

/// Serialized outline for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineSnapshotResponse {
    pub ok: bool,
    /// Novel as camelCase JSON (`items`, `trash`, `activeChapterId`).
    pub novel_json: String,
    /// Volumes currently collapsed in the outline view.
    pub collapsed_volume_ids: Vec<String>,
    pub message: String,
}

/// Opens a novel, creating an empty one with `title` when it is not stored yet.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - `changed=true` only when the novel was created by this call.
#[flutter_rust_bridge::frb(sync)]
pub fn outline_open_novel(novel_id: String, title: String) -> OutlineActionResponse {
    const OP: &str = "outline_open_novel";
    let novel_id = novel_id.trim();
    if novel_id.is_empty() {
        return OutlineActionResponse::failure(OP, "novel_id must not be blank");
    }

    let result = with_repo(|repo| {
        if repo.load_novel(novel_id)?.is_some() {
            return Ok(false);
        }
        repo.save_novel(&Novel::new(novel_id, title.trim()), &ViewState::new())?;
        Ok(true)
    });
    match result {
        Ok(created) => OutlineActionResponse {
            ok: true,
            changed: created,
            created_id: created.then(|| novel_id.to_string()),
            message: if created {
                "Novel created.".to_string()
            } else {
                "Novel opened.".to_string()
            },
        },
        Err(err) => OutlineActionResponse::failure(OP, err),
    }
}

/// Moves a live item relative to `target_id`; `None` addresses the root.
///
/// `placement` is one of `before|after|inside`.
#[flutter_rust_bridge::frb(sync)]
pub fn outline_move_item(
    novel_id: String,
    dragged_id: String,
    target_id: Option<String>,
    placement: String,
) -> OutlineActionResponse {
    const OP: &str = "outline_move_item";
    let Some(placement) = Placement::parse(&placement) else {
        return OutlineActionResponse::failure(OP, format!("unknown placement `{placement}`"));
    };
    run_command(OP, &novel_id, |service| {
        service.move_item(&dragged_id, target_id.as_deref(), placement)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn outline_rename_item(novel_id: String, id: String, title: String) -> OutlineActionResponse {
    run_command("outline_rename_item", &novel_id, |service| {
        service.rename_item(&id, &title)
    })
}

/// Sets chapter workflow status (`draft|review|done`).
#[flutter_rust_bridge::frb(sync)]
pub fn outline_update_chapter_status(
    novel_id: String,
    id: String,
    status: String,
) -> OutlineActionResponse {
    const OP: &str = "outline_update_chapter_status";
    let Some(status) = ChapterStatus::parse(&status) else {
        return OutlineActionResponse::failure(OP, format!("unknown status `{status}`"));
    };
    run_command(OP, &novel_id, |service| {
        service.update_chapter_status(&id, status)
    })
}

/// Moves a live item to trash. `kind` is `volume|chapter`.
#[flutter_rust_bridge::frb(sync)]
pub fn outline_delete_item(novel_id: String, id: String, kind: String) -> OutlineActionResponse {
    const OP: &str = "outline_delete_item";
    let Some(kind) = ItemKind::parse(&kind) else {
        return OutlineActionResponse::failure(OP, format!("unknown item kind `{kind}`"));
    };
    run_command(OP, &novel_id, |service| service.delete_item(&id, kind))
}

/// Restores a trash entry to the end of the root sequence.
#[flutter_rust_bridge::frb(sync)]
pub fn outline_restore_item(novel_id: String, id: String) -> OutlineActionResponse {
    run_command("outline_restore_item", &novel_id, |service| {
        service.restore_item(&id)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn outline_restore_item_to_location(
    novel_id: String,
    id: String,
    target_id: Option<String>,
    placement: String,
) -> OutlineActionResponse {
    const OP: &str = "outline_restore_item_to_location";
    let Some(placement) = Placement::parse(&placement) else {
        return OutlineActionResponse::failure(OP, format!("unknown placement `{placement}`"));
    };
    run_command(OP, &novel_id, |service| {
        service.restore_item_to_location(&id, target_id.as_deref(), placement)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn outline_permanent_delete_item(novel_id: String, id: String) -> OutlineActionResponse {
    run_command("outline_permanent_delete_item", &novel_id, |service| {
        service.permanent_delete_item(&id)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn outline_toggle_volume(novel_id: String, id: String) -> OutlineActionResponse {
    run_command("outline_toggle_volume", &novel_id, |service| {
        service.toggle_volume(&id)
    })
}

/// Appends a new chapter to `parent_id`, or to the root when `None`.
#[flutter_rust_bridge::frb(sync)]
pub fn outline_create_chapter(novel_id: String, parent_id: Option<String>) -> OutlineActionResponse {
    run_command("outline_create_chapter", &novel_id, |service| {
        service.create_chapter(parent_id.as_deref())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn outline_create_volume(novel_id: String) -> OutlineActionResponse {
    run_command("outline_create_volume", &novel_id, |service| {
        service.create_volume()
    })
}

/// Sets the active chapter, or clears it when `id` is `None`.
#[flutter_rust_bridge::frb(sync)]
pub fn outline_select_chapter(novel_id: String, id: Option<String>) -> OutlineActionResponse {
    run_command("outline_select_chapter", &novel_id, |service| {
        service.select_chapter(id.as_deref())
    })
}

/// Returns the stored outline for rendering.
#[flutter_rust_bridge::frb(sync)]
pub fn outline_snapshot(novel_id: String) -> OutlineSnapshotResponse {
    let loaded = with_repo(|repo| Ok(repo.load_novel(novel_id.trim())?));
    let (novel, view) = match loaded {
        Ok(Some(state)) => state,
        Ok(None) => return snapshot_failure(format!("novel not found: {novel_id}")),
        Err(err) => return snapshot_failure(err),
    };
    match serde_json::to_string(&novel) {
        Ok(novel_json) => OutlineSnapshotResponse {
            ok: true,
            novel_json,
            collapsed_volume_ids: view.collapsed_ids().map(str::to_string).collect(),
            message: format!("{} item(s), {} in trash.", novel.items.len(), novel.trash.len()),
        },
        Err(err) => snapshot_failure(format!("encode failed: {err}")),
    }
}

fn snapshot_failure(message: impl Into<String>) -> OutlineSnapshotResponse {
    let message = format!("outline_snapshot failed: {}", message.into());
    warn!("event=ffi_call module=ffi status=error op=outline_snapshot error={message}");
    OutlineSnapshotResponse {
        ok: false,
        novel_json: String::new(),
        collapsed_volume_ids: Vec::new(),
        message,
    }
}

fn run_command(
    op: &str,
    novel_id: &str,
    command: impl FnOnce(&mut OutlineService) -> CommandOutcome,
) -> OutlineActionResponse {
    let novel_id = novel_id.trim();
    let result = with_repo(|repo| {
        let Some((novel, view)) = repo.load_novel(novel_id)? else {
            return Ok(None);
        };
        let mut service = OutlineService::try_new(novel, view)
            .map_err(|err| format!("stored outline is invalid: {err}"))?;
        let outcome = command(&mut service);
        if outcome.is_applied() {
            let (novel, view) = service.into_parts();
            repo.save_novel(&novel, &view)?;
        }
        Ok(Some(outcome))
    });
    match result {
        Ok(Some(outcome)) => OutlineActionResponse::from_outcome(op, &outcome),
        Ok(None) => OutlineActionResponse::failure(op, format!("novel not found: {novel_id}")),
        Err(err) => OutlineActionResponse::failure(op, err),
    }
}

fn resolve_outline_db_path() -> PathBuf {
    OUTLINE_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("NOVELIST_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(OUTLINE_DB_FILE_NAME)
        })
        .clone()
}

fn with_repo<T>(
    f: impl FnOnce(&SqliteNovelRepository<'_>) -> Result<T, RepoCallError>,
) -> Result<T, String> {
    let db_path = resolve_outline_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("outline DB open failed: {err}"))?;
    let repo = SqliteNovelRepository::try_new(&conn)
        .map_err(|err| format!("outline repo init failed: {err}"))?;
    f(&repo).map_err(|err| err.0)
}

/// Flattened error text for one repository round-trip.
struct RepoCallError(String);

impl From<novelist_core::RepoError> for RepoCallError {
    fn from(value: novelist_core::RepoError) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RepoCallError {
    fn from(value: String) -> Self {
        Self(value)
    }
}
