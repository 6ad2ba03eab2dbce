//! Outline command surface for host UIs.
//!
//! # Responsibility
//! - Expose the outline commands invoked by user gestures.
//! - Swap in each new outline in one step, or leave the old one untouched.
//! - Act as the active-chapter collaborator: clear the pointer when the
//!   active chapter leaves the outline.
//!
//! # Invariants
//! - Commands never fail: rejected requests are no-ops reported as
//!   `CommandOutcome::Ignored` and logged at debug level.
//! - The held outline always passes `tree::validate`.

use crate::drag::machine::DragCommand;
use crate::drag::resolver::Placement;
use crate::engine::{self, Mutation, MutationError, MutationResult};
use crate::model::item::{Chapter, ChapterStatus, ItemId, ItemKind, NovelItem, Volume};
use crate::model::novel::{Novel, TrashItem};
use crate::model::view::ViewState;
use crate::service::collaborators::{
    Clock, IdSource, LogNotifier, Notification, NotificationKind, Notifier, SystemClock,
    UuidIdSource,
};
use crate::tree::invariants::{validate, InvariantViolation};
use crate::tree::locate::{find_live, trash_index, ItemRef};
use crate::tree::walk::{chapter_count, visible_rows, volume_count, OutlineRow};
use log::{debug, error, info};

/// Effect of one applied command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandEffect {
    /// Ids that left the live outline.
    pub removed_ids: Vec<ItemId>,
    /// Id of the item created by the command.
    pub created_id: Option<ItemId>,
    /// Whether the active chapter pointer was cleared.
    pub active_chapter_cleared: bool,
}

/// Outcome of one outline command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Applied(CommandEffect),
    /// The request was a no-op; the outline is unchanged.
    Ignored(MutationError),
}

impl CommandOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    pub fn created_id(&self) -> Option<&str> {
        match self {
            Self::Applied(effect) => effect.created_id.as_deref(),
            Self::Ignored(_) => None,
        }
    }
}

/// Outline session for one novel.
pub struct OutlineService {
    novel: Novel,
    view: ViewState,
    ids: Box<dyn IdSource>,
    clock: Box<dyn Clock>,
    notifier: Box<dyn Notifier>,
}

impl OutlineService {
    /// Creates a session over an existing outline with default collaborators.
    ///
    /// # Errors
    /// - Returns the first violated invariant when `novel` is malformed.
    pub fn try_new(novel: Novel, view: ViewState) -> Result<Self, InvariantViolation> {
        validate(&novel)?;
        Ok(Self {
            novel,
            view,
            ids: Box::new(UuidIdSource),
            clock: Box::new(SystemClock),
            notifier: Box::new(LogNotifier),
        })
    }

    pub fn with_id_source(mut self, ids: impl IdSource + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    pub fn novel(&self) -> &Novel {
        &self.novel
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Hands back the outline and view state, e.g. for persistence.
    pub fn into_parts(self) -> (Novel, ViewState) {
        (self.novel, self.view)
    }

    /// Rows in render order.
    pub fn rows(&self) -> Vec<OutlineRow> {
        visible_rows(&self.novel, &self.view)
    }

    /// Volumes and chapters in trash, in deletion order.
    pub fn trash_entries(&self) -> Vec<&TrashItem> {
        engine::structural_trash(&self.novel)
    }

    pub fn move_item(
        &mut self,
        dragged_id: &str,
        target_id: Option<&str>,
        placement: Placement,
    ) -> CommandOutcome {
        let result = engine::move_item(&self.novel, dragged_id, target_id, placement);
        self.commit("move_item", dragged_id, result)
    }

    pub fn rename_item(&mut self, id: &str, new_title: &str) -> CommandOutcome {
        let result = engine::rename_item(&self.novel, id, new_title);
        self.commit("rename_item", id, result)
    }

    pub fn update_chapter_status(&mut self, id: &str, status: ChapterStatus) -> CommandOutcome {
        let result = engine::update_chapter_status(&self.novel, id, status);
        self.commit("update_chapter_status", id, result)
    }

    pub fn delete_item(&mut self, id: &str, kind: ItemKind) -> CommandOutcome {
        let title = find_live(&self.novel, id).map(|item| match item {
            ItemRef::Volume(volume) => volume.title.clone(),
            ItemRef::Chapter(chapter) => chapter.title.clone(),
        });
        let result = engine::delete_item(&self.novel, id, kind, self.clock.now_ms());
        let outcome = self.commit("delete_item", id, result);
        self.notify_if_applied(&outcome, NotificationKind::MovedToTrash, id, title);
        outcome
    }

    pub fn restore_item(&mut self, id: &str) -> CommandOutcome {
        let title = self.trash_title(id);
        let result = engine::restore_item(&self.novel, id);
        let outcome = self.commit("restore_item", id, result);
        self.notify_if_applied(&outcome, NotificationKind::Restored, id, title);
        outcome
    }

    pub fn restore_item_to_location(
        &mut self,
        id: &str,
        target_id: Option<&str>,
        placement: Placement,
    ) -> CommandOutcome {
        let title = self.trash_title(id);
        let result = engine::restore_item_to_location(&self.novel, id, target_id, placement);
        let outcome = self.commit("restore_item_to_location", id, result);
        self.notify_if_applied(&outcome, NotificationKind::Restored, id, title);
        outcome
    }

    pub fn permanent_delete_item(&mut self, id: &str) -> CommandOutcome {
        let title = self.trash_title(id);
        let result = engine::permanent_delete(&self.novel, id);
        let outcome = self.commit("permanent_delete_item", id, result);
        if let CommandOutcome::Applied(effect) = &outcome {
            for removed in &effect.removed_ids {
                self.view.forget(removed);
            }
        }
        self.notify_if_applied(&outcome, NotificationKind::PermanentlyDeleted, id, title);
        outcome
    }

    /// Flips collapsed state of a live volume.
    pub fn toggle_volume(&mut self, id: &str) -> CommandOutcome {
        match find_live(&self.novel, id) {
            Some(ItemRef::Volume(_)) => {
                let collapsed = self.view.toggle(id);
                debug!(
                    "event=toggle_volume module=service status=ok id={id} collapsed={collapsed}"
                );
                CommandOutcome::Applied(CommandEffect::default())
            }
            Some(ItemRef::Chapter(_)) => {
                self.ignore("toggle_volume", id, MutationError::NotAVolume(id.to_string()))
            }
            None => self.ignore("toggle_volume", id, MutationError::ItemNotFound(id.to_string())),
        }
    }

    /// Appends a new draft chapter to a volume, or to the root when `None`.
    pub fn create_chapter(&mut self, parent_id: Option<&str>) -> CommandOutcome {
        let id = self.ids.next_id(ItemKind::Chapter);
        let title = format!("Chapter {}", chapter_count(&self.novel) + 1);
        let chapter = Chapter::new(id.clone(), title);
        let result = engine::insert_item(&self.novel, NovelItem::Chapter(chapter), parent_id);
        self.commit_created("create_chapter", id, result)
    }

    /// Appends a new empty volume to the root.
    pub fn create_volume(&mut self) -> CommandOutcome {
        let id = self.ids.next_id(ItemKind::Volume);
        let title = format!("Volume {}", volume_count(&self.novel) + 1);
        let volume = Volume::new(id.clone(), title);
        let result = engine::insert_item(&self.novel, NovelItem::Volume(volume), None);
        self.commit_created("create_volume", id, result)
    }

    /// Sets or clears the active chapter.
    pub fn select_chapter(&mut self, id: Option<&str>) -> CommandOutcome {
        let result = engine::select_chapter(&self.novel, id);
        self.commit("select_chapter", id.unwrap_or("-"), result)
    }

    /// Executes the command produced by a drag drop.
    pub fn execute(&mut self, command: &DragCommand) -> CommandOutcome {
        match command {
            DragCommand::Move { dragged_id, target } => {
                self.move_item(dragged_id, target.target_id.as_deref(), target.placement)
            }
            DragCommand::RestoreTo { id, target } => {
                self.restore_item_to_location(id, target.target_id.as_deref(), target.placement)
            }
            DragCommand::Delete { id, kind } => self.delete_item(id, *kind),
        }
    }

    fn commit_created(
        &mut self,
        op: &'static str,
        id: ItemId,
        result: MutationResult,
    ) -> CommandOutcome {
        match self.commit(op, &id, result) {
            CommandOutcome::Applied(mut effect) => {
                effect.created_id = Some(id);
                CommandOutcome::Applied(effect)
            }
            ignored => ignored,
        }
    }

    fn commit(&mut self, op: &'static str, id: &str, result: MutationResult) -> CommandOutcome {
        let Mutation {
            mut novel,
            removed_ids,
        } = match result {
            Ok(mutation) => mutation,
            Err(err) => return self.ignore(op, id, err),
        };

        let mut active_chapter_cleared = false;
        if let Some(active) = novel.active_chapter_id.as_deref() {
            if removed_ids.iter().any(|removed| removed == active) {
                novel.active_chapter_id = None;
                active_chapter_cleared = true;
            }
        }

        if let Err(err) = validate(&novel) {
            error!(
                "event=outline_command module=service status=error op={op} id={id} error_code=invariant_violation error={err}"
            );
            debug_assert!(false, "engine produced an invalid outline: {err}");
            return CommandOutcome::Ignored(MutationError::Invariant(err));
        }

        self.novel = novel;
        info!(
            "event=outline_command module=service status=ok op={op} id={id} removed={} active_cleared={active_chapter_cleared}",
            removed_ids.len()
        );
        CommandOutcome::Applied(CommandEffect {
            removed_ids,
            created_id: None,
            active_chapter_cleared,
        })
    }

    fn ignore(&self, op: &'static str, id: &str, err: MutationError) -> CommandOutcome {
        debug!(
            "event=outline_command module=service status=noop op={op} id={id} reason={}",
            err.code()
        );
        CommandOutcome::Ignored(err)
    }

    fn trash_title(&self, id: &str) -> Option<String> {
        trash_index(&self.novel, id).map(|index| self.novel.trash[index].entity.title().to_string())
    }

    fn notify_if_applied(
        &self,
        outcome: &CommandOutcome,
        kind: NotificationKind,
        id: &str,
        title: Option<String>,
    ) {
        if outcome.is_applied() {
            self.notifier.notify(&Notification {
                kind,
                item_id: id.to_string(),
                title: title.unwrap_or_default(),
            });
        }
    }
}
