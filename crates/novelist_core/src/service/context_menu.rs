//! Context menu controller.
//!
//! At most one menu is open. Opening replaces the current menu; a background
//! click or a completed action closes it.

use crate::model::item::{ChapterStatus, ItemId, ItemKind};
use crate::service::outline_service::{CommandOutcome, OutlineService};
use crate::tree::locate::parent_volume_id;
use log::debug;

/// Item the menu was opened on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuTarget {
    pub id: ItemId,
    pub kind: ItemKind,
}

/// Open menu anchored at a pointer position.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenMenu {
    pub target: MenuTarget,
    pub x: f64,
    pub y: f64,
}

/// Entries offered for one target kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEntry {
    Rename,
    SetStatus,
    CreateChapter,
    CreateVolume,
    Delete,
}

/// Action chosen from the menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    Rename(String),
    SetStatus(ChapterStatus),
    CreateChapter,
    CreateVolume,
    Delete,
}

/// Entries shown for a target of `kind`; status is chapter-only.
pub fn entries_for(kind: ItemKind) -> &'static [MenuEntry] {
    match kind {
        ItemKind::Volume => &[
            MenuEntry::Rename,
            MenuEntry::CreateChapter,
            MenuEntry::CreateVolume,
            MenuEntry::Delete,
        ],
        ItemKind::Chapter => &[
            MenuEntry::Rename,
            MenuEntry::SetStatus,
            MenuEntry::CreateChapter,
            MenuEntry::Delete,
        ],
    }
}

#[derive(Debug, Default)]
pub struct ContextMenu {
    open: Option<OpenMenu>,
}

impl ContextMenu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&OpenMenu> {
        self.open.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Opens a menu on `target`, replacing any open one.
    pub fn open(&mut self, target: MenuTarget, x: f64, y: f64) {
        debug!(
            "event=context_menu_open module=service status=ok id={} kind={}",
            target.id,
            target.kind.as_str()
        );
        self.open = Some(OpenMenu { target, x, y });
    }

    /// Background click.
    pub fn close(&mut self) {
        self.open = None;
    }

    /// Runs `action` against the open menu's target and closes the menu.
    ///
    /// Returns `None` when no menu is open.
    pub fn dispatch(
        &mut self,
        service: &mut OutlineService,
        action: MenuAction,
    ) -> Option<CommandOutcome> {
        let OpenMenu { target, .. } = self.open.take()?;
        let outcome = match action {
            MenuAction::Rename(title) => service.rename_item(&target.id, &title),
            MenuAction::SetStatus(status) => service.update_chapter_status(&target.id, status),
            MenuAction::CreateChapter => {
                let parent = match target.kind {
                    ItemKind::Volume => Some(target.id.clone()),
                    ItemKind::Chapter => {
                        parent_volume_id(service.novel(), &target.id).map(str::to_string)
                    }
                };
                service.create_chapter(parent.as_deref())
            }
            MenuAction::CreateVolume => service.create_volume(),
            MenuAction::Delete => service.delete_item(&target.id, target.kind),
        };
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::{entries_for, ContextMenu, MenuAction, MenuEntry, MenuTarget};
    use crate::engine::MutationError;
    use crate::model::item::{Chapter, ChapterStatus, ItemKind, NovelItem, Volume};
    use crate::model::novel::Novel;
    use crate::model::view::ViewState;
    use crate::service::collaborators::SequentialIdSource;
    use crate::service::outline_service::{CommandOutcome, OutlineService};

    fn service() -> OutlineService {
        let novel = Novel::new("n1", "Menu").with_items(vec![NovelItem::Volume(
            Volume::new("a", "A").with_chapters(vec![Chapter::new("c1", "One")]),
        )]);
        OutlineService::try_new(novel, ViewState::new())
            .unwrap()
            .with_id_source(SequentialIdSource::new("m"))
    }

    fn target(id: &str, kind: ItemKind) -> MenuTarget {
        MenuTarget {
            id: id.to_string(),
            kind,
        }
    }

    #[test]
    fn opening_replaces_previous_menu() {
        let mut menu = ContextMenu::new();
        menu.open(target("a", ItemKind::Volume), 1.0, 2.0);
        menu.open(target("c1", ItemKind::Chapter), 3.0, 4.0);
        assert_eq!(menu.current().map(|open| open.target.id.as_str()), Some("c1"));
        menu.close();
        assert!(!menu.is_open());
    }

    #[test]
    fn dispatch_runs_action_and_closes() {
        let mut service = service();
        let mut menu = ContextMenu::new();
        menu.open(target("c1", ItemKind::Chapter), 0.0, 0.0);

        let outcome = menu
            .dispatch(&mut service, MenuAction::CreateChapter)
            .expect("menu was open");
        assert_eq!(outcome.created_id(), Some("m-chapter-1"));
        assert!(!menu.is_open());
        match &service.novel().items[0] {
            NovelItem::Volume(volume) => assert_eq!(volume.chapters.len(), 2),
            NovelItem::Chapter(_) => unreachable!(),
        }

        assert!(menu
            .dispatch(&mut service, MenuAction::Rename("x".to_string()))
            .is_none());
    }

    #[test]
    fn set_status_on_volume_is_noop() {
        let mut service = service();
        let mut menu = ContextMenu::new();
        menu.open(target("a", ItemKind::Volume), 0.0, 0.0);
        let outcome = menu
            .dispatch(&mut service, MenuAction::SetStatus(ChapterStatus::Done))
            .unwrap();
        assert_eq!(
            outcome,
            CommandOutcome::Ignored(MutationError::NotAChapter("a".to_string()))
        );
        assert!(!entries_for(ItemKind::Volume).contains(&MenuEntry::SetStatus));
        assert!(entries_for(ItemKind::Chapter).contains(&MenuEntry::SetStatus));
    }
}
