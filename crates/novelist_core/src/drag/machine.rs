//! Drag interaction state machine.
//!
//! # Responsibility
//! - Track the single in-progress drag across pointer events.
//! - Expose the current drop intent to renderers.
//! - Turn a release into a discrete command, or nothing.
//!
//! # Invariants
//! - At most one drag is active; a stray start restarts from `Idle`.
//! - The machine never touches the outline; commands are executed by the
//!   caller (see `OutlineService::execute`).

use crate::drag::resolver::{resolve_hover, DropTarget, HoverTarget, Placement};
use crate::model::item::{ItemId, ItemKind};
use log::debug;

/// List the dragged item was picked up from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragSource {
    Tree,
    Trash,
}

impl DragSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tree => "tree",
            Self::Trash => "trash",
        }
    }
}

/// Item being dragged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSubject {
    pub id: ItemId,
    pub kind: ItemKind,
    pub source: DragSource,
}

impl DragSubject {
    pub fn new(id: impl Into<ItemId>, kind: ItemKind, source: DragSource) -> Self {
        Self {
            id: id.into(),
            kind,
            source,
        }
    }
}

/// Drag machine state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// Picked up, no valid target under the pointer.
    Dragging(DragSubject),
    /// Over a tree position with a resolved placement.
    Hovering {
        subject: DragSubject,
        target: DropTarget,
    },
    /// Over the trash destination.
    OverTrash(DragSubject),
}

/// Command produced by a successful drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragCommand {
    /// Reorder/reparent a live item.
    Move {
        dragged_id: ItemId,
        target: DropTarget,
    },
    /// Restore a trashed item to a live position.
    RestoreTo { id: ItemId, target: DropTarget },
    /// Soft-delete a live item.
    Delete { id: ItemId, kind: ItemKind },
}

/// Result of releasing the pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    Dropped(DragCommand),
    Cancelled,
}

/// Indicator shown by renderers while hovering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropIndicator<'a> {
    pub target_id: Option<&'a str>,
    pub placement: Placement,
}

/// Single-drag state machine.
#[derive(Debug, Default)]
pub struct DragMachine {
    state: DragState,
}

impl DragMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        !matches!(self.state, DragState::Idle)
    }

    pub fn subject(&self) -> Option<&DragSubject> {
        match &self.state {
            DragState::Idle => None,
            DragState::Dragging(subject) | DragState::OverTrash(subject) => Some(subject),
            DragState::Hovering { subject, .. } => Some(subject),
        }
    }

    /// Current drop intent, if the pointer is over a tree position.
    pub fn indicator(&self) -> Option<DropIndicator<'_>> {
        match &self.state {
            DragState::Hovering { target, .. } => Some(DropIndicator {
                target_id: target.target_id.as_deref(),
                placement: target.placement,
            }),
            _ => None,
        }
    }

    /// Starts a drag. An active drag is discarded first.
    pub fn start(&mut self, subject: DragSubject) {
        if let Some(previous) = self.subject() {
            debug!(
                "event=drag_restart module=drag status=noop previous_id={} next_id={}",
                previous.id, subject.id
            );
        }
        debug!(
            "event=drag_start module=drag status=ok id={} kind={} source={}",
            subject.id,
            subject.kind.as_str(),
            subject.source.as_str()
        );
        self.state = DragState::Dragging(subject);
    }

    /// Re-resolves the intent for a pointer move. No-op while idle.
    pub fn hover(&mut self, hover: &HoverTarget) {
        let state = std::mem::take(&mut self.state);
        self.state = match state {
            DragState::Idle => DragState::Idle,
            DragState::Dragging(subject)
            | DragState::OverTrash(subject)
            | DragState::Hovering { subject, .. } => Self::next_hover_state(subject, hover),
        };
    }

    /// Pointer left every candidate target.
    pub fn leave(&mut self) {
        let state = std::mem::take(&mut self.state);
        self.state = match state {
            DragState::Idle => DragState::Idle,
            DragState::Dragging(subject)
            | DragState::OverTrash(subject)
            | DragState::Hovering { subject, .. } => DragState::Dragging(subject),
        };
    }

    /// Ends the drag, returning the command to execute, and resets to `Idle`.
    pub fn release(&mut self) -> DropOutcome {
        let outcome = match std::mem::take(&mut self.state) {
            DragState::Idle | DragState::Dragging(_) => DropOutcome::Cancelled,
            DragState::Hovering { subject, target } => match subject.source {
                DragSource::Tree => DropOutcome::Dropped(DragCommand::Move {
                    dragged_id: subject.id,
                    target,
                }),
                DragSource::Trash => DropOutcome::Dropped(DragCommand::RestoreTo {
                    id: subject.id,
                    target,
                }),
            },
            DragState::OverTrash(subject) => match subject.source {
                DragSource::Tree => DropOutcome::Dropped(DragCommand::Delete {
                    id: subject.id,
                    kind: subject.kind,
                }),
                DragSource::Trash => DropOutcome::Cancelled,
            },
        };
        match &outcome {
            DropOutcome::Dropped(command) => {
                debug!("event=drag_drop module=drag status=ok command={command:?}")
            }
            DropOutcome::Cancelled => debug!("event=drag_drop module=drag status=cancelled"),
        }
        outcome
    }

    /// Abandons the drag without a command.
    pub fn cancel(&mut self) {
        if self.is_dragging() {
            debug!("event=drag_cancel module=drag status=cancelled");
        }
        self.state = DragState::Idle;
    }

    fn next_hover_state(subject: DragSubject, hover: &HoverTarget) -> DragState {
        if matches!(hover, HoverTarget::Trash) {
            return DragState::OverTrash(subject);
        }
        match resolve_hover(&subject.id, hover) {
            Some(target) => DragState::Hovering { subject, target },
            None => DragState::Dragging(subject),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DragCommand, DragMachine, DragSource, DragState, DragSubject, DropOutcome};
    use crate::drag::resolver::{DropTarget, HoverTarget, Placement};
    use crate::model::item::ItemKind;

    fn item(id: &str, offset_y: f64) -> HoverTarget {
        HoverTarget::Item {
            id: id.to_string(),
            offset_y,
            height: 40.0,
        }
    }

    #[test]
    fn tree_drag_drop_yields_move_command() {
        let mut machine = DragMachine::new();
        machine.start(DragSubject::new("c1", ItemKind::Chapter, DragSource::Tree));
        machine.hover(&item("c3", 5.0));
        machine.hover(&item("c3", 30.0));

        let indicator = machine.indicator().expect("hover indicator");
        assert_eq!(indicator.target_id, Some("c3"));
        assert_eq!(indicator.placement, Placement::After);

        assert_eq!(
            machine.release(),
            DropOutcome::Dropped(DragCommand::Move {
                dragged_id: "c1".to_string(),
                target: DropTarget::new("c3", Placement::After),
            })
        );
        assert_eq!(machine.state(), &DragState::Idle);
    }

    #[test]
    fn self_hover_clears_target_and_release_cancels() {
        let mut machine = DragMachine::new();
        machine.start(DragSubject::new("c1", ItemKind::Chapter, DragSource::Tree));
        machine.hover(&item("c2", 5.0));
        machine.hover(&item("c1", 5.0));

        assert!(machine.indicator().is_none());
        assert_eq!(machine.release(), DropOutcome::Cancelled);
        assert!(!machine.is_dragging());
    }

    #[test]
    fn trash_source_drop_yields_restore_command() {
        let mut machine = DragMachine::new();
        machine.start(DragSubject::new("v9", ItemKind::Volume, DragSource::Trash));
        machine.hover(&HoverTarget::RootEnd);

        assert_eq!(
            machine.release(),
            DropOutcome::Dropped(DragCommand::RestoreTo {
                id: "v9".to_string(),
                target: DropTarget::root_end(),
            })
        );
    }

    #[test]
    fn trash_destination_deletes_tree_items_only() {
        let mut machine = DragMachine::new();
        machine.start(DragSubject::new("v1", ItemKind::Volume, DragSource::Tree));
        machine.hover(&item("c2", 5.0));
        machine.hover(&HoverTarget::Trash);
        assert_eq!(
            machine.release(),
            DropOutcome::Dropped(DragCommand::Delete {
                id: "v1".to_string(),
                kind: ItemKind::Volume,
            })
        );

        machine.start(DragSubject::new("c9", ItemKind::Chapter, DragSource::Trash));
        machine.hover(&HoverTarget::Trash);
        assert_eq!(machine.release(), DropOutcome::Cancelled);
    }

    #[test]
    fn stray_start_restarts_machine() {
        let mut machine = DragMachine::new();
        machine.start(DragSubject::new("c1", ItemKind::Chapter, DragSource::Tree));
        machine.hover(&item("c2", 5.0));
        machine.start(DragSubject::new("c2", ItemKind::Chapter, DragSource::Tree));

        assert_eq!(
            machine.state(),
            &DragState::Dragging(DragSubject::new("c2", ItemKind::Chapter, DragSource::Tree))
        );
    }

    #[test]
    fn leave_and_cancel_never_produce_commands() {
        let mut machine = DragMachine::new();
        machine.hover(&item("c2", 5.0));
        assert_eq!(machine.state(), &DragState::Idle);

        machine.start(DragSubject::new("c1", ItemKind::Chapter, DragSource::Tree));
        machine.hover(&item("c2", 5.0));
        machine.leave();
        assert_eq!(machine.release(), DropOutcome::Cancelled);

        machine.start(DragSubject::new("c1", ItemKind::Chapter, DragSource::Tree));
        machine.hover(&item("c2", 5.0));
        machine.cancel();
        assert_eq!(machine.release(), DropOutcome::Cancelled);
    }
}
