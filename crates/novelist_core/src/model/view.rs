//! Presentation state kept apart from the outline structure.
//!
//! Collapsing a volume is a rendering concern, so it lives in a map keyed by
//! volume id instead of on `Volume` itself.

use crate::model::item::ItemId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Per-novel view state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    #[serde(default)]
    collapsed: BTreeSet<ItemId>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_collapsed(&self, volume_id: &str) -> bool {
        self.collapsed.contains(volume_id)
    }

    /// Flips collapsed state and returns the new value.
    pub fn toggle(&mut self, volume_id: &str) -> bool {
        if self.collapsed.remove(volume_id) {
            false
        } else {
            self.collapsed.insert(volume_id.to_string());
            true
        }
    }

    pub fn set_collapsed(&mut self, volume_id: &str, collapsed: bool) {
        if collapsed {
            self.collapsed.insert(volume_id.to_string());
        } else {
            self.collapsed.remove(volume_id);
        }
    }

    /// Drops any state held for `id`.
    pub fn forget(&mut self, id: &str) {
        self.collapsed.remove(id);
    }

    pub fn collapsed_ids(&self) -> impl Iterator<Item = &str> {
        self.collapsed.iter().map(String::as_str)
    }
}
