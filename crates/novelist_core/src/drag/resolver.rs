//! Pointer geometry to placement resolution.
//!
//! Pure and stateless: re-evaluated on every pointer move while dragging.

use crate::model::item::ItemId;
use serde::{Deserialize, Serialize};

/// Fraction of a row's height that splits `Before` from `After`.
pub const DROP_THRESHOLD: f64 = 0.5;

/// Discrete drop placement relative to a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Placement {
    Before,
    After,
    /// Container-relative; only produced by an empty volume drop region.
    Inside,
}

impl Placement {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::After => "after",
            Self::Inside => "inside",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "before" => Some(Self::Before),
            "after" => Some(Self::After),
            "inside" => Some(Self::Inside),
            _ => None,
        }
    }
}

/// Resolved drop destination. `target_id = None` addresses the root sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTarget {
    pub target_id: Option<ItemId>,
    pub placement: Placement,
}

impl DropTarget {
    pub fn new(target_id: impl Into<ItemId>, placement: Placement) -> Self {
        Self {
            target_id: Some(target_id.into()),
            placement,
        }
    }

    /// Sentinel region below all items: append to the root sequence.
    pub fn root_end() -> Self {
        Self {
            target_id: None,
            placement: Placement::After,
        }
    }
}

/// What the pointer is currently over.
#[derive(Debug, Clone, PartialEq)]
pub enum HoverTarget {
    /// A rendered row, with the pointer's vertical offset inside its bounds.
    Item {
        id: ItemId,
        offset_y: f64,
        height: f64,
    },
    /// The empty chapter list region of a volume.
    EmptyVolume { volume_id: ItemId },
    /// The region below every item.
    RootEnd,
    /// The trash destination (tab or list).
    Trash,
}

/// Splits one row at [`DROP_THRESHOLD`].
///
/// The top half resolves to `Before`; the midpoint and the bottom half
/// resolve to `After`. Degenerate geometry (non-positive height, non-finite
/// values) falls to `After`. Hovering the dragged item itself yields `None`.
pub fn resolve_placement(
    dragged_id: &str,
    target_id: &str,
    offset_y: f64,
    height: f64,
) -> Option<Placement> {
    if dragged_id == target_id {
        return None;
    }
    if height <= 0.0 || !height.is_finite() || !offset_y.is_finite() {
        return Some(Placement::After);
    }
    if offset_y < height * DROP_THRESHOLD {
        Some(Placement::Before)
    } else {
        Some(Placement::After)
    }
}

/// Resolves a tree hover into a drop target.
///
/// Returns `None` for self-targets and for the trash destination, which is
/// not a tree position.
pub fn resolve_hover(dragged_id: &str, hover: &HoverTarget) -> Option<DropTarget> {
    match hover {
        HoverTarget::Item {
            id,
            offset_y,
            height,
        } => resolve_placement(dragged_id, id, *offset_y, *height)
            .map(|placement| DropTarget::new(id.clone(), placement)),
        HoverTarget::EmptyVolume { volume_id } => {
            if volume_id == dragged_id {
                None
            } else {
                Some(DropTarget::new(volume_id.clone(), Placement::Inside))
            }
        }
        HoverTarget::RootEnd => Some(DropTarget::root_end()),
        HoverTarget::Trash => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{resolve_hover, resolve_placement, DropTarget, HoverTarget, Placement};

    #[test]
    fn top_half_is_before_and_midpoint_is_after() {
        assert_eq!(
            resolve_placement("a", "b", 0.0, 40.0),
            Some(Placement::Before)
        );
        assert_eq!(
            resolve_placement("a", "b", 19.9, 40.0),
            Some(Placement::Before)
        );
        assert_eq!(
            resolve_placement("a", "b", 20.0, 40.0),
            Some(Placement::After)
        );
        assert_eq!(
            resolve_placement("a", "b", 39.0, 40.0),
            Some(Placement::After)
        );
    }

    #[test]
    fn self_hover_produces_no_placement() {
        assert_eq!(resolve_placement("a", "a", 1.0, 40.0), None);
        let hover = HoverTarget::EmptyVolume {
            volume_id: "a".to_string(),
        };
        assert_eq!(resolve_hover("a", &hover), None);
    }

    #[test]
    fn degenerate_geometry_falls_to_after() {
        assert_eq!(resolve_placement("a", "b", 0.0, 0.0), Some(Placement::After));
        assert_eq!(
            resolve_placement("a", "b", f64::NAN, 40.0),
            Some(Placement::After)
        );
    }

    #[test]
    fn special_regions_resolve_without_geometry() {
        let inside = resolve_hover(
            "c1",
            &HoverTarget::EmptyVolume {
                volume_id: "v2".to_string(),
            },
        );
        assert_eq!(inside, Some(DropTarget::new("v2", Placement::Inside)));
        assert_eq!(
            resolve_hover("c1", &HoverTarget::RootEnd),
            Some(DropTarget::root_end())
        );
        assert_eq!(resolve_hover("c1", &HoverTarget::Trash), None);
    }

    #[test]
    fn placement_labels_parse_back() {
        for placement in [Placement::Before, Placement::After, Placement::Inside] {
            assert_eq!(Placement::parse(placement.as_str()), Some(placement));
        }
        assert_eq!(Placement::parse("below"), None);
    }
}
