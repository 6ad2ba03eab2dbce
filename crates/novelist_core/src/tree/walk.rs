//! Depth-first outline walk for renderers.

use crate::model::item::{ChapterStatus, ItemId, ItemKind, NovelItem};
use crate::model::novel::Novel;
use crate::model::view::ViewState;

/// One rendered row of the outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutlineRow {
    /// A volume or chapter at `depth` 0 (root) or 1 (inside a volume).
    Item {
        id: ItemId,
        kind: ItemKind,
        title: String,
        depth: u8,
        status: Option<ChapterStatus>,
        collapsed: bool,
    },
    /// Drop region shown inside an expanded volume that has no chapters.
    ///
    /// This is the only place an `INSIDE` placement can come from.
    EmptyVolume { volume_id: ItemId },
}

/// Produces rows in document order, skipping chapters of collapsed volumes.
pub fn visible_rows(novel: &Novel, view: &ViewState) -> Vec<OutlineRow> {
    let mut rows = Vec::new();
    for item in &novel.items {
        match item {
            NovelItem::Chapter(chapter) => rows.push(OutlineRow::Item {
                id: chapter.id.clone(),
                kind: ItemKind::Chapter,
                title: chapter.title.clone(),
                depth: 0,
                status: Some(chapter.status),
                collapsed: false,
            }),
            NovelItem::Volume(volume) => {
                let collapsed = view.is_collapsed(&volume.id);
                rows.push(OutlineRow::Item {
                    id: volume.id.clone(),
                    kind: ItemKind::Volume,
                    title: volume.title.clone(),
                    depth: 0,
                    status: None,
                    collapsed,
                });
                if collapsed {
                    continue;
                }
                if volume.chapters.is_empty() {
                    rows.push(OutlineRow::EmptyVolume {
                        volume_id: volume.id.clone(),
                    });
                }
                rows.extend(volume.chapters.iter().map(|chapter| OutlineRow::Item {
                    id: chapter.id.clone(),
                    kind: ItemKind::Chapter,
                    title: chapter.title.clone(),
                    depth: 1,
                    status: Some(chapter.status),
                    collapsed: false,
                }));
            }
        }
    }
    rows
}

/// Counts live chapters, nested ones included.
pub fn chapter_count(novel: &Novel) -> usize {
    novel
        .items
        .iter()
        .map(|item| match item {
            NovelItem::Chapter(_) => 1,
            NovelItem::Volume(volume) => volume.chapters.len(),
        })
        .sum()
}

/// Counts live volumes.
pub fn volume_count(novel: &Novel) -> usize {
    novel
        .items
        .iter()
        .filter(|item| item.kind() == ItemKind::Volume)
        .count()
}

/// Renders an indented plain-text outline, one line per visible row.
pub fn render_plain(novel: &Novel, view: &ViewState) -> String {
    let mut out = String::new();
    for row in visible_rows(novel, view) {
        match row {
            OutlineRow::Item {
                id,
                kind,
                title,
                depth,
                status,
                collapsed,
            } => {
                let indent = "  ".repeat(usize::from(depth));
                let marker = match (kind, collapsed) {
                    (ItemKind::Volume, true) => "+",
                    (ItemKind::Volume, false) => "-",
                    (ItemKind::Chapter, _) => "*",
                };
                let suffix = status
                    .map(|status| format!(" [{}]", status.as_str()))
                    .unwrap_or_default();
                out.push_str(&format!("{indent}{marker} {title} ({id}){suffix}\n"));
            }
            OutlineRow::EmptyVolume { .. } => out.push_str("  (empty)\n"),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{chapter_count, render_plain, visible_rows, volume_count, OutlineRow};
    use crate::model::item::{Chapter, NovelItem, Volume};
    use crate::model::novel::Novel;
    use crate::model::view::ViewState;

    fn sample() -> Novel {
        Novel::new("n1", "Walk").with_items(vec![
            NovelItem::Volume(
                Volume::new("v1", "One")
                    .with_chapters(vec![Chapter::new("c1", "A"), Chapter::new("c2", "B")]),
            ),
            NovelItem::Volume(Volume::new("v2", "Two")),
            NovelItem::Chapter(Chapter::new("c3", "Epilogue")),
        ])
    }

    fn row_ids(rows: &[OutlineRow]) -> Vec<String> {
        rows.iter()
            .map(|row| match row {
                OutlineRow::Item { id, .. } => id.clone(),
                OutlineRow::EmptyVolume { volume_id } => format!("{volume_id}/empty"),
            })
            .collect()
    }

    #[test]
    fn rows_follow_document_order_with_empty_regions() {
        let rows = visible_rows(&sample(), &ViewState::new());
        assert_eq!(
            row_ids(&rows),
            vec!["v1", "c1", "c2", "v2", "v2/empty", "c3"]
        );
    }

    #[test]
    fn collapsed_volume_hides_its_chapters() {
        let mut view = ViewState::new();
        view.toggle("v1");
        view.toggle("v2");
        let rows = visible_rows(&sample(), &view);
        assert_eq!(row_ids(&rows), vec!["v1", "v2", "c3"]);
    }

    #[test]
    fn counts_cover_nested_chapters() {
        let novel = sample();
        assert_eq!(chapter_count(&novel), 3);
        assert_eq!(volume_count(&novel), 2);
    }

    #[test]
    fn plain_render_indents_nested_chapters() {
        let text = render_plain(&sample(), &ViewState::new());
        assert!(text.contains("  * A (c1) [draft]"));
        assert!(text.starts_with("- One (v1)"));
    }
}
