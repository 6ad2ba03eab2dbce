use novelist_core::tree::validate;
use novelist_core::{
    Chapter, ChapterStatus, CommandOutcome, DragMachine, DragSource, DragSubject, DropOutcome,
    FixedClock, HoverTarget, ItemKind, MutationError, Novel, NovelItem, OutlineService,
    Placement, SequentialIdSource, TrashedEntity, ViewState, Volume,
};
use serde_json::json;
use std::collections::BTreeSet;

fn setup() -> OutlineService {
    let mut opening = Chapter::new("c1", "Opening");
    opening.status = ChapterStatus::Review;
    opening.payload = json!({
        "content": "The harbor was quiet.",
        "outline": ["arrival", "storm"],
        "history": [{ "at": 1, "words": 120 }]
    });
    let novel = Novel::new("n1", "Harbor").with_items(vec![
        NovelItem::Volume(
            Volume::new("a", "Volume A").with_chapters(vec![opening, Chapter::new("c2", "Two")]),
        ),
        NovelItem::Volume(Volume::new("b", "Volume B").with_chapters(vec![Chapter::new("c3", "Three")])),
        NovelItem::Chapter(Chapter::new("c4", "Interlude")),
    ]);
    OutlineService::try_new(novel, ViewState::new())
        .unwrap()
        .with_id_source(SequentialIdSource::new("gen"))
        .with_clock(FixedClock(1_700_000_000_000))
}

fn root_ids(service: &OutlineService) -> Vec<String> {
    service
        .novel()
        .items
        .iter()
        .map(|item| item.id().to_string())
        .collect()
}

fn chapter_ids(service: &OutlineService, volume_id: &str) -> Vec<String> {
    service
        .novel()
        .items
        .iter()
        .find_map(|item| match item {
            NovelItem::Volume(volume) if volume.id == volume_id => Some(
                volume
                    .chapters
                    .iter()
                    .map(|chapter| chapter.id.clone())
                    .collect(),
            ),
            _ => None,
        })
        .unwrap()
}

#[test]
fn reparenting_moves_chapter_into_targets_volume() {
    let mut service = setup();

    let outcome = service.move_item("c1", Some("c3"), Placement::After);

    assert!(outcome.is_applied());
    assert_eq!(chapter_ids(&service, "a"), vec!["c2"]);
    assert_eq!(chapter_ids(&service, "b"), vec!["c3", "c1"]);
}

#[test]
fn moving_before_sibling_keeps_other_siblings_in_order() {
    let mut service = setup();
    service.create_chapter(Some("a"));
    service.create_chapter(Some("a"));
    assert_eq!(
        chapter_ids(&service, "a"),
        vec!["c1", "c2", "gen-chapter-1", "gen-chapter-2"]
    );

    service.move_item("gen-chapter-2", Some("c2"), Placement::Before);

    assert_eq!(
        chapter_ids(&service, "a"),
        vec!["c1", "gen-chapter-2", "c2", "gen-chapter-1"]
    );
}

#[test]
fn self_drop_leaves_outline_unchanged() {
    let mut service = setup();
    let before = serde_json::to_string(service.novel()).unwrap();

    let outcome = service.move_item("c2", Some("c2"), Placement::After);

    assert_eq!(
        outcome,
        CommandOutcome::Ignored(MutationError::SelfDrop("c2".to_string()))
    );
    assert_eq!(serde_json::to_string(service.novel()).unwrap(), before);
}

#[test]
fn blank_rename_is_ignored() {
    let mut service = setup();

    let outcome = service.rename_item("c4", "   ");

    assert!(!outcome.is_applied());
    match &service.novel().items[2] {
        NovelItem::Chapter(chapter) => assert_eq!(chapter.title, "Interlude"),
        NovelItem::Volume(_) => panic!("expected chapter"),
    }
}

#[test]
fn deleting_volume_trashes_one_entry_with_nested_chapters() {
    let mut service = setup();

    service.delete_item("a", ItemKind::Volume);

    let trash = &service.novel().trash;
    assert_eq!(trash.len(), 1);
    assert_eq!(trash[0].deleted_at, 1_700_000_000_000);
    match &trash[0].entity {
        TrashedEntity::Volume(volume) => {
            let ids = volume.chapters.iter().map(|c| c.id.as_str()).collect::<Vec<_>>();
            assert_eq!(ids, vec!["c1", "c2"]);
        }
        other => panic!("unexpected trash entity: {other:?}"),
    }
    assert!(trash.iter().all(|entry| entry.id() != "c1" && entry.id() != "c2"));
}

#[test]
fn delete_then_restore_round_trips_payload() {
    let mut service = setup();
    let before_delete = match &service.novel().items[0] {
        NovelItem::Volume(volume) => volume.chapters[0].clone(),
        NovelItem::Chapter(_) => panic!("expected volume"),
    };

    service.delete_item("c1", ItemKind::Chapter);
    service.restore_item("c1");

    match service.novel().items.last() {
        Some(NovelItem::Chapter(restored)) => assert_eq!(restored, &before_delete),
        other => panic!("unexpected last item: {other:?}"),
    }
    assert!(service.novel().trash.is_empty());
}

#[test]
fn volume_delete_then_restore_keeps_chapters_and_payloads() {
    let mut service = setup();
    let before_delete = match &service.novel().items[0] {
        NovelItem::Volume(volume) => volume.clone(),
        NovelItem::Chapter(_) => panic!("expected volume"),
    };
    assert_eq!(before_delete.chapters[0].status, ChapterStatus::Review);
    assert!(!before_delete.chapters[0].payload.is_null());

    assert!(service.delete_item("a", ItemKind::Volume).is_applied());
    assert!(!service.restore_item("c1").is_applied());
    assert!(service.restore_item("a").is_applied());

    assert_eq!(
        service.novel().items.last(),
        Some(&NovelItem::Volume(before_delete))
    );
    assert_eq!(chapter_ids(&service, "a"), vec!["c1", "c2"]);
    assert_eq!(root_ids(&service), vec!["b", "c4", "a"]);
    assert!(service.novel().trash.is_empty());
}

#[test]
fn root_append_moves_from_any_container() {
    let mut service = setup();

    service.move_item("c3", None, Placement::After);
    assert_eq!(root_ids(&service), vec!["a", "b", "c4", "c3"]);
    assert!(chapter_ids(&service, "b").is_empty());

    service.move_item("b", None, Placement::After);
    assert_eq!(root_ids(&service), vec!["a", "c4", "c3", "b"]);

    service.move_item("c4", None, Placement::Before);
    assert_eq!(root_ids(&service), vec!["c4", "a", "c3", "b"]);
}

#[test]
fn empty_volume_region_accepts_inside_drop() {
    let mut service = setup();
    service.move_item("c3", None, Placement::After);

    let mut machine = DragMachine::new();
    machine.start(DragSubject::new("c4", ItemKind::Chapter, DragSource::Tree));
    machine.hover(&HoverTarget::EmptyVolume {
        volume_id: "b".to_string(),
    });
    let DropOutcome::Dropped(command) = machine.release() else {
        panic!("inside drop should resolve");
    };
    assert!(service.execute(&command).is_applied());

    assert_eq!(chapter_ids(&service, "b"), vec!["c4"]);
}

#[test]
fn trash_drag_restores_between_live_siblings() {
    let mut service = setup();
    service.delete_item("c4", ItemKind::Chapter);
    service.delete_item("c2", ItemKind::Chapter);

    let mut machine = DragMachine::new();
    machine.start(DragSubject::new("c4", ItemKind::Chapter, DragSource::Trash));
    machine.hover(&HoverTarget::Item {
        id: "c1".to_string(),
        offset_y: 30.0,
        height: 32.0,
    });
    let DropOutcome::Dropped(command) = machine.release() else {
        panic!("restore drop should resolve");
    };
    assert!(service.execute(&command).is_applied());

    assert_eq!(chapter_ids(&service, "a"), vec!["c1", "c4"]);
    assert_eq!(service.trash_entries().len(), 1);

    let outcome = service.restore_item_to_location("c2", Some("c2"), Placement::After);
    assert!(!outcome.is_applied());
}

#[test]
fn random_operation_sequence_preserves_invariants() {
    let mut service = setup();
    let mut seed: u64 = 0x5eed;
    let mut next = move || {
        seed = seed
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (seed >> 33) as usize
    };
    let placements = [Placement::Before, Placement::After, Placement::Inside];
    let titles = ["Landfall", "  ", "Second Watch", ""];
    let pick = |ids: &[String], n: usize| ids.get(n % ids.len().max(1)).cloned();

    for _ in 0..600 {
        let before = held_ids(&service);
        let live = live_ids(&service);
        let trashed = service
            .novel()
            .trash
            .iter()
            .map(|entry| entry.id().to_string())
            .collect::<Vec<_>>();
        let placement = placements[next() % placements.len()];

        let op = next() % 12;
        let outcome = match op {
            0 | 1 | 2 => match (pick(&live, next()), pick(&live, next())) {
                (Some(dragged), Some(target)) => {
                    Some(service.move_item(&dragged, Some(&target), placement))
                }
                _ => None,
            },
            3 => pick(&live, next()).map(|dragged| service.move_item(&dragged, None, placement)),
            4 => match (pick(&live, next()), pick(&trashed, next())) {
                (Some(dragged), Some(target)) => {
                    let outcome = service.move_item(&dragged, Some(&target), placement);
                    assert!(!outcome.is_applied(), "trashed target accepted a move");
                    Some(outcome)
                }
                _ => None,
            },
            5 => pick(&live, next()).map(|id| {
                let kind = if service
                    .novel()
                    .items
                    .iter()
                    .any(|item| item.id() == id && item.kind() == ItemKind::Volume)
                {
                    ItemKind::Volume
                } else {
                    ItemKind::Chapter
                };
                service.delete_item(&id, kind)
            }),
            6 => pick(&trashed, next()).map(|id| {
                let target = match next() % 3 {
                    0 => None,
                    1 => pick(&trashed, next()),
                    _ => pick(&live, next()),
                };
                service.restore_item_to_location(&id, target.as_deref(), placement)
            }),
            7 => pick(&trashed, next()).map(|id| service.restore_item(&id)),
            8 => {
                if next() % 2 == 0 {
                    Some(service.create_volume())
                } else {
                    let parent = pick(&live, next());
                    Some(service.create_chapter(parent.as_deref()))
                }
            }
            9 => pick(&trashed, next()).map(|id| service.permanent_delete_item(&id)),
            10 => pick(&live, next()).map(|id| {
                let title = titles[next() % titles.len()];
                let outcome = service.rename_item(&id, title);
                assert_eq!(outcome.is_applied(), !title.trim().is_empty());
                outcome
            }),
            _ => pick(&live, next()).map(|id| service.select_chapter(Some(&id))),
        };

        validate(service.novel()).expect("outline invariants must hold");

        let mut expected = before;
        if let Some(CommandOutcome::Applied(effect)) = &outcome {
            if let Some(created) = &effect.created_id {
                assert!(expected.insert(created.clone()), "created id {created} reused");
            }
            if op == 9 {
                assert!(!effect.removed_ids.is_empty());
                for removed in &effect.removed_ids {
                    assert!(expected.remove(removed), "purged id {removed} was not held");
                }
            }
        }
        assert_eq!(held_ids(&service), expected);
    }
}

/// Every id in the live outline or in trash, nested chapters included.
fn held_ids(service: &OutlineService) -> BTreeSet<String> {
    let novel = service.novel();
    novel
        .items
        .iter()
        .flat_map(NovelItem::ids)
        .chain(novel.trash.iter().flat_map(|entry| entry.ids()))
        .collect()
}

fn live_ids(service: &OutlineService) -> Vec<String> {
    service
        .novel()
        .items
        .iter()
        .flat_map(NovelItem::ids)
        .collect()
}
