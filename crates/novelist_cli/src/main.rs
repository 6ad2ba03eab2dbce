//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `novelist_core` linkage.
//! - Replay a fixed outline session so output stays deterministic.

use novelist_core::tree::walk::render_plain;
use novelist_core::{
    CommandOutcome, FixedClock, ItemKind, Novel, OutlineService, Placement, SequentialIdSource,
    ViewState,
};

fn main() {
    println!("novelist_core ping={}", novelist_core::ping());
    println!("novelist_core version={}", novelist_core::core_version());

    let service = match OutlineService::try_new(Novel::new("probe", "Probe"), ViewState::new()) {
        Ok(service) => service,
        Err(err) => {
            eprintln!("probe outline rejected: {err}");
            std::process::exit(1);
        }
    };
    let mut service = service
        .with_id_source(SequentialIdSource::new("probe"))
        .with_clock(FixedClock(0));

    let first_volume = created(service.create_volume());
    let second_volume = created(service.create_volume());
    let opening = created(service.create_chapter(first_volume.as_deref()));
    let middle = created(service.create_chapter(first_volume.as_deref()));
    let closing = created(service.create_chapter(second_volume.as_deref()));

    let steps = [
        (
            "move",
            service.move_item(
                opening.as_deref().unwrap_or_default(),
                closing.as_deref(),
                Placement::After,
            ),
        ),
        (
            "move",
            service.move_item(
                middle.as_deref().unwrap_or_default(),
                middle.as_deref(),
                Placement::Before,
            ),
        ),
        (
            "delete",
            service.delete_item(closing.as_deref().unwrap_or_default(), ItemKind::Chapter),
        ),
        (
            "restore",
            service.restore_item(closing.as_deref().unwrap_or_default()),
        ),
    ];
    for (label, outcome) in &steps {
        match outcome {
            CommandOutcome::Applied(_) => println!("{label}: applied"),
            CommandOutcome::Ignored(reason) => println!("{label}: ignored ({})", reason.code()),
        }
    }

    print!("{}", render_plain(service.novel(), service.view()));
}

fn created(outcome: CommandOutcome) -> Option<String> {
    outcome.created_id().map(str::to_string)
}
