//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `timeline_core` linkage.
//! - Run one scripted edit session and print the handed-off timeline.

use timeline_core::{
    init_logging_with, EditSession, Event, EventDraft, EventPatch, LogConfig, TimelineSeed,
};

fn main() {
    println!("timeline_core ping={}", timeline_core::ping());
    println!("timeline_core version={}", timeline_core::core_version());

    match LogConfig::from_env() {
        Ok(Some(config)) => {
            if let Err(err) = init_logging_with(&config) {
                eprintln!("logging disabled: {err}");
            }
        }
        Ok(None) => {}
        Err(err) => eprintln!("logging disabled: {err}"),
    }

    // Legacy seed: events without ids, as older saved timelines carry them.
    let seed = TimelineSeed {
        id: None,
        title: Some("Smoke".to_string()),
        events: Some(vec![
            Event::from_draft("", EventDraft::new("Kickoff", "2024-01-01")),
            Event::from_draft("", EventDraft::new("Review", "2024-02-01")),
        ]),
    };
    let mut session = EditSession::open(seed);

    session.open_create_editor();
    let launch = session.save_new_event(EventDraft::new("Launch", "2024-03-01T09:00:00Z"));
    if let Err(err) = session.update_event(0, EventPatch::title("Kickoff meeting")) {
        eprintln!("update failed: {err}");
    }
    if let Some(review) = session.row(1).map(|row| row.id().to_string()) {
        session.delete_event(&review);
    }
    println!("timeline_core created={launch} rows={}", session.rows().len());

    match session.save() {
        Ok(saved) => match saved.to_json() {
            Ok(json) => println!("timeline_core saved={json}"),
            Err(err) => eprintln!("encode failed: {err}"),
        },
        Err(rejected) => eprintln!("{rejected}"),
    }
}
