use std::collections::HashSet;
use timeline_core::{assign_if_missing, assign_missing_ids, new_id, Event, EventDraft};
use uuid::Uuid;

fn event(id: &str) -> Event {
    Event::from_draft(id, EventDraft::new("title", "2024-01-01T00:00:00Z"))
}

#[test]
fn assign_if_missing_is_idempotent() {
    let once = assign_if_missing(event(""));
    let twice = assign_if_missing(once.clone());
    assert!(once.has_id());
    assert_eq!(once.id, twice.id);
    assert_eq!(once, twice);
}

#[test]
fn assign_if_missing_only_touches_id() {
    let mut legacy = event("");
    legacy.description = "kept".to_string();
    legacy.images = vec!["a".to_string(), "b".to_string()];

    let assigned = assign_if_missing(legacy.clone());
    assert_eq!(assigned.title, legacy.title);
    assert_eq!(assigned.date, legacy.date);
    assert_eq!(assigned.description, "kept");
    assert_eq!(assigned.images, legacy.images);
}

#[test]
fn generated_ids_are_v4_uuids() {
    let id = new_id();
    let parsed = Uuid::parse_str(&id).unwrap();
    assert_eq!(parsed.get_version_num(), 4);
}

#[test]
fn generated_ids_do_not_collide() {
    let ids = (0..10_000).map(|_| new_id()).collect::<HashSet<_>>();
    assert_eq!(ids.len(), 10_000);
}

#[test]
fn batch_assignment_keeps_existing_and_fills_missing() {
    let events = assign_missing_ids(vec![event("keep"), event(""), event(" ")]);
    assert_eq!(events.len(), 3);
    assert_eq!(events[0].id, "keep");
    assert!(events[1].has_id());
    assert!(events[2].has_id());
    assert_ne!(events[1].id, events[2].id);
}
