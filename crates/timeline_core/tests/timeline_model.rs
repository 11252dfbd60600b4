use timeline_core::{
    EditSession, Event, EventDraft, SavedTimeline, TimelineSeed, TimelineState,
};

#[test]
fn seed_json_accepts_legacy_events_without_ids() {
    let seed = TimelineSeed::from_json(
        r#"{
            "id": "t-1",
            "title": "Legacy",
            "events": [
                {"title": "one", "date": "2023-05-01T00:00:00.000Z"},
                {"title": "two", "date": "2023-06-01T00:00:00.000Z", "description": "x", "images": ["a"]}
            ]
        }"#,
    )
    .unwrap();

    let events = seed.events.clone().unwrap();
    assert!(events.iter().all(|event| !event.has_id()));
    assert_eq!(events[1].images, vec!["a".to_string()]);

    let state = TimelineState::initialize(seed);
    assert_eq!(state.id(), "t-1");
    assert_ne!(state.events()[0].id, state.events()[1].id);
    assert!(state.events().iter().all(Event::has_id));
}

#[test]
fn empty_seed_json_starts_fresh() {
    let seed = TimelineSeed::from_json("{}").unwrap();
    assert_eq!(seed, TimelineSeed::default());

    let state = TimelineState::initialize(seed);
    assert!(state.title().is_empty());
    assert!(state.is_empty());
}

#[test]
fn saved_timeline_uses_expected_wire_fields() {
    let mut state = TimelineState::initialize(TimelineSeed {
        id: Some("t-9".to_string()),
        ..TimelineSeed::default()
    });
    let event_id = state.create_event(
        EventDraft::new("Launch", "2024-01-01T00:00:00.000Z")
            .with_description("go")
            .with_images(vec!["file://cover.png".to_string()]),
    );
    let saved = state.commit("Product").unwrap();

    let json = serde_json::to_value(&saved).unwrap();
    assert_eq!(json["id"], "t-9");
    assert_eq!(json["title"], "Product");
    assert_eq!(json["events"][0]["id"], event_id.as_str());
    assert_eq!(json["events"][0]["title"], "Launch");
    assert_eq!(json["events"][0]["date"], "2024-01-01T00:00:00.000Z");
    assert_eq!(json["events"][0]["description"], "go");
    assert_eq!(json["events"][0]["images"][0], "file://cover.png");

    let decoded: SavedTimeline = serde_json::from_str(&saved.to_json().unwrap()).unwrap();
    assert_eq!(decoded, saved);
}

#[test]
fn reopening_a_saved_timeline_reuses_its_id() {
    let mut first = EditSession::open(TimelineSeed::default());
    first.set_title("Draft");
    first.create_event(EventDraft::new("a", "2024-01-01"));
    let saved = first.save().unwrap();

    let mut second = EditSession::open(TimelineSeed::from_saved(saved.clone()));
    second.create_event(EventDraft::new("b", "2024-01-02"));
    let resaved = second.save().unwrap();

    assert_eq!(resaved.id, saved.id);
    assert_eq!(resaved.events[0], saved.events[0]);
    assert_eq!(resaved.events.len(), 2);
}
