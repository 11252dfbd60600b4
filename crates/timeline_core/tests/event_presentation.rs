use timeline_core::{
    DateError, EditorMode, EventDraft, EventMutator, EventPatch, EventPresentation, NoopCues,
    PresentationError, TimelineError, TimelineResult, TimelineState,
};

fn state_with(titles: &[&str]) -> TimelineState {
    let mut state = TimelineState::new();
    for title in titles {
        state.create_event(EventDraft::new(*title, "2024-01-01T00:00:00Z"));
    }
    state
}

fn row_at(state: &TimelineState, index: usize) -> EventPresentation {
    EventPresentation::new(index, state.events()[index].clone())
}

/// Records forwarded calls instead of mutating anything.
#[derive(Default)]
struct RecordingMutator {
    updates: Vec<(usize, EventPatch)>,
    deletes: Vec<String>,
}

impl EventMutator for RecordingMutator {
    fn update_event(&mut self, index: usize, patch: EventPatch) -> TimelineResult<()> {
        self.updates.push((index, patch));
        Ok(())
    }

    fn delete_event(&mut self, id: &str) -> bool {
        self.deletes.push(id.to_string());
        true
    }
}

#[test]
fn editor_request_reflects_current_values() {
    let mut state = state_with(&["A"]);
    state
        .update_event(
            0,
            EventPatch {
                description: Some("notes".to_string()),
                images: Some(vec!["img://1".to_string()]),
                ..EventPatch::default()
            },
        )
        .unwrap();
    let mut row = row_at(&state, 0);

    assert!(!row.editor_request().visible);
    row.open_editor();
    let request = row.editor_request();
    assert!(request.visible);
    assert_eq!(request.initial_title, "A");
    assert_eq!(request.initial_date, "2024-01-01T00:00:00.000Z");
    assert_eq!(request.initial_description, "notes");
    assert_eq!(request.initial_images, vec!["img://1".to_string()]);
}

#[test]
fn save_normalizes_date_and_forwards_by_index() {
    let mut state = state_with(&["A", "B"]);
    let id = state.events()[1].id.clone();
    let mut row = row_at(&state, 1);

    row.open_editor();
    row.on_save(
        &mut state,
        EventDraft::new("B2", "2024-02-03T10:00:00+01:00").with_description("d"),
    )
    .unwrap();

    assert_eq!(row.mode(), EditorMode::Idle);
    let saved = &state.events()[1];
    assert_eq!(saved.id, id);
    assert_eq!(saved.title, "B2");
    assert_eq!(saved.date, "2024-02-03T09:00:00.000Z");
    assert_eq!(saved.description, "d");
    assert_eq!(state.events()[0].title, "A");
    assert_eq!(row.event(), saved);
}

#[test]
fn save_with_unparsable_date_keeps_editor_open() {
    let mut state = state_with(&["A"]);
    let before = state.clone();
    let mut row = row_at(&state, 0);

    row.open_editor();
    let err = row
        .on_save(&mut state, EventDraft::new("A2", "someday"))
        .unwrap_err();

    assert_eq!(
        err,
        PresentationError::InvalidDate(DateError::Unparsable("someday".to_string()))
    );
    assert!(row.is_editing());
    assert_eq!(state, before);
}

#[test]
fn save_against_stale_index_reports_timeline_error() {
    let mut state = state_with(&["A", "B"]);
    let mut row = row_at(&state, 1);
    let first = state.events()[0].id.clone();
    state.delete_event(&first);

    row.open_editor();
    let err = row
        .on_save(&mut state, EventDraft::new("B2", "2024-01-01"))
        .unwrap_err();
    assert_eq!(
        err,
        PresentationError::Timeline(TimelineError::IndexOutOfRange { index: 1, len: 1 })
    );
    assert!(row.is_editing());
}

#[test]
fn close_discards_without_forwarding() {
    let mut mutator = RecordingMutator::default();
    let state = state_with(&["A"]);
    let mut row = row_at(&state, 0);

    row.open_editor();
    row.on_close();

    assert_eq!(row.mode(), EditorMode::Idle);
    assert!(mutator.updates.is_empty());
    assert!(mutator.deletes.is_empty());
    assert!(row
        .on_save(&mut mutator, EventDraft::new("late", "2024-01-01"))
        .is_err());
}

#[test]
fn delete_forwards_id_and_resets_both_flags() {
    let mut mutator = RecordingMutator::default();
    let state = state_with(&["A"]);
    let mut row = row_at(&state, 0);

    row.open_editor();
    row.on_long_press(&mut NoopCues);
    assert!(row.on_delete(&mut mutator));

    assert_eq!(mutator.deletes, vec![row.id().to_string()]);
    assert_eq!(row.mode(), EditorMode::Idle);
    assert!(!row.is_pending_delete());
}

#[test]
fn delete_from_affordance_removes_from_state() {
    let mut state = state_with(&["A", "B"]);
    let mut row = row_at(&state, 0);

    row.on_long_press(&mut NoopCues);
    assert!(row.is_pending_delete());
    assert!(row.on_delete(&mut state));
    assert_eq!(state.len(), 1);
    assert_eq!(state.events()[0].title, "B");

    assert!(!row.on_delete(&mut state));
    assert_eq!(state.len(), 1);
}

#[test]
fn save_forwards_full_payload_to_mutator() {
    let mut mutator = RecordingMutator::default();
    let state = state_with(&["A"]);
    let mut row = row_at(&state, 0);

    row.open_editor();
    row.on_save(
        &mut mutator,
        EventDraft::new("A2", "2024-01-01").with_images(vec!["x".to_string()]),
    )
    .unwrap();

    assert_eq!(mutator.updates.len(), 1);
    let (index, patch) = &mutator.updates[0];
    assert_eq!(*index, 0);
    assert_eq!(patch.title.as_deref(), Some("A2"));
    assert_eq!(patch.date.as_deref(), Some("2024-01-01T00:00:00.000Z"));
    assert_eq!(patch.description.as_deref(), Some(""));
    assert_eq!(patch.images, Some(vec!["x".to_string()]));
}

#[test]
fn display_date_is_short_form() {
    let state = state_with(&["A"]);
    assert_eq!(row_at(&state, 0).display_date(), "Jan 1, 2024");
}
