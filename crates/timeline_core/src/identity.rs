//! Event identity assignment.
//!
//! # Responsibility
//! - Generate collision-free event ids.
//! - Fill in ids for events that arrive without one (legacy seeds).
//!
//! # Invariants
//! - An event that already carries a non-blank id keeps it unchanged.
//! - Generated ids are random v4 UUIDs; no counters, no clock ordering.

use crate::model::event::{Event, EventId};
use log::{debug, warn};
use std::collections::HashSet;
use uuid::Uuid;

/// Generates a fresh random identifier.
pub fn new_id() -> EventId {
    Uuid::new_v4().to_string()
}

/// Returns `event` unchanged when it has an id, or a copy with a new one.
///
/// Idempotent: a second application never changes the id again.
pub fn assign_if_missing(event: Event) -> Event {
    if event.has_id() {
        return event;
    }
    Event {
        id: new_id(),
        ..event
    }
}

/// Load-time batch form of [`assign_if_missing`].
///
/// Also reassigns the later copy of any duplicated id, so the returned
/// sequence always satisfies per-timeline uniqueness.
pub fn assign_missing_ids(events: Vec<Event>) -> Vec<Event> {
    let mut seen: HashSet<EventId> = HashSet::with_capacity(events.len());
    let mut assigned = 0usize;
    let mut reassigned = 0usize;

    let events = events
        .into_iter()
        .map(|event| {
            let had_id = event.has_id();
            let mut event = assign_if_missing(event);
            if !had_id {
                assigned += 1;
            }
            while !seen.insert(event.id.clone()) {
                reassigned += 1;
                event.id = new_id();
            }
            event
        })
        .collect::<Vec<_>>();

    if reassigned > 0 {
        warn!(
            "event=seed_duplicate_ids module=identity status=fixed reassigned={} total={}",
            reassigned,
            events.len()
        );
    }
    if assigned > 0 {
        debug!(
            "event=seed_ids_assigned module=identity status=ok assigned={} total={}",
            assigned,
            events.len()
        );
    }

    events
}

#[cfg(test)]
mod tests {
    use super::{assign_if_missing, assign_missing_ids, new_id};
    use crate::model::event::{Event, EventDraft};

    fn legacy(title: &str) -> Event {
        Event::from_draft("", EventDraft::new(title, "2024-01-01T00:00:00Z"))
    }

    #[test]
    fn new_id_is_non_empty_and_distinct() {
        let first = new_id();
        let second = new_id();
        assert!(!first.is_empty());
        assert_ne!(first, second);
    }

    #[test]
    fn existing_id_is_kept() {
        let event = Event::from_draft("keep-me", EventDraft::new("A", "2024-01-01"));
        assert_eq!(assign_if_missing(event).id, "keep-me");
    }

    #[test]
    fn duplicate_seed_ids_are_split() {
        let mut first = legacy("A");
        first.id = "dup".to_string();
        let mut second = legacy("B");
        second.id = "dup".to_string();

        let events = assign_missing_ids(vec![first, second]);
        assert_eq!(events[0].id, "dup");
        assert_ne!(events[1].id, "dup");
        assert!(events[1].has_id());
    }
}
