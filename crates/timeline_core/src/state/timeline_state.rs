//! In-memory timeline edit state.
//!
//! # Responsibility
//! - Own the ordered event sequence and the timeline title during an edit.
//! - Apply create/update/delete mutations in the order they are issued.
//! - Validate and hand off the finished timeline exactly once.
//!
//! # Invariants
//! - Every event id in the sequence is non-blank and unique.
//! - `update_event` addresses by position and preserves the stored id.
//! - `delete_event` addresses by id; an absent id is a silent no-op.
//! - `commit` consumes the state on success; a rejected commit returns the
//!   state unchanged.

use crate::identity::{assign_missing_ids, new_id};
use crate::model::event::{Event, EventDraft, EventId, EventPatch};
use crate::model::timeline::{SavedTimeline, TimelineId, TimelineSeed};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TimelineResult<T> = Result<T, TimelineError>;

/// Commit-time validation failure. Recoverable; the user is asked to fix it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Timeline title is empty or whitespace-only.
    EmptyTitle,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "Please enter a timeline title."),
        }
    }
}

impl Error for ValidationError {}

/// Error for timeline state operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimelineError {
    Validation(ValidationError),
    /// A positional reference outlived the sequence it was derived from.
    IndexOutOfRange { index: usize, len: usize },
}

impl Display for TimelineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "event index {index} out of range for {len} event(s)")
            }
        }
    }
}

impl Error for TimelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::IndexOutOfRange { .. } => None,
        }
    }
}

impl From<ValidationError> for TimelineError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Refused commit. Carries the untouched state back to the caller.
#[derive(Debug)]
pub struct CommitRejected {
    state: TimelineState,
    error: TimelineError,
}

impl CommitRejected {
    pub fn error(&self) -> &TimelineError {
        &self.error
    }

    /// Recovers the state so the edit session can continue.
    pub fn into_state(self) -> TimelineState {
        self.state
    }

    pub fn into_parts(self) -> (TimelineState, TimelineError) {
        (self.state, self.error)
    }
}

impl Display for CommitRejected {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "commit rejected: {}", self.error)
    }
}

impl Error for CommitRejected {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.error)
    }
}

/// Mutation seam used by per-row presentation mediators.
///
/// Rows never see the whole sequence; they only update their own position
/// or remove their own id.
pub trait EventMutator {
    fn update_event(&mut self, index: usize, patch: EventPatch) -> TimelineResult<()>;
    fn delete_event(&mut self, id: &str) -> bool;
}

/// Titled, ordered event collection being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineState {
    id: TimelineId,
    title: String,
    events: Vec<Event>,
}

impl Default for TimelineState {
    fn default() -> Self {
        Self::new()
    }
}

impl TimelineState {
    /// Starts a fresh timeline: new id, empty title, no events.
    pub fn new() -> Self {
        Self::initialize(TimelineSeed::default())
    }

    /// Seeds state from optional prior data.
    ///
    /// # Contract
    /// - A missing or blank seed id is replaced by a freshly generated one.
    /// - Missing title/events default to empty.
    /// - Every seeded event without an id receives one.
    pub fn initialize(seed: TimelineSeed) -> Self {
        let id = seed
            .id
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(new_id);
        let title = seed.title.unwrap_or_default();
        let events = assign_missing_ids(seed.events.unwrap_or_default());

        info!(
            "event=timeline_init module=state status=ok timeline_id={} events={}",
            id,
            events.len()
        );

        Self { id, title, events }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn event(&self, index: usize) -> Option<&Event> {
        self.events.get(index)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Returns the current position of `id`, if present.
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.events.iter().position(|event| event.id == id)
    }

    /// Replaces the in-progress title. Not validated until commit.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Appends a new event built from an editor payload.
    ///
    /// Returns the generated id. Closing the editor is the caller's job.
    pub fn create_event(&mut self, draft: EventDraft) -> EventId {
        let mut id = new_id();
        while self.position_of(&id).is_some() {
            id = new_id();
        }
        self.events.push(Event::from_draft(id.clone(), draft));

        debug!(
            "event=event_create module=state status=ok event_id={} index={} len={}",
            id,
            self.events.len() - 1,
            self.events.len()
        );
        id
    }

    /// Merges `patch` into the event at `index`, keeping its id.
    ///
    /// # Errors
    /// - `IndexOutOfRange` when `index >= len`; the sequence is unchanged.
    pub fn update_event(&mut self, index: usize, patch: EventPatch) -> TimelineResult<()> {
        let len = self.events.len();
        let Some(event) = self.events.get_mut(index) else {
            warn!(
                "event=event_update module=state status=error reason=index_out_of_range index={} len={}",
                index, len
            );
            return Err(TimelineError::IndexOutOfRange { index, len });
        };

        if patch.is_empty() {
            debug!(
                "event=event_update module=state status=noop event_id={} index={}",
                event.id, index
            );
            return Ok(());
        }

        event.apply_patch(patch);
        debug!(
            "event=event_update module=state status=ok event_id={} index={}",
            event.id, index
        );
        Ok(())
    }

    /// Removes the event whose id matches.
    ///
    /// Returns `false` (and changes nothing) when no event matches; a delete
    /// racing an earlier delete of the same row is not a fault.
    pub fn delete_event(&mut self, id: &str) -> bool {
        match self.position_of(id) {
            Some(index) => {
                self.events.remove(index);
                debug!(
                    "event=event_delete module=state status=ok event_id={} index={} len={}",
                    id,
                    index,
                    self.events.len()
                );
                true
            }
            None => {
                debug!(
                    "event=event_delete module=state status=noop event_id={} len={}",
                    id,
                    self.events.len()
                );
                false
            }
        }
    }

    /// Validates `title` and hands off the finished timeline.
    ///
    /// # Contract
    /// - `title.trim()` must be non-empty; the stored title is the untrimmed
    ///   input.
    /// - On success the state is consumed; nothing is retained in core.
    ///
    /// # Errors
    /// - `Validation(EmptyTitle)`; the rejection carries the state unchanged.
    pub fn commit(self, title: impl Into<String>) -> Result<SavedTimeline, CommitRejected> {
        let title = title.into();
        if title.trim().is_empty() {
            warn!(
                "event=timeline_commit module=state status=error reason=empty_title timeline_id={}",
                self.id
            );
            return Err(CommitRejected {
                state: self,
                error: ValidationError::EmptyTitle.into(),
            });
        }

        info!(
            "event=timeline_commit module=state status=ok timeline_id={} events={}",
            self.id,
            self.events.len()
        );
        Ok(SavedTimeline {
            id: self.id,
            title,
            events: self.events,
        })
    }

    /// Commits with the title currently held in state.
    pub fn commit_current(self) -> Result<SavedTimeline, CommitRejected> {
        let title = self.title.clone();
        self.commit(title)
    }
}

impl EventMutator for TimelineState {
    fn update_event(&mut self, index: usize, patch: EventPatch) -> TimelineResult<()> {
        TimelineState::update_event(self, index, patch)
    }

    fn delete_event(&mut self, id: &str) -> bool {
        TimelineState::delete_event(self, id)
    }
}
