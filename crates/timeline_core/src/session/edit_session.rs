//! Edit-screen session.
//!
//! # Responsibility
//! - Tie one `TimelineState` to the rows rendered from it and to the
//!   "add event" editor.
//! - Turn user actions (add, save, back, row actions) into state mutations
//!   plus independent presentation cues.
//!
//! # Invariants
//! - Rows are re-derived from the event sequence after every mutation.
//! - A row keeps its editor/delete-affordance state across re-derivation
//!   while its event id is still present; its index always tracks the
//!   current sequence.
//! - `save` hands off exactly once; `go_back` hands off nothing.

use crate::model::event::{EventDraft, EventId, EventPatch};
use crate::model::timeline::{SavedTimeline, TimelineId, TimelineSeed};
use crate::presentation::cue::{CueSink, NoopCues, PresentationCue};
use crate::presentation::event_presentation::{
    EditorRequest, EventPresentation, PresentationError,
};
use crate::state::timeline_state::{TimelineError, TimelineState};
use log::info;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Error for session-level actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Row address does not match any rendered row.
    NoSuchRow { index: usize, rows: usize },
    Presentation(PresentationError),
    Timeline(TimelineError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoSuchRow { index, rows } => {
                write!(f, "no event row at index {index} ({rows} row(s) rendered)")
            }
            Self::Presentation(err) => write!(f, "{err}"),
            Self::Timeline(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NoSuchRow { .. } => None,
            Self::Presentation(err) => Some(err),
            Self::Timeline(err) => Some(err),
        }
    }
}

impl From<PresentationError> for SessionError {
    fn from(value: PresentationError) -> Self {
        Self::Presentation(value)
    }
}

impl From<TimelineError> for SessionError {
    fn from(value: TimelineError) -> Self {
        Self::Timeline(value)
    }
}

/// Refused save. Carries the session back so editing can continue.
#[derive(Debug)]
pub struct SessionRejected<C: CueSink = NoopCues> {
    session: EditSession<C>,
    error: TimelineError,
}

impl<C: CueSink> SessionRejected<C> {
    pub fn error(&self) -> &TimelineError {
        &self.error
    }

    pub fn into_session(self) -> EditSession<C> {
        self.session
    }
}

impl<C: CueSink> Display for SessionRejected<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "save rejected: {}", self.error)
    }
}

impl<C: CueSink + std::fmt::Debug> Error for SessionRejected<C> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.error)
    }
}

/// How an edit session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Committed; the snapshot goes to the parent context.
    Saved(SavedTimeline),
    /// Left via back navigation; nothing is handed off.
    Discarded { timeline_id: TimelineId },
}

/// One open edit screen.
#[derive(Debug)]
pub struct EditSession<C: CueSink = NoopCues> {
    state: TimelineState,
    create_editor_open: bool,
    rows: Vec<EventPresentation>,
    cues: C,
}

impl EditSession<NoopCues> {
    /// Opens a session whose cues are discarded.
    pub fn open(seed: TimelineSeed) -> Self {
        Self::with_cues(seed, NoopCues)
    }
}

impl<C: CueSink> EditSession<C> {
    pub fn with_cues(seed: TimelineSeed, cues: C) -> Self {
        let mut session = Self {
            state: TimelineState::initialize(seed),
            create_editor_open: false,
            rows: Vec::new(),
            cues,
        };
        session.sync_rows();
        session
    }

    pub fn state(&self) -> &TimelineState {
        &self.state
    }

    pub fn timeline_id(&self) -> &str {
        self.state.id()
    }

    pub fn title(&self) -> &str {
        self.state.title()
    }

    pub fn rows(&self) -> &[EventPresentation] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&EventPresentation> {
        self.rows.get(index)
    }

    pub fn cues(&self) -> &C {
        &self.cues
    }

    pub fn cues_mut(&mut self) -> &mut C {
        &mut self.cues
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.state.set_title(title);
    }

    pub fn is_create_editor_open(&self) -> bool {
        self.create_editor_open
    }

    /// Editor input for the "add event" editor (no initial values).
    pub fn create_editor_request(&self) -> EditorRequest {
        EditorRequest {
            visible: self.create_editor_open,
            initial_title: String::new(),
            initial_date: String::new(),
            initial_description: String::new(),
            initial_images: Vec::new(),
        }
    }

    /// "Add Event" pressed.
    pub fn open_create_editor(&mut self) {
        self.cues.play(PresentationCue::PressFeedback);
        self.create_editor_open = true;
    }

    pub fn close_create_editor(&mut self) {
        self.create_editor_open = false;
    }

    /// Saves the "add event" editor: appends the event and closes the editor.
    pub fn save_new_event(&mut self, draft: EventDraft) -> EventId {
        let id = self.create_event(draft);
        self.create_editor_open = false;
        id
    }

    /// Appends an event without touching editor visibility.
    pub fn create_event(&mut self, draft: EventDraft) -> EventId {
        let id = self.state.create_event(draft);
        self.sync_rows();
        id
    }

    pub fn update_event(&mut self, index: usize, patch: EventPatch) -> Result<(), SessionError> {
        self.state.update_event(index, patch)?;
        self.sync_rows();
        Ok(())
    }

    pub fn delete_event(&mut self, id: &str) -> bool {
        let removed = self.state.delete_event(id);
        self.sync_rows();
        removed
    }

    /// Row tapped: opens its editor and returns the editor input.
    pub fn open_row_editor(&mut self, index: usize) -> Result<EditorRequest, SessionError> {
        let row = self.row_mut(index)?;
        row.open_editor();
        Ok(row.editor_request())
    }

    pub fn save_row(&mut self, index: usize, draft: EventDraft) -> Result<(), SessionError> {
        let rows = self.rows.len();
        let row = self
            .rows
            .get_mut(index)
            .ok_or(SessionError::NoSuchRow { index, rows })?;
        row.on_save(&mut self.state, draft)?;
        self.sync_rows();
        Ok(())
    }

    pub fn close_row(&mut self, index: usize) -> Result<(), SessionError> {
        self.row_mut(index)?.on_close();
        Ok(())
    }

    /// Deletes the event behind a row (editor delete or delete affordance).
    pub fn delete_row(&mut self, index: usize) -> Result<bool, SessionError> {
        let rows = self.rows.len();
        let row = self
            .rows
            .get_mut(index)
            .ok_or(SessionError::NoSuchRow { index, rows })?;
        if row.is_pending_delete() {
            self.cues.play(PresentationCue::HideDelete);
        }
        let removed = row.on_delete(&mut self.state);
        self.sync_rows();
        Ok(removed)
    }

    /// Sustained press on a row. No gesture currently routes here.
    pub fn long_press_row(&mut self, index: usize) -> Result<(), SessionError> {
        row_at(&mut self.rows, index)?.on_long_press(&mut self.cues);
        Ok(())
    }

    pub fn release_row(&mut self, index: usize) -> Result<(), SessionError> {
        row_at(&mut self.rows, index)?.on_press_out(&mut self.cues);
        Ok(())
    }

    pub fn dismiss_row_delete(&mut self, index: usize) -> Result<(), SessionError> {
        row_at(&mut self.rows, index)?.dismiss_delete(&mut self.cues);
        Ok(())
    }

    /// "Save Timeline" pressed: commits with the current title.
    ///
    /// # Errors
    /// - Empty title; the rejection carries the session unchanged.
    pub fn save(self) -> Result<SavedTimeline, SessionRejected<C>> {
        let Self {
            state,
            create_editor_open,
            rows,
            mut cues,
        } = self;
        cues.play(PresentationCue::PressFeedback);

        state.commit_current().map_err(|rejected| {
            let (state, error) = rejected.into_parts();
            SessionRejected {
                session: Self {
                    state,
                    create_editor_open,
                    rows,
                    cues,
                },
                error,
            }
        })
    }

    /// Back navigation: discards all edits; nothing is handed off.
    pub fn go_back(mut self) -> SessionOutcome {
        self.cues.play(PresentationCue::PressFeedback);
        info!(
            "event=timeline_discard module=session status=ok timeline_id={} events={}",
            self.state.id(),
            self.state.len()
        );
        SessionOutcome::Discarded {
            timeline_id: self.state.id().to_string(),
        }
    }

    /// Same as [`EditSession::save`], wrapped for hosts that route both
    /// exits through one match.
    pub fn finish(self) -> Result<SessionOutcome, SessionRejected<C>> {
        self.save().map(SessionOutcome::Saved)
    }

    fn row_mut(&mut self, index: usize) -> Result<&mut EventPresentation, SessionError> {
        row_at(&mut self.rows, index)
    }

    fn sync_rows(&mut self) {
        let mut previous = self
            .rows
            .drain(..)
            .map(|row| (row.id().to_string(), row))
            .collect::<HashMap<_, _>>();

        self.rows = self
            .state
            .events()
            .iter()
            .enumerate()
            .map(|(index, event)| match previous.remove(&event.id) {
                Some(mut row) => {
                    row.rebind(index, event.clone());
                    row
                }
                None => EventPresentation::new(index, event.clone()),
            })
            .collect();
    }
}

fn row_at(
    rows: &mut [EventPresentation],
    index: usize,
) -> Result<&mut EventPresentation, SessionError> {
    let len = rows.len();
    rows.get_mut(index)
        .ok_or(SessionError::NoSuchRow { index, rows: len })
}

#[cfg(test)]
mod tests {
    use super::{EditSession, SessionError};
    use crate::model::event::EventDraft;
    use crate::model::timeline::TimelineSeed;
    use crate::presentation::cue::{PresentationCue, RecordedCues};

    #[test]
    fn add_event_flow_closes_create_editor() {
        let mut session = EditSession::open(TimelineSeed::default());
        session.open_create_editor();
        assert!(session.create_editor_request().visible);

        session.save_new_event(EventDraft::new("A", "2024-01-01T00:00:00Z"));
        assert!(!session.is_create_editor_open());
        assert_eq!(session.rows().len(), 1);
    }

    #[test]
    fn row_actions_reject_unknown_rows() {
        let mut session = EditSession::open(TimelineSeed::default());
        let err = session.open_row_editor(0).unwrap_err();
        assert_eq!(err, SessionError::NoSuchRow { index: 0, rows: 0 });
    }

    #[test]
    fn cues_are_emitted_alongside_actions() {
        let mut session = EditSession::with_cues(TimelineSeed::default(), RecordedCues::default());
        session.open_create_editor();
        session.save_new_event(EventDraft::new("A", "2024-01-01"));
        session.long_press_row(0).unwrap();
        session.delete_row(0).unwrap();

        assert_eq!(
            session.cues_mut().drain(),
            vec![
                PresentationCue::PressFeedback,
                PresentationCue::RowPressIn,
                PresentationCue::RevealDelete,
                PresentationCue::HideDelete,
            ]
        );
        assert!(session.rows().is_empty());
    }
}
