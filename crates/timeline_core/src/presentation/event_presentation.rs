//! Per-row interaction mediator.
//!
//! # Responsibility
//! - Track whether a row's editor is open and whether its delete
//!   affordance is shown.
//! - Translate editor results into timeline mutations.
//!
//! # Invariants
//! - Updates are forwarded by the index the row was derived at; deletes are
//!   forwarded by the row's event id.
//! - A failed save forwards nothing and leaves the editor open.
//! - `pending_delete` is orthogonal to the editor mode. No gesture drives it
//!   yet; the hooks exist so one can be wired in.

use crate::model::date::{format_display_date, normalize_event_date, DateError};
use crate::model::event::{Event, EventDraft, EventPatch};
use crate::presentation::cue::{CueSink, PresentationCue};
use crate::state::timeline_state::{EventMutator, TimelineError};
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Editor visibility for one row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditorMode {
    #[default]
    Idle,
    Editing,
}

/// Error for row-level editor actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentationError {
    /// Editor result arrived while no editor was open for this row.
    NotEditing,
    InvalidDate(DateError),
    Timeline(TimelineError),
}

impl Display for PresentationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotEditing => write!(f, "event editor is not open"),
            Self::InvalidDate(err) => write!(f, "{err}"),
            Self::Timeline(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PresentationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotEditing => None,
            Self::InvalidDate(err) => Some(err),
            Self::Timeline(err) => Some(err),
        }
    }
}

impl From<DateError> for PresentationError {
    fn from(value: DateError) -> Self {
        Self::InvalidDate(value)
    }
}

impl From<TimelineError> for PresentationError {
    fn from(value: TimelineError) -> Self {
        Self::Timeline(value)
    }
}

/// Input handed to the event editor when it opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorRequest {
    pub visible: bool,
    pub initial_title: String,
    /// Canonical ISO-8601 when the stored date parses, raw value otherwise.
    pub initial_date: String,
    pub initial_description: String,
    pub initial_images: Vec<String>,
}

/// Interaction state for one rendered event row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventPresentation {
    index: usize,
    event: Event,
    mode: EditorMode,
    pending_delete: bool,
}

impl EventPresentation {
    /// Derives an idle row for `event` rendered at `index`.
    pub fn new(index: usize, event: Event) -> Self {
        Self {
            index,
            event,
            mode: EditorMode::Idle,
            pending_delete: false,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn id(&self) -> &str {
        &self.event.id
    }

    pub fn event(&self) -> &Event {
        &self.event
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        self.mode == EditorMode::Editing
    }

    pub fn is_pending_delete(&self) -> bool {
        self.pending_delete
    }

    pub fn display_date(&self) -> String {
        format_display_date(&self.event.date)
    }

    /// Re-points this row at a fresh render, keeping interaction state.
    pub(crate) fn rebind(&mut self, index: usize, event: Event) {
        self.index = index;
        self.event = event;
    }

    /// Idle -> Editing. No-op when already editing.
    pub fn open_editor(&mut self) {
        if self.mode == EditorMode::Editing {
            return;
        }
        self.mode = EditorMode::Editing;
    }

    /// Editor input for the current row values.
    pub fn editor_request(&self) -> EditorRequest {
        let initial_date =
            normalize_event_date(&self.event.date).unwrap_or_else(|_| self.event.date.clone());
        EditorRequest {
            visible: self.is_editing(),
            initial_title: self.event.title.clone(),
            initial_date,
            initial_description: self.event.description.clone(),
            initial_images: self.event.images.clone(),
        }
    }

    /// Forwards an editor save to `target` and closes the editor.
    ///
    /// # Errors
    /// - `NotEditing` when the editor is not open.
    /// - `InvalidDate` when the payload date does not parse.
    /// - `Timeline` when the row index went stale.
    ///
    /// On error nothing is forwarded and the editor stays open.
    pub fn on_save<M: EventMutator + ?Sized>(
        &mut self,
        target: &mut M,
        draft: EventDraft,
    ) -> Result<(), PresentationError> {
        if !self.is_editing() {
            return Err(PresentationError::NotEditing);
        }

        let draft = EventDraft {
            date: normalize_event_date(&draft.date)?,
            ..draft
        };
        target.update_event(self.index, EventPatch::from(draft.clone()))?;

        self.event = Event::from_draft(self.event.id.clone(), draft);
        self.mode = EditorMode::Idle;
        Ok(())
    }

    /// Closes the editor without forwarding anything.
    pub fn on_close(&mut self) {
        self.mode = EditorMode::Idle;
    }

    /// Returns to idle and forwards this row's id for removal.
    ///
    /// Used by both the editor's delete action and the delete affordance.
    pub fn on_delete<M: EventMutator + ?Sized>(&mut self, target: &mut M) -> bool {
        self.mode = EditorMode::Idle;
        self.pending_delete = false;
        let removed = target.delete_event(&self.event.id);
        debug!(
            "event=row_delete module=presentation status={} event_id={} index={}",
            if removed { "ok" } else { "noop" },
            self.event.id,
            self.index
        );
        removed
    }

    /// Sustained press: show the delete affordance.
    ///
    /// The flag flips before the cues play; `cues` never gates it.
    pub fn on_long_press<C: CueSink + ?Sized>(&mut self, cues: &mut C) {
        self.pending_delete = true;
        cues.play(PresentationCue::RowPressIn);
        cues.play(PresentationCue::RevealDelete);
    }

    /// Press released after a hold. Visual only.
    pub fn on_press_out<C: CueSink + ?Sized>(&self, cues: &mut C) {
        cues.play(PresentationCue::RowPressOut);
    }

    /// Tap elsewhere: hide the delete affordance.
    pub fn dismiss_delete<C: CueSink + ?Sized>(&mut self, cues: &mut C) {
        self.pending_delete = false;
        cues.play(PresentationCue::HideDelete);
    }
}
