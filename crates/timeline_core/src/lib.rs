//! Core domain logic for the timeline edit screen.
//! This crate is the single source of truth for event identity and
//! timeline edit invariants.

pub mod identity;
pub mod logging;
pub mod model;
pub mod presentation;
pub mod session;
pub mod state;

pub use identity::{assign_if_missing, assign_missing_ids, new_id};
pub use logging::{default_log_level, init_logging, init_logging_with, logging_status, LogConfig};
pub use model::date::{format_display_date, normalize_event_date, parse_event_date, DateError};
pub use model::event::{Event, EventDraft, EventId, EventPatch};
pub use model::timeline::{SavedTimeline, TimelineId, TimelineSeed};
pub use presentation::cue::{CueSink, NoopCues, PresentationCue, RecordedCues};
pub use presentation::event_presentation::{
    EditorMode, EditorRequest, EventPresentation, PresentationError,
};
pub use session::edit_session::{EditSession, SessionError, SessionOutcome, SessionRejected};
pub use state::timeline_state::{
    CommitRejected, EventMutator, TimelineError, TimelineResult, TimelineState, ValidationError,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
