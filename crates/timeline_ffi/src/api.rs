//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the timeline edit screen as stable, use-case-level functions.
//! - Keep error semantics simple: every call returns an envelope with
//!   `ok` + human-readable `message`.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - All session mutations go through one process-wide mutex, so at most
//!   one mutation is in flight at a time.
//! - A saved or discarded session is dropped from the registry.

use log::{info, warn};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use timeline_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, new_id,
    ping as ping_inner, EditSession, EditorRequest, EventDraft, EventPatch, PresentationCue,
    RecordedCues, SavedTimeline, SessionOutcome, TimelineSeed,
};

type Session = EditSession<RecordedCues>;

static SESSIONS: Lazy<Mutex<HashMap<String, Session>>> = Lazy::new(|| Mutex::new(HashMap::new()));

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Envelope for opening an edit session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineOpenResponse {
    pub ok: bool,
    /// Registry key for subsequent calls.
    pub session_id: Option<String>,
    /// Timeline id (seeded or freshly generated).
    pub timeline_id: Option<String>,
    pub message: String,
}

/// Generic action envelope for mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineActionResponse {
    pub ok: bool,
    /// Affected event id, when the action has one.
    pub event_id: Option<String>,
    pub message: String,
}

impl TimelineActionResponse {
    fn success(message: impl Into<String>, event_id: Option<String>) -> Self {
        Self {
            ok: true,
            event_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            event_id: None,
            message: message.into(),
        }
    }
}

/// One rendered event row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineRowItem {
    pub event_id: String,
    pub index: u32,
    pub title: String,
    /// Stored ISO-8601 date.
    pub date: String,
    /// Short form (`Jan 1, 2024`).
    pub display_date: String,
    pub editing: bool,
    pub pending_delete: bool,
}

/// Row listing envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineRowsResponse {
    pub ok: bool,
    pub title: String,
    pub items: Vec<TimelineRowItem>,
    /// Whether the "add event" editor is open.
    pub create_editor_visible: bool,
    pub message: String,
}

/// Event editor input envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorRequestResponse {
    pub ok: bool,
    pub visible: bool,
    pub initial_title: String,
    pub initial_date: String,
    pub initial_description: String,
    pub initial_images: Vec<String>,
    pub message: String,
}

impl EditorRequestResponse {
    fn from_request(request: EditorRequest) -> Self {
        Self {
            ok: true,
            visible: request.visible,
            initial_title: request.initial_title,
            initial_date: request.initial_date,
            initial_description: request.initial_description,
            initial_images: request.initial_images,
            message: String::new(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            visible: false,
            initial_title: String::new(),
            initial_date: String::new(),
            initial_description: String::new(),
            initial_images: Vec::new(),
            message: message.into(),
        }
    }
}

/// Save envelope. `timeline_json` is the handed-off `{id, title, events}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineSaveResponse {
    pub ok: bool,
    pub timeline_json: Option<String>,
    pub message: String,
}

/// Opens an edit session from an optional JSON seed.
///
/// # FFI contract
/// - `seed_json = None` (or blank) starts a fresh timeline.
/// - Invalid JSON returns `ok=false` and opens nothing.
#[flutter_rust_bridge::frb(sync)]
pub fn timeline_open(seed_json: Option<String>) -> TimelineOpenResponse {
    let seed = match seed_json.as_deref().map(str::trim) {
        None | Some("") => TimelineSeed::default(),
        Some(raw) => match TimelineSeed::from_json(raw) {
            Ok(seed) => seed,
            Err(err) => {
                return TimelineOpenResponse {
                    ok: false,
                    session_id: None,
                    timeline_id: None,
                    message: format!("timeline_open failed: invalid seed: {err}"),
                };
            }
        },
    };

    let session = EditSession::with_cues(seed, RecordedCues::default());
    let timeline_id = session.timeline_id().to_string();
    let session_id = new_id();

    match lock_sessions() {
        Ok(mut sessions) => {
            sessions.insert(session_id.clone(), session);
            info!(
                "event=session_open module=ffi status=ok session_id={} timeline_id={}",
                session_id, timeline_id
            );
            TimelineOpenResponse {
                ok: true,
                session_id: Some(session_id),
                timeline_id: Some(timeline_id),
                message: "Timeline opened.".to_string(),
            }
        }
        Err(err) => TimelineOpenResponse {
            ok: false,
            session_id: None,
            timeline_id: None,
            message: format!("timeline_open failed: {err}"),
        },
    }
}

/// Replaces the in-progress timeline title.
#[flutter_rust_bridge::frb(sync)]
pub fn timeline_set_title(session_id: String, title: String) -> TimelineActionResponse {
    action(&session_id, "timeline_set_title", |session| {
        session.set_title(title);
        Ok(TimelineActionResponse::success("Title updated.", None))
    })
}

/// "Add Event" pressed: shows the create editor.
#[flutter_rust_bridge::frb(sync)]
pub fn timeline_add_event_open(session_id: String) -> TimelineActionResponse {
    action(&session_id, "timeline_add_event_open", |session| {
        session.open_create_editor();
        Ok(TimelineActionResponse::success("Editor opened.", None))
    })
}

/// Create editor dismissed without saving.
#[flutter_rust_bridge::frb(sync)]
pub fn timeline_add_event_close(session_id: String) -> TimelineActionResponse {
    action(&session_id, "timeline_add_event_close", |session| {
        session.close_create_editor();
        Ok(TimelineActionResponse::success("Editor closed.", None))
    })
}

/// Saves the create editor: appends the event and closes the editor.
#[flutter_rust_bridge::frb(sync)]
pub fn timeline_create_event(
    session_id: String,
    title: String,
    date: String,
    description: String,
    images: Vec<String>,
) -> TimelineActionResponse {
    let draft = EventDraft {
        title,
        date,
        description,
        images,
    };
    action(&session_id, "timeline_create_event", |session| {
        let event_id = session.save_new_event(draft);
        Ok(TimelineActionResponse::success("Event created.", Some(event_id)))
    })
}

/// Merges supplied fields into the event at `index`.
#[flutter_rust_bridge::frb(sync)]
pub fn timeline_update_event(
    session_id: String,
    index: u32,
    title: Option<String>,
    date: Option<String>,
    description: Option<String>,
    images: Option<Vec<String>>,
) -> TimelineActionResponse {
    let patch = EventPatch {
        title,
        date,
        description,
        images,
    };
    action(&session_id, "timeline_update_event", |session| {
        let index = index as usize;
        session
            .update_event(index, patch)
            .map_err(|err| err.to_string())?;
        let event_id = session.row(index).map(|row| row.id().to_string());
        Ok(TimelineActionResponse::success("Event updated.", event_id))
    })
}

/// Removes an event by id. Unknown ids succeed as a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn timeline_delete_event(session_id: String, event_id: String) -> TimelineActionResponse {
    action(&session_id, "timeline_delete_event", |session| {
        let message = if session.delete_event(&event_id) {
            "Event deleted."
        } else {
            "Event already removed."
        };
        Ok(TimelineActionResponse::success(message, Some(event_id)))
    })
}

/// Lists rows in display order.
#[flutter_rust_bridge::frb(sync)]
pub fn timeline_rows(session_id: String) -> TimelineRowsResponse {
    let result = with_session(&session_id, |session| {
        let items = session
            .rows()
            .iter()
            .map(|row| TimelineRowItem {
                event_id: row.id().to_string(),
                index: row.index() as u32,
                title: row.event().title.clone(),
                date: row.event().date.clone(),
                display_date: row.display_date(),
                editing: row.is_editing(),
                pending_delete: row.is_pending_delete(),
            })
            .collect::<Vec<_>>();
        Ok(TimelineRowsResponse {
            ok: true,
            title: session.title().to_string(),
            items,
            create_editor_visible: session.is_create_editor_open(),
            message: String::new(),
        })
    });
    result.unwrap_or_else(|err| TimelineRowsResponse {
        ok: false,
        title: String::new(),
        items: Vec::new(),
        create_editor_visible: false,
        message: format!("timeline_rows failed: {err}"),
    })
}

/// Row tapped: opens its editor and returns the editor input.
#[flutter_rust_bridge::frb(sync)]
pub fn row_open_editor(session_id: String, index: u32) -> EditorRequestResponse {
    with_session(&session_id, |session| {
        session
            .open_row_editor(index as usize)
            .map(EditorRequestResponse::from_request)
            .map_err(|err| err.to_string())
    })
    .unwrap_or_else(|err| EditorRequestResponse::failure(format!("row_open_editor failed: {err}")))
}

/// Row editor saved. The date is normalized to canonical ISO-8601.
#[flutter_rust_bridge::frb(sync)]
pub fn row_save(
    session_id: String,
    index: u32,
    title: String,
    date: String,
    description: String,
    images: Vec<String>,
) -> TimelineActionResponse {
    let draft = EventDraft {
        title,
        date,
        description,
        images,
    };
    action(&session_id, "row_save", |session| {
        let index = index as usize;
        session
            .save_row(index, draft)
            .map_err(|err| err.to_string())?;
        let event_id = session.row(index).map(|row| row.id().to_string());
        Ok(TimelineActionResponse::success("Event updated.", event_id))
    })
}

/// Row editor dismissed without saving.
#[flutter_rust_bridge::frb(sync)]
pub fn row_close(session_id: String, index: u32) -> TimelineActionResponse {
    action(&session_id, "row_close", |session| {
        session
            .close_row(index as usize)
            .map_err(|err| err.to_string())?;
        Ok(TimelineActionResponse::success("Editor closed.", None))
    })
}

/// Row delete (from the editor or from the delete affordance).
#[flutter_rust_bridge::frb(sync)]
pub fn row_delete(session_id: String, index: u32) -> TimelineActionResponse {
    action(&session_id, "row_delete", |session| {
        let index = index as usize;
        let event_id = session.row(index).map(|row| row.id().to_string());
        let removed = session.delete_row(index).map_err(|err| err.to_string())?;
        let message = if removed {
            "Event deleted."
        } else {
            "Event already removed."
        };
        Ok(TimelineActionResponse::success(message, event_id))
    })
}

/// Sustained press on a row: shows its delete affordance.
#[flutter_rust_bridge::frb(sync)]
pub fn row_long_press(session_id: String, index: u32) -> TimelineActionResponse {
    action(&session_id, "row_long_press", |session| {
        session
            .long_press_row(index as usize)
            .map_err(|err| err.to_string())?;
        Ok(TimelineActionResponse::success("Delete shown.", None))
    })
}

/// Press released after a sustained press. Only queues a cue.
#[flutter_rust_bridge::frb(sync)]
pub fn row_press_out(session_id: String, index: u32) -> TimelineActionResponse {
    action(&session_id, "row_press_out", |session| {
        session
            .release_row(index as usize)
            .map_err(|err| err.to_string())?;
        Ok(TimelineActionResponse::success("Press released.", None))
    })
}

/// Tap elsewhere: hides a row's delete affordance.
#[flutter_rust_bridge::frb(sync)]
pub fn row_dismiss_delete(session_id: String, index: u32) -> TimelineActionResponse {
    action(&session_id, "row_dismiss_delete", |session| {
        session
            .dismiss_row_delete(index as usize)
            .map_err(|err| err.to_string())?;
        Ok(TimelineActionResponse::success("Delete hidden.", None))
    })
}

/// Returns and clears pending animation cues (`press_feedback`, ...).
#[flutter_rust_bridge::frb(sync)]
pub fn timeline_take_cues(session_id: String) -> Vec<String> {
    with_session(&session_id, |session| {
        Ok(session
            .cues_mut()
            .drain()
            .into_iter()
            .map(|cue| cue_label(cue).to_string())
            .collect())
    })
    .unwrap_or_default()
}

/// "Save Timeline" pressed.
///
/// # FFI contract
/// - On success returns the timeline JSON and drops the session.
/// - On an empty title returns `ok=false`; the session stays open.
/// - If the snapshot cannot be encoded the session is reopened from it under
///   the same `session_id`, so no edits are lost.
#[flutter_rust_bridge::frb(sync)]
pub fn timeline_save(session_id: String) -> TimelineSaveResponse {
    let mut sessions = match lock_sessions() {
        Ok(sessions) => sessions,
        Err(err) => return save_failure(err),
    };
    let Some(session) = sessions.remove(&session_id) else {
        return save_failure(format!("unknown session `{session_id}`"));
    };

    match session.finish() {
        Ok(SessionOutcome::Saved(saved)) => {
            hand_off(&mut sessions, session_id, saved, |saved| {
                saved.to_json().map_err(|err| err.to_string())
            })
        }
        Ok(SessionOutcome::Discarded { timeline_id }) => {
            save_failure(format!("timeline `{timeline_id}` was discarded"))
        }
        Err(rejected) => {
            let message = rejected.error().to_string();
            sessions.insert(session_id, rejected.into_session());
            TimelineSaveResponse {
                ok: false,
                timeline_json: None,
                message,
            }
        }
    }
}

/// Back navigation: drops the session without handing anything off.
#[flutter_rust_bridge::frb(sync)]
pub fn timeline_go_back(session_id: String) -> TimelineActionResponse {
    let mut sessions = match lock_sessions() {
        Ok(sessions) => sessions,
        Err(err) => {
            return TimelineActionResponse::failure(format!("timeline_go_back failed: {err}"));
        }
    };
    match sessions.remove(&session_id) {
        Some(session) => match session.go_back() {
            SessionOutcome::Discarded { timeline_id } => {
                info!(
                    "event=session_close module=ffi status=ok session_id={} timeline_id={}",
                    session_id, timeline_id
                );
                TimelineActionResponse::success("Timeline discarded.", None)
            }
            SessionOutcome::Saved(_) => TimelineActionResponse::failure(
                "timeline_go_back failed: back navigation must not save",
            ),
        },
        None => TimelineActionResponse::failure(format!(
            "timeline_go_back failed: unknown session `{session_id}`"
        )),
    }
}

/// Encodes `saved` for the host. On failure the session is re-seeded from
/// the snapshot and put back under `session_id`.
fn hand_off(
    sessions: &mut HashMap<String, Session>,
    session_id: String,
    saved: SavedTimeline,
    encode: impl FnOnce(&SavedTimeline) -> Result<String, String>,
) -> TimelineSaveResponse {
    match encode(&saved) {
        Ok(json) => {
            info!(
                "event=session_save module=ffi status=ok session_id={} timeline_id={} events={}",
                session_id,
                saved.id,
                saved.events.len()
            );
            TimelineSaveResponse {
                ok: true,
                timeline_json: Some(json),
                message: "Timeline saved.".to_string(),
            }
        }
        Err(err) => {
            let reopened =
                EditSession::with_cues(TimelineSeed::from_saved(saved), RecordedCues::default());
            sessions.insert(session_id, reopened);
            save_failure(format!("encode failed: {err}"))
        }
    }
}

fn save_failure(message: impl Into<String>) -> TimelineSaveResponse {
    let message = message.into();
    warn!("event=session_save module=ffi status=error");
    TimelineSaveResponse {
        ok: false,
        timeline_json: None,
        message: format!("timeline_save failed: {message}"),
    }
}

fn cue_label(cue: PresentationCue) -> &'static str {
    match cue {
        PresentationCue::PressFeedback => "press_feedback",
        PresentationCue::RowPressIn => "row_press_in",
        PresentationCue::RowPressOut => "row_press_out",
        PresentationCue::RevealDelete => "reveal_delete",
        PresentationCue::HideDelete => "hide_delete",
    }
}

fn lock_sessions() -> Result<MutexGuard<'static, HashMap<String, Session>>, String> {
    SESSIONS
        .lock()
        .map_err(|_| "session registry lock poisoned".to_string())
}

fn with_session<T>(
    session_id: &str,
    f: impl FnOnce(&mut Session) -> Result<T, String>,
) -> Result<T, String> {
    let mut sessions = lock_sessions()?;
    let session = sessions
        .get_mut(session_id)
        .ok_or_else(|| format!("unknown session `{session_id}`"))?;
    f(session)
}

fn action(
    session_id: &str,
    name: &str,
    f: impl FnOnce(&mut Session) -> Result<TimelineActionResponse, String>,
) -> TimelineActionResponse {
    with_session(session_id, f)
        .unwrap_or_else(|err| TimelineActionResponse::failure(format!("{name} failed: {err}")))
}
