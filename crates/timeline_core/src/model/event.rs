//! Event domain model.
//!
//! # Responsibility
//! - Define the dated record shown as one row of a timeline.
//! - Define the editor payload shapes used to create and update events.
//!
//! # Invariants
//! - `id` is opaque, unique within one timeline and never reassigned.
//! - An empty (or whitespace-only) `id` means "not yet assigned".
//! - `date` is stored as an ISO-8601 string; canonical form is produced by
//!   `model::date::normalize_event_date`.

use serde::{Deserialize, Serialize};

/// Opaque identifier of an event inside one timeline.
///
/// Kept as a `String` alias because legacy seeds may carry ids that are not
/// UUIDs; freshly generated ids are hyphenated v4 UUIDs.
pub type EventId = String;

/// Dated record with title, description and image references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Stable identity; empty until `identity::assign_if_missing` runs.
    #[serde(default)]
    pub id: EventId,
    /// Display title. Editable transiently; may be empty mid-edit.
    pub title: String,
    /// ISO-8601 timestamp string.
    pub date: String,
    #[serde(default)]
    pub description: String,
    /// Ordered opaque image resource references.
    #[serde(default)]
    pub images: Vec<String>,
}

impl Event {
    /// Builds an event from an editor payload and an already-assigned id.
    pub fn from_draft(id: impl Into<EventId>, draft: EventDraft) -> Self {
        Self {
            id: id.into(),
            title: draft.title,
            date: draft.date,
            description: draft.description,
            images: draft.images,
        }
    }

    /// Returns whether this event carries a non-blank identity.
    pub fn has_id(&self) -> bool {
        !self.id.trim().is_empty()
    }

    /// Merges the `Some` fields of `patch` into this event.
    ///
    /// `id` is never touched.
    pub fn apply_patch(&mut self, patch: EventPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(images) = patch.images {
            self.images = images;
        }
    }
}

/// Full editor payload, as produced when the user saves the event editor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    pub date: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
}

impl EventDraft {
    pub fn new(title: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            date: date.into(),
            description: String::new(),
            images: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_images(mut self, images: Vec<String>) -> Self {
        self.images = images;
        self
    }
}

/// Partial update payload. Only `Some` fields replace stored values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
}

impl EventPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.date.is_none()
            && self.description.is_none()
            && self.images.is_none()
    }
}

impl From<EventDraft> for EventPatch {
    fn from(draft: EventDraft) -> Self {
        Self {
            title: Some(draft.title),
            date: Some(draft.date),
            description: Some(draft.description),
            images: Some(draft.images),
        }
    }
}
