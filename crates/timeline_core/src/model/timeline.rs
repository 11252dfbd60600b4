//! Timeline handoff shapes.
//!
//! # Responsibility
//! - Define the seed a parent context hands to the edit screen.
//! - Define the finished record handed back on commit.
//!
//! # Invariants
//! - Missing seed fields default to empty values, never to errors.
//! - `SavedTimeline.events` keeps insertion order; it is not date-sorted.

use crate::model::event::Event;
use serde::{Deserialize, Serialize};

/// Opaque identifier of a timeline, reused across edits of the same one.
pub type TimelineId = String;

/// Optional prior state supplied by the parent context.
///
/// Every field may be absent; a fully empty seed starts a fresh timeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineSeed {
    #[serde(default)]
    pub id: Option<TimelineId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub events: Option<Vec<Event>>,
}

impl TimelineSeed {
    /// Parses a seed from its JSON wire form.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Seeds an edit of an already-saved timeline.
    pub fn from_saved(saved: SavedTimeline) -> Self {
        Self {
            id: Some(saved.id),
            title: Some(saved.title),
            events: Some(saved.events),
        }
    }
}

/// Immutable snapshot delivered to the parent context on commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedTimeline {
    pub id: TimelineId,
    pub title: String,
    pub events: Vec<Event>,
}

impl SavedTimeline {
    /// Serializes the snapshot to its JSON wire form.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
