//! Row-level presentation state.
//!
//! # Responsibility
//! - Mediate between one event row and the shared event editor.
//! - Describe animation cues without coupling them to state changes.

pub mod cue;
pub mod event_presentation;
