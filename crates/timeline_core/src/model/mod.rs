//! Timeline domain model.
//!
//! # Responsibility
//! - Define the event record and the timeline handoff shapes.
//! - Own date canonicalization shared by editor and display paths.
//!
//! # Invariants
//! - Every stored event is identified by a non-blank `EventId`.
//! - Deletion is a hard removal from the in-memory sequence; there are no
//!   tombstones in this model.

pub mod date;
pub mod event;
pub mod timeline;
