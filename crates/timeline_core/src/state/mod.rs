//! Timeline edit state.
//!
//! # Responsibility
//! - Hold the single writer for one timeline's event sequence.
//! - Expose the mutation seam consumed by row presentation.

pub mod timeline_state;
