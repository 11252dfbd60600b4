//! Screen-level edit sessions.
//!
//! # Responsibility
//! - Orchestrate timeline state, row presentation and editor visibility
//!   into use-case level actions for UI/FFI callers.

pub mod edit_session;
