//! Flutter bridge for the timeline edit screen core.

pub mod api;
