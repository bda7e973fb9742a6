//! Core primitives – geometry, the morph transition state machine, scroll
//! offset tracking, and the sample catalog.
//!
//! Nothing in this module depends on any TUI or rendering crate.

pub mod catalog;
pub mod geometry;
pub mod scroll;
pub mod transition;
