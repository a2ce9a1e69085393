//! Roster use-case services.
//!
//! # Responsibility
//! - Keep the in-memory record list and the persisted slot in lockstep.
//! - Track create/edit mode and project rows for display.
//! - Give UI/FFI layers one state owner (`RosterController`).

pub mod controller;
pub mod record_store;
pub mod session;
pub mod view;
