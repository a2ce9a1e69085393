//! Domain model for roster records.
//!
//! # Responsibility
//! - Define the record shape shared by the store, the repository and the UI.
//! - Own the field validation rules.
//!
//! # Invariants
//! - A `Record` produced by `validate` has trimmed, valid fields.

pub mod record;
