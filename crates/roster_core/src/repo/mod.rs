//! Repository layer over the key-value slots.
//!
//! # Responsibility
//! - Serialize the record sequence into one slot and read it back.
//! - Report undecodable or invalid persisted data as a semantic error.
//!
//! # Invariants
//! - Read paths reject invalid persisted records instead of masking them.

pub mod record_repo;
