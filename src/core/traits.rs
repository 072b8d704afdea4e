//! Core traits for pluggable ledger collaborators
//!
//! Identifier generation is owned by each `Ledger` instance rather than by a
//! process-wide generator, so independent ledgers never share state.

use std::fmt::Debug;
use uuid::Uuid;

/// Trait for producing payment and favorite identifiers
///
/// Implementations must never return the same identifier twice for the
/// lifetime of the ledger that owns them.
pub trait IdGenerator: Debug + Send + Sync {
    /// Produce the next unique identifier
    fn next_id(&mut self) -> String;
}

/// Default generator backed by random (v4) UUIDs
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}
