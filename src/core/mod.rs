//! Core ledger logic module
//!
//! This module contains the core ledger components:
//! - `traits` - Pluggable collaborators (identifier generation)
//! - `account_registry` - Account creation, lookup and balance arithmetic
//! - `payment_store` - Ordered, indexed payment and favorite storage
//! - `ledger` - Balance-changing operations
//! - `aggregation` - Partitioned concurrent sums and filters

pub mod account_registry;
pub mod aggregation;
pub mod ledger;
pub mod payment_store;
pub mod traits;

pub use account_registry::AccountRegistry;
pub use aggregation::{AggregationConfig, Progress, DEFAULT_PROGRESS_CHUNK_SIZE};
pub use ledger::Ledger;
pub use payment_store::{FavoriteStore, PaymentStore};
pub use traits::{IdGenerator, UuidGenerator};
