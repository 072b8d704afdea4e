//! Types module
//!
//! Contains core data structures used throughout the ledger.
//! This module organizes types into logical submodules:
//! - `account`: Account record and identifiers
//! - `payment`: Payment record, status and identifiers
//! - `favorite`: Favorite payment templates
//! - `error`: Error types for the ledger

pub mod account;
pub mod error;
pub mod favorite;
pub mod payment;

pub use account::{Account, AccountId, Money, Phone};
pub use error::{LedgerError, Result};
pub use favorite::{Favorite, FavoriteId};
pub use payment::{Payment, PaymentCategory, PaymentId, PaymentStatus};
