//! Wallet Ledger Library
//! # Overview
//!
//! This library provides an in-memory wallet ledger: phone-keyed accounts with
//! balances, payments debited from those balances, reversible payments,
//! favorite payment templates, concurrent aggregation over the payment
//! collection and a plain-text snapshot format.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (Account, Payment, Favorite, errors)
//! - [`cli`] - CLI argument parsing and command execution
//! - [`core`] - Business logic components:
//!   - [`core::ledger`] - Account and payment operations
//!   - [`core::account_registry`] - Account storage and balance arithmetic
//!   - [`core::payment_store`] - Payment and favorite storage
//!   - [`core::aggregation`] - Partitioned sums and filters
//! - [`io`] - Snapshot export/import and history files
//!
//! # Payment Lifecycle
//!
//! - **Pay**: debit the account and record an `INPROGRESS` payment
//! - **Reject**: refund the amount and mark the payment `FAIL` (at most once)
//! - **Repeat**: pay again with the same account, amount and category
//! - **Favorite**: freeze a payment into a named template, paid from later
//!
//! # Example
//!
//! ```
//! use wallet_ledger::Ledger;
//!
//! let mut ledger = Ledger::new();
//! let account = ledger.register_account("555-0100").unwrap();
//! ledger.deposit(account.id(), 1000).unwrap();
//! let payment = ledger.pay(account.id(), 300, "food").unwrap();
//! ledger.reject(&payment.id).unwrap();
//! assert_eq!(ledger.find_account_by_id(account.id()).unwrap().balance, 1000);
//! ```

pub mod cli;
pub mod core;
pub mod io;
pub mod types;

pub use self::core::{AggregationConfig, Ledger, Progress};
pub use io::history_to_files;
pub use types::{
    Account, AccountId, Favorite, FavoriteId, LedgerError, Money, Payment, PaymentCategory,
    PaymentId, PaymentStatus, Phone, Result,
};
