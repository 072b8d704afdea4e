//! Payment-related types for the wallet ledger
//!
//! This module defines the payment record, its lifecycle status and
//! the identifier types used throughout the system.

use super::account::{AccountId, Money};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Payment identifier
///
/// Generated by the ledger's `IdGenerator` when the payment is created.
pub type PaymentId = String;

/// Free-form payment category label (e.g. "food", "auto")
pub type PaymentCategory = String;

/// Lifecycle status of a payment
///
/// Serialized with the snapshot spelling: `OK`, `FAIL`, `INPROGRESS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// Payment settled
    #[serde(rename = "OK")]
    Ok,

    /// Payment reversed; its amount has been refunded to the account
    ///
    /// Terminal: a failed payment never transitions back.
    #[serde(rename = "FAIL")]
    Failed,

    /// Payment created and awaiting settlement
    ///
    /// Every payment produced by `pay` starts here.
    #[serde(rename = "INPROGRESS")]
    InProgress,
}

impl PaymentStatus {
    /// Snapshot spelling of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Ok => "OK",
            PaymentStatus::Failed => "FAIL",
            PaymentStatus::InProgress => "INPROGRESS",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A debit against an account
///
/// Field order matches the `payments.dump` line layout
/// (`id;accountID;amount;category;status`). Amount and category never change
/// after creation; only the status moves, via reversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Unique payment identifier
    pub id: PaymentId,

    /// Owning account, always resolvable in the ledger
    pub account_id: AccountId,

    /// Strictly positive amount debited at creation
    pub amount: Money,

    pub category: PaymentCategory,

    pub status: PaymentStatus,
}
