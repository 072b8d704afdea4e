//! Account-related types for the wallet ledger
//!
//! This module defines the Account structure and the scalar types
//! shared by every record in the ledger.

use serde::{Deserialize, Serialize};

/// Currency amount in the smallest unit
///
/// Signed so that snapshot files can carry any balance, although committed
/// ledger operations never leave a balance below zero.
pub type Money = i64;

/// Account identifier, assigned by the ledger's own counter
pub type AccountId = i64;

/// Phone number used as the human-facing account key
pub type Phone = String;

/// A phone-identified balance holder
///
/// Field order matches the `accounts.dump` line layout (`id;phone;balance`).
/// The identifier and phone are fixed once the account is registered; only the
/// balance is exposed for mutation, so the ledger's lookup indexes stay valid
/// while callers hold a live handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    id: AccountId,
    phone: Phone,

    /// Current balance
    ///
    /// Deposits and reversals credit it, payments debit it.
    pub balance: Money,
}

impl Account {
    /// Create a new account with a zero balance
    pub fn new(id: AccountId, phone: impl Into<Phone>) -> Self {
        Account {
            id,
            phone: phone.into(),
            balance: 0,
        }
    }

    /// Create an account with an explicit balance (used when restoring snapshots)
    pub fn with_balance(id: AccountId, phone: impl Into<Phone>, balance: Money) -> Self {
        Account {
            id,
            phone: phone.into(),
            balance,
        }
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub(crate) fn set_phone(&mut self, phone: Phone) {
        self.phone = phone;
    }
}
