//! Favorite payment templates

use super::account::{AccountId, Money};
use super::payment::PaymentCategory;
use serde::{Deserialize, Serialize};

/// Favorite identifier
pub type FavoriteId = String;

/// A reusable payment template frozen from a prior payment
///
/// Amount and category are copied at favoriting time, so later changes to the
/// source payment are never reflected here. Field order matches the
/// `favorites.dump` line layout (`id;accountID;name;amount;category`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: FavoriteId,
    pub account_id: AccountId,

    /// Display name chosen by the caller
    pub name: String,

    pub amount: Money,
    pub category: PaymentCategory,
}
