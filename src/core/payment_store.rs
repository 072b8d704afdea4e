//! Payment and favorite storage
//!
//! This module provides the stores that keep payments and favorites in
//! creation order while resolving identifiers through an index.
//!
//! # Shared Payment Collection
//!
//! Payments live behind an `Arc` so that aggregation workers can read the
//! collection concurrently without copying it. Mutations go through
//! `Arc::make_mut`, which only clones the collection if a worker still holds
//! a reference (for example a progress stream that has not been drained).
//!
//! # Duplicate Handling
//!
//! Records are keyed by identifier. `upsert` replaces the record with the same
//! identifier in place; records are never removed.

use crate::types::{Favorite, Payment};
use std::collections::HashMap;
use std::sync::Arc;

/// Ordered payment collection with an identifier index
#[derive(Debug, Clone, Default)]
pub struct PaymentStore {
    /// Payments in creation order (the shard key for aggregation)
    payments: Arc<Vec<Payment>>,

    /// Map of payment ID to position in `payments`
    index: HashMap<String, usize>,
}

impl PaymentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a payment to the end of the collection
    pub fn push(&mut self, payment: Payment) {
        self.index.insert(payment.id.clone(), self.payments.len());
        Arc::make_mut(&mut self.payments).push(payment);
    }

    pub fn get(&self, id: &str) -> Option<&Payment> {
        self.index.get(id).map(|&pos| &self.payments[pos])
    }

    /// Get a mutable reference to a stored payment
    ///
    /// Used for status transitions and snapshot merges.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Payment> {
        let pos = *self.index.get(id)?;
        Arc::make_mut(&mut self.payments).get_mut(pos)
    }

    /// Replace the payment with the same identifier, or append it
    ///
    /// # Returns
    ///
    /// `true` if the payment was appended
    pub fn upsert(&mut self, payment: Payment) -> bool {
        match self.index.get(&payment.id).copied() {
            Some(pos) => {
                Arc::make_mut(&mut self.payments)[pos] = payment;
                false
            }
            None => {
                self.push(payment);
                true
            }
        }
    }

    /// All payments in creation order
    pub fn as_slice(&self) -> &[Payment] {
        &self.payments
    }

    /// Shared handle to the collection for concurrent readers
    pub(crate) fn shared(&self) -> Arc<Vec<Payment>> {
        Arc::clone(&self.payments)
    }

    pub fn len(&self) -> usize {
        self.payments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payments.is_empty()
    }
}

/// Ordered favorite collection with an identifier index
#[derive(Debug, Clone, Default)]
pub struct FavoriteStore {
    favorites: Vec<Favorite>,
    index: HashMap<String, usize>,
}

impl FavoriteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, favorite: Favorite) {
        self.index.insert(favorite.id.clone(), self.favorites.len());
        self.favorites.push(favorite);
    }

    pub fn get(&self, id: &str) -> Option<&Favorite> {
        self.index.get(id).map(|&pos| &self.favorites[pos])
    }

    /// Replace the favorite with the same identifier, or append it
    ///
    /// # Returns
    ///
    /// `true` if the favorite was appended
    pub fn upsert(&mut self, favorite: Favorite) -> bool {
        match self.index.get(&favorite.id) {
            Some(&pos) => {
                self.favorites[pos] = favorite;
                false
            }
            None => {
                self.push(favorite);
                true
            }
        }
    }

    pub fn as_slice(&self) -> &[Favorite] {
        &self.favorites
    }

    pub fn len(&self) -> usize {
        self.favorites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty()
    }
}
