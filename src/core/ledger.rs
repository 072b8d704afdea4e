//! Payment ledger
//!
//! This module provides the `Ledger` that owns the account registry, the
//! payment and favorite stores, and the identifier generator, and exposes
//! every balance-changing operation.
//!
//! The ledger enforces business rules such as:
//! - Amounts must be strictly positive
//! - A payment never exceeds the account balance
//! - A payment is reversed at most once
//! - Validation happens before any mutation, so a failed call changes nothing
//!
//! All payments, including repeats and favorite payments, are created by
//! [`Ledger::pay`].

use crate::core::account_registry::AccountRegistry;
use crate::core::aggregation::AggregationConfig;
use crate::core::payment_store::{FavoriteStore, PaymentStore};
use crate::core::traits::{IdGenerator, UuidGenerator};
use crate::types::{
    Account, AccountId, Favorite, LedgerError, Money, Payment, PaymentCategory, PaymentStatus,
    Phone, Result,
};
use log::{debug, warn};

/// In-memory wallet ledger
///
/// Each instance is fully independent: identifiers are produced by the
/// ledger's own counter and generator. Mutating operations take `&mut self`;
/// aggregation takes `&self`, so a ledger cannot be mutated while an
/// aggregation call is borrowing it.
#[derive(Debug)]
pub struct Ledger {
    pub(crate) registry: AccountRegistry,
    pub(crate) payments: PaymentStore,
    pub(crate) favorites: FavoriteStore,
    pub(crate) config: AggregationConfig,
    ids: Box<dyn IdGenerator>,
}

impl Ledger {
    /// Create an empty ledger with default configuration and UUID identifiers
    pub fn new() -> Self {
        Self::with_config(AggregationConfig::default())
    }

    /// Create an empty ledger with a custom aggregation configuration
    pub fn with_config(config: AggregationConfig) -> Self {
        Ledger {
            registry: AccountRegistry::new(),
            payments: PaymentStore::new(),
            favorites: FavoriteStore::new(),
            config,
            ids: Box::new(UuidGenerator),
        }
    }

    /// Replace the generator used for payment and favorite identifiers
    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn config(&self) -> &AggregationConfig {
        &self.config
    }

    /// Register a new account for a phone number
    ///
    /// # Errors
    ///
    /// Returns `PhoneAlreadyRegistered` if another account uses the phone;
    /// no account is created in that case.
    pub fn register_account(&mut self, phone: impl Into<Phone>) -> Result<Account> {
        let account = self.registry.register(phone)?.clone();
        debug!("Registered account {} for phone {}", account.id(), account.phone());
        Ok(account)
    }

    pub fn find_account_by_id(&self, id: AccountId) -> Result<&Account> {
        self.registry.find(id)
    }

    /// Look up the live account record
    ///
    /// Changes made through the returned reference are visible to the ledger.
    pub fn find_account_by_id_mut(&mut self, id: AccountId) -> Result<&mut Account> {
        self.registry.find_mut(id)
    }

    /// All accounts in registration order
    pub fn accounts(&self) -> &[Account] {
        self.registry.accounts()
    }

    /// All payments in creation order
    pub fn payments(&self) -> &[Payment] {
        self.payments.as_slice()
    }

    /// All favorites in creation order
    pub fn favorites(&self) -> &[Favorite] {
        self.favorites.as_slice()
    }

    /// Deposit funds into an account
    ///
    /// No payment record is created.
    ///
    /// # Errors
    ///
    /// - `AmountMustBePositive` if `amount <= 0`
    /// - `AccountNotFound` if the account does not resolve
    /// - `ArithmeticOverflow` if the balance would overflow
    pub fn deposit(&mut self, account_id: AccountId, amount: Money) -> Result<()> {
        if amount <= 0 {
            return Err(LedgerError::amount_must_be_positive(amount));
        }

        let balance = self.registry.credit(account_id, amount, "deposit")?;
        debug!("Deposited {} to account {} (balance {})", amount, account_id, balance);
        Ok(())
    }

    /// Pay from an account
    ///
    /// Debits the account and appends a new `InProgress` payment.
    ///
    /// # Errors
    ///
    /// - `AmountMustBePositive` if `amount <= 0`
    /// - `AccountNotFound` if the account does not resolve
    /// - `NotEnoughBalance` if the balance is below `amount`
    pub fn pay(
        &mut self,
        account_id: AccountId,
        amount: Money,
        category: impl Into<PaymentCategory>,
    ) -> Result<Payment> {
        if amount <= 0 {
            return Err(LedgerError::amount_must_be_positive(amount));
        }

        let balance = self.registry.debit(account_id, amount)?;

        let payment = Payment {
            id: self.ids.next_id(),
            account_id,
            amount,
            category: category.into(),
            status: PaymentStatus::InProgress,
        };
        self.payments.push(payment.clone());

        debug!(
            "Payment {} of {} from account {} (balance {})",
            payment.id, amount, account_id, balance
        );
        Ok(payment)
    }

    pub fn find_payment_by_id(&self, id: &str) -> Result<&Payment> {
        self.payments
            .get(id)
            .ok_or_else(|| LedgerError::payment_not_found(id))
    }

    /// Reverse a payment and refund its amount
    ///
    /// # Errors
    ///
    /// - `PaymentNotFound` if the payment does not resolve
    /// - `AlreadyRejected` if the payment is already `Failed`
    /// - `OrphanedPayment` if the owning account is missing
    pub fn reject(&mut self, payment_id: &str) -> Result<()> {
        let payment = self.find_payment_by_id(payment_id)?;
        if payment.status == PaymentStatus::Failed {
            warn!("Payment {} is already rejected", payment_id);
            return Err(LedgerError::already_rejected(payment_id));
        }

        let (account_id, amount) = (payment.account_id, payment.amount);
        if !self.registry.contains(account_id) {
            return Err(LedgerError::orphaned_payment(payment_id, account_id));
        }

        let balance = self.registry.credit(account_id, amount, "reject")?;
        if let Some(payment) = self.payments.get_mut(payment_id) {
            payment.status = PaymentStatus::Failed;
        }

        debug!(
            "Rejected payment {} and refunded {} to account {} (balance {})",
            payment_id, amount, account_id, balance
        );
        Ok(())
    }

    /// Create a new payment with the same account, amount and category
    ///
    /// The source payment's status is not checked and the source is left
    /// untouched.
    pub fn repeat(&mut self, payment_id: &str) -> Result<Payment> {
        let source = self.find_payment_by_id(payment_id)?;
        let (account_id, amount, category) =
            (source.account_id, source.amount, source.category.clone());

        self.pay(account_id, amount, category)
    }

    /// Save a payment as a named favorite template
    pub fn favorite_payment(&mut self, payment_id: &str, name: impl Into<String>) -> Result<Favorite> {
        let source = self.find_payment_by_id(payment_id)?;
        let (account_id, amount, category) =
            (source.account_id, source.amount, source.category.clone());

        let favorite = Favorite {
            id: self.ids.next_id(),
            account_id,
            name: name.into(),
            amount,
            category,
        };
        self.favorites.push(favorite.clone());

        debug!("Favorite {} created from payment {}", favorite.id, payment_id);
        Ok(favorite)
    }

    pub fn find_favorite_by_id(&self, id: &str) -> Result<&Favorite> {
        self.favorites
            .get(id)
            .ok_or_else(|| LedgerError::favorite_not_found(id))
    }

    /// Pay using the amount and category stored in a favorite
    pub fn pay_from_favorite(&mut self, favorite_id: &str) -> Result<Payment> {
        let favorite = self.find_favorite_by_id(favorite_id)?;
        let (account_id, amount, category) =
            (favorite.account_id, favorite.amount, favorite.category.clone());

        self.pay(account_id, amount, category)
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}
