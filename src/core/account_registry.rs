//! Account registry module
//!
//! This module provides the `AccountRegistry` struct which owns every account
//! of a ledger and enforces phone uniqueness.
//!
//! The AccountRegistry is responsible for:
//! - Allocating account identifiers from its own counter
//! - Rejecting duplicate phone numbers
//! - Resolving identifiers through an index
//! - Applying balance changes with checked arithmetic

use crate::types::{Account, AccountId, LedgerError, Money, Phone, Result};
use std::collections::{HashMap, HashSet};

/// Registry of all accounts in registration order
///
/// Accounts are never removed, so positions stored in the index stay valid.
#[derive(Debug, Clone, Default)]
pub struct AccountRegistry {
    /// Accounts in registration (or import) order
    accounts: Vec<Account>,

    /// Map of account ID to position in `accounts`
    index: HashMap<AccountId, usize>,

    /// Last identifier handed out; the next registration uses `last_id + 1`
    last_id: AccountId,
}

impl AccountRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new account for a phone number
    ///
    /// Scans existing accounts for the phone; on a match nothing changes and
    /// `PhoneAlreadyRegistered` is returned. Otherwise a fresh identifier is
    /// allocated and an account with zero balance is appended.
    ///
    /// # Returns
    ///
    /// A reference to the newly created account
    ///
    /// # Errors
    ///
    /// - `PhoneAlreadyRegistered` if another account uses the phone
    /// - `ArithmeticOverflow` if the identifier space is exhausted
    pub fn register(&mut self, phone: impl Into<Phone>) -> Result<&Account> {
        let phone = phone.into();
        if self.find_by_phone(&phone).is_some() {
            return Err(LedgerError::phone_already_registered(&phone));
        }

        let id = self
            .last_id
            .checked_add(1)
            .ok_or_else(|| LedgerError::arithmetic_overflow("register", self.last_id))?;
        self.last_id = id;
        Ok(self.append(Account::new(id, phone)))
    }

    /// Look up an account by identifier
    pub fn find(&self, id: AccountId) -> Result<&Account> {
        self.index
            .get(&id)
            .map(|&pos| &self.accounts[pos])
            .ok_or_else(|| LedgerError::account_not_found(id))
    }

    /// Look up the live account record for mutation
    pub fn find_mut(&mut self, id: AccountId) -> Result<&mut Account> {
        match self.index.get(&id) {
            Some(&pos) => Ok(&mut self.accounts[pos]),
            None => Err(LedgerError::account_not_found(id)),
        }
    }

    pub fn contains(&self, id: AccountId) -> bool {
        self.index.contains_key(&id)
    }

    /// All accounts in registration order
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Add funds to an account
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` if the identifier does not resolve
    /// - `ArithmeticOverflow` if the balance would overflow (account unchanged)
    pub fn credit(&mut self, id: AccountId, amount: Money, operation: &str) -> Result<Money> {
        let account = self.find_mut(id)?;
        let new_balance = account
            .balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow(operation, id))?;

        account.balance = new_balance;
        Ok(new_balance)
    }

    /// Remove funds from an account
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` if the identifier does not resolve
    /// - `NotEnoughBalance` if the balance is below `amount` (account unchanged)
    pub fn debit(&mut self, id: AccountId, amount: Money) -> Result<Money> {
        let account = self.find_mut(id)?;
        if account.balance < amount {
            return Err(LedgerError::not_enough_balance(id, account.balance, amount));
        }

        let new_balance = account
            .balance
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("debit", id))?;

        account.balance = new_balance;
        Ok(new_balance)
    }

    /// Merge accounts restored from a snapshot
    ///
    /// Each account updates the phone and balance of the account with the same
    /// identifier, or is appended if the identifier is unknown. The identifier
    /// counter is advanced past every restored id. Phone uniqueness is checked
    /// once against the merged state, so a snapshot may swap phones between
    /// accounts.
    ///
    /// # Returns
    ///
    /// The number of appended accounts
    ///
    /// # Errors
    ///
    /// Returns `PhoneAlreadyRegistered` if two accounts would share a phone
    /// after the merge; the registry is unchanged in that case.
    pub fn merge(&mut self, accounts: &[Account]) -> Result<usize> {
        let mut staged = self.clone();
        let mut appended = 0;
        for account in accounts {
            if staged.apply(account.clone()) {
                appended += 1;
            }
        }

        staged.check_unique_phones()?;
        *self = staged;
        Ok(appended)
    }

    fn apply(&mut self, account: Account) -> bool {
        self.last_id = self.last_id.max(account.id());

        match self.index.get(&account.id()) {
            Some(&pos) => {
                let existing = &mut self.accounts[pos];
                existing.set_phone(account.phone().to_string());
                existing.balance = account.balance;
                false
            }
            None => {
                self.append(account);
                true
            }
        }
    }

    fn check_unique_phones(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.accounts.len());
        for account in &self.accounts {
            if !seen.insert(account.phone()) {
                return Err(LedgerError::phone_already_registered(account.phone()));
            }
        }
        Ok(())
    }

    fn find_by_phone(&self, phone: &str) -> Option<&Account> {
        self.accounts.iter().find(|account| account.phone() == phone)
    }

    fn append(&mut self, account: Account) -> &Account {
        let pos = self.accounts.len();
        self.index.insert(account.id(), pos);
        self.accounts.push(account);
        &self.accounts[pos]
    }
}
