//! Snapshot export and import
//!
//! Persists the three ledger collections to `accounts.dump`, `payments.dump`
//! and `favorites.dump` inside a directory, and merges them back in.
//!
//! # Import Semantics
//!
//! - A missing file leaves its collection unchanged
//! - Records merge by identifier: existing records are overwritten, new ones
//!   appended, nothing is deleted
//! - Each file is decoded and validated in full before it is applied, so a
//!   failing file changes nothing (files applied before it stay applied)
//! - Files are applied accounts first, so payments and favorites can refer to
//!   accounts from the same snapshot
//!
//! Accounts alone can also be kept in a single `|`-separated file with
//! [`Ledger::export_to_file`] and [`Ledger::import_from_file`].

use crate::core::Ledger;
use crate::io::dump_format::{
    decode_account_list, decode_records, encode_account_list, encode_records,
    numbered_payments_file, DumpRecord, ACCOUNTS_FILE, FAVORITES_FILE, PAYMENTS_FILE,
};
use crate::types::{Account, AccountId, Favorite, LedgerError, Payment, Result};
use log::{debug, info};
use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::Path;

/// Write `records` to `path`, replacing any existing file
///
/// An empty collection writes nothing.
fn write_dump<T: DumpRecord>(path: &Path, records: &[T]) -> Result<()> {
    if records.is_empty() {
        return Ok(());
    }

    let mut content = Vec::new();
    encode_records(records, &mut content)?;
    fs::write(path, content)?;

    debug!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// Read every record of `path`
///
/// Returns `None` if the file does not exist.
fn read_dump<T: DumpRecord>(path: &Path, file: &str) -> Result<Option<Vec<T>>> {
    let input = match File::open(path) {
        Ok(input) => input,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("{} not found, skipping", path.display());
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    decode_records(file, input).map(Some)
}

impl Ledger {
    /// Export all three collections into `dir`
    ///
    /// Stops at the first failing file.
    pub fn export(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        self.export_accounts(dir)?;
        self.export_payments(dir)?;
        self.export_favorites(dir)?;

        info!(
            "Exported {} accounts, {} payments, {} favorites to {}",
            self.registry.len(),
            self.payments.len(),
            self.favorites.len(),
            dir.display()
        );
        Ok(())
    }

    pub fn export_accounts(&self, dir: impl AsRef<Path>) -> Result<()> {
        write_dump(&dir.as_ref().join(ACCOUNTS_FILE), self.registry.accounts())
    }

    pub fn export_payments(&self, dir: impl AsRef<Path>) -> Result<()> {
        write_dump(&dir.as_ref().join(PAYMENTS_FILE), self.payments.as_slice())
    }

    pub fn export_favorites(&self, dir: impl AsRef<Path>) -> Result<()> {
        write_dump(&dir.as_ref().join(FAVORITES_FILE), self.favorites.as_slice())
    }

    /// Merge the snapshot in `dir` into the ledger
    ///
    /// # Errors
    ///
    /// - `ParseError` for a malformed record
    /// - `PhoneAlreadyRegistered` if two accounts would share a phone
    /// - `AccountNotFound` for a payment or favorite whose account is unknown
    /// - `AmountMustBePositive` for a payment or favorite with a non-positive amount
    pub fn import(&mut self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        let accounts = self.import_accounts(dir)?;
        let payments = self.import_payments(dir)?;
        let favorites = self.import_favorites(dir)?;

        info!(
            "Imported {} accounts, {} payments, {} favorites from {}",
            accounts,
            payments,
            favorites,
            dir.display()
        );
        Ok(())
    }

    /// Merge `accounts.dump`, returning the number of records read
    ///
    /// The account id counter moves past the largest imported id.
    pub fn import_accounts(&mut self, dir: impl AsRef<Path>) -> Result<usize> {
        let Some(accounts) =
            read_dump::<Account>(&dir.as_ref().join(ACCOUNTS_FILE), ACCOUNTS_FILE)?
        else {
            return Ok(0);
        };

        self.registry.merge(&accounts)?;
        Ok(accounts.len())
    }

    /// Write every account to a single file as `id;phone;balance` records
    /// separated by `|`
    ///
    /// The file is created even when there are no accounts.
    pub fn export_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut content = Vec::new();
        encode_account_list(self.registry.accounts(), &mut content)?;
        fs::write(path, content)?;

        info!("Exported {} accounts to {}", self.registry.len(), path.display());
        Ok(())
    }

    /// Merge the accounts of a file written by [`Ledger::export_to_file`]
    ///
    /// Returns the number of records read.
    ///
    /// # Errors
    ///
    /// - `IoError` if the file cannot be opened
    /// - `ParseError` for a malformed record
    /// - `PhoneAlreadyRegistered` if two accounts would share a phone
    pub fn import_from_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let input = File::open(path)?;
        let accounts = decode_account_list(&path.display().to_string(), input)?;

        self.registry.merge(&accounts)?;
        info!("Imported {} accounts from {}", accounts.len(), path.display());
        Ok(accounts.len())
    }

    /// Merge `payments.dump`, returning the number of records read
    pub fn import_payments(&mut self, dir: impl AsRef<Path>) -> Result<usize> {
        let Some(payments) =
            read_dump::<Payment>(&dir.as_ref().join(PAYMENTS_FILE), PAYMENTS_FILE)?
        else {
            return Ok(0);
        };

        for payment in &payments {
            self.check_imported(payment.account_id, payment.amount)?;
        }

        let count = payments.len();
        for payment in payments {
            self.payments.upsert(payment);
        }
        Ok(count)
    }

    /// Merge `favorites.dump`, returning the number of records read
    pub fn import_favorites(&mut self, dir: impl AsRef<Path>) -> Result<usize> {
        let Some(favorites) =
            read_dump::<Favorite>(&dir.as_ref().join(FAVORITES_FILE), FAVORITES_FILE)?
        else {
            return Ok(0);
        };

        for favorite in &favorites {
            self.check_imported(favorite.account_id, favorite.amount)?;
        }

        let count = favorites.len();
        for favorite in favorites {
            self.favorites.upsert(favorite);
        }
        Ok(count)
    }

    fn check_imported(&self, account_id: AccountId, amount: i64) -> Result<()> {
        if amount <= 0 {
            return Err(LedgerError::amount_must_be_positive(amount));
        }
        if !self.registry.contains(account_id) {
            return Err(LedgerError::account_not_found(account_id));
        }
        Ok(())
    }

    /// Copies of every payment of an account, in ledger order
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the account does not resolve.
    pub fn export_account_history(&self, account_id: AccountId) -> Result<Vec<Payment>> {
        self.filter_payments_regular(account_id)
    }
}

/// Write a payment history into `dir` in files of at most `records_per_file`
///
/// A history that fits in one file goes to `payments.dump`; a longer one is
/// split into `payments1.dump`, `payments2.dump`, ... in order. An empty
/// history writes nothing.
///
/// # Errors
///
/// - `InvalidChunkSize` if `records_per_file` is zero
/// - `UnsupportedFieldValue` or `IoError` from writing a file
pub fn history_to_files(
    payments: &[Payment],
    dir: impl AsRef<Path>,
    records_per_file: usize,
) -> Result<()> {
    if records_per_file == 0 {
        return Err(LedgerError::InvalidChunkSize {
            records: records_per_file,
        });
    }

    let dir = dir.as_ref();
    if payments.len() <= records_per_file {
        return write_dump(&dir.join(PAYMENTS_FILE), payments);
    }

    for (n, chunk) in payments.chunks(records_per_file).enumerate() {
        write_dump(&dir.join(numbered_payments_file(n + 1)), chunk)?;
    }

    info!(
        "Wrote {} payments to {} files in {}",
        payments.len(),
        payments.len().div_ceil(records_per_file),
        dir.display()
    );
    Ok(())
}
