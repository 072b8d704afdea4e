//! Error types for the wallet ledger
//!
//! This module defines all error types that can occur in ledger operations,
//! aggregation and snapshot persistence.
//!
//! # Error Categories
//!
//! - **Lookup Errors**: account, payment or favorite identifier does not resolve
//! - **Validation Errors**: duplicate phone, non-positive amount, insufficient balance
//! - **Integrity Errors**: orphaned payment, double reversal, arithmetic overflow
//! - **Snapshot Errors**: I/O failures, malformed records, unsupported field values

use super::account::{AccountId, Money};
use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Main error type for the wallet ledger
///
/// Every ledger operation returns its error to the immediate caller.
/// Validation happens before any mutation, so a returned error means the
/// ledger is unchanged (snapshot import is applied per file, see `io::snapshot`).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// Another account already uses this phone number
    #[error("Phone {phone} is already registered")]
    PhoneAlreadyRegistered {
        /// The duplicated phone
        phone: String,
    },

    #[error("Account {account} not found")]
    AccountNotFound { account: AccountId },

    /// Deposit or payment amount is zero or negative
    #[error("Amount must be greater than zero, got {amount}")]
    AmountMustBePositive { amount: Money },

    /// Payment amount exceeds the account balance
    #[error("Not enough balance on account {account}: balance {balance}, requested {requested}")]
    NotEnoughBalance {
        account: AccountId,
        balance: Money,
        requested: Money,
    },

    #[error("Payment {payment} not found")]
    PaymentNotFound { payment: String },

    #[error("Favorite {favorite} not found")]
    FavoriteNotFound { favorite: String },

    /// The payment has already been reversed
    ///
    /// A second reversal would refund the amount twice.
    #[error("Payment {payment} is already rejected")]
    AlreadyRejected { payment: String },

    /// A stored payment references an account that no longer resolves
    ///
    /// This is a data-integrity failure, not a user error.
    #[error("Payment {payment} references missing account {account}")]
    OrphanedPayment { payment: String, account: AccountId },

    /// Balance arithmetic would overflow
    #[error("Arithmetic overflow in {operation} for account {account}")]
    ArithmeticOverflow {
        operation: String,
        account: AccountId,
    },

    /// I/O error occurred while reading or writing snapshot files
    #[error("I/O error: {message}")]
    IoError { message: String },

    /// Snapshot record could not be decoded
    #[error("Parse error in {file}{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// File name the record was read from
        file: String,
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        message: String,
    },

    /// A field value contains the snapshot delimiter or a line break
    ///
    /// The snapshot format defines no escaping, so such values are refused
    /// instead of being written in a form that would not read back.
    #[error("Unsupported value {value:?} for field {field}: contains a delimiter or line break")]
    UnsupportedFieldValue { field: String, value: String },

    /// History files need at least one record per file
    #[error("Records per file must be greater than zero, got {records}")]
    InvalidChunkSize { records: usize },
}

impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::IoError {
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl LedgerError {
    pub fn phone_already_registered(phone: &str) -> Self {
        LedgerError::PhoneAlreadyRegistered {
            phone: phone.to_string(),
        }
    }

    pub fn account_not_found(account: AccountId) -> Self {
        LedgerError::AccountNotFound { account }
    }

    pub fn amount_must_be_positive(amount: Money) -> Self {
        LedgerError::AmountMustBePositive { amount }
    }

    pub fn not_enough_balance(account: AccountId, balance: Money, requested: Money) -> Self {
        LedgerError::NotEnoughBalance {
            account,
            balance,
            requested,
        }
    }

    pub fn payment_not_found(payment: &str) -> Self {
        LedgerError::PaymentNotFound {
            payment: payment.to_string(),
        }
    }

    pub fn favorite_not_found(favorite: &str) -> Self {
        LedgerError::FavoriteNotFound {
            favorite: favorite.to_string(),
        }
    }

    pub fn already_rejected(payment: &str) -> Self {
        LedgerError::AlreadyRejected {
            payment: payment.to_string(),
        }
    }

    pub fn orphaned_payment(payment: &str, account: AccountId) -> Self {
        LedgerError::OrphanedPayment {
            payment: payment.to_string(),
            account,
        }
    }

    pub fn arithmetic_overflow(operation: &str, account: AccountId) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
            account,
        }
    }

    /// Create a ParseError from a csv error, keeping its line position
    pub fn parse(file: &str, error: &csv::Error) -> Self {
        LedgerError::ParseError {
            file: file.to_string(),
            line: error.position().map(|pos| pos.line()),
            message: error.to_string(),
        }
    }

    pub fn unsupported_field_value(field: &str, value: &str) -> Self {
        LedgerError::UnsupportedFieldValue {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::phone_registered(
        LedgerError::PhoneAlreadyRegistered { phone: "555-0100".to_string() },
        "Phone 555-0100 is already registered"
    )]
    #[case::account_not_found(
        LedgerError::AccountNotFound { account: 42 },
        "Account 42 not found"
    )]
    #[case::amount_must_be_positive(
        LedgerError::AmountMustBePositive { amount: -5 },
        "Amount must be greater than zero, got -5"
    )]
    #[case::not_enough_balance(
        LedgerError::NotEnoughBalance { account: 1, balance: 700, requested: 10000 },
        "Not enough balance on account 1: balance 700, requested 10000"
    )]
    #[case::already_rejected(
        LedgerError::AlreadyRejected { payment: "p-1".to_string() },
        "Payment p-1 is already rejected"
    )]
    #[case::parse_error_with_line(
        LedgerError::ParseError { file: "accounts.dump".to_string(), line: Some(3), message: "invalid digit".to_string() },
        "Parse error in accounts.dump at line 3: invalid digit"
    )]
    #[case::parse_error_without_line(
        LedgerError::ParseError { file: "payments.dump".to_string(), line: None, message: "invalid digit".to_string() },
        "Parse error in payments.dump: invalid digit"
    )]
    #[case::invalid_chunk_size(
        LedgerError::InvalidChunkSize { records: 0 },
        "Records per file must be greater than zero, got 0"
    )]
    fn test_error_display(#[case] error: LedgerError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::payment_not_found(
        LedgerError::payment_not_found("p-9"),
        LedgerError::PaymentNotFound { payment: "p-9".to_string() }
    )]
    #[case::orphaned_payment(
        LedgerError::orphaned_payment("p-1", 3),
        LedgerError::OrphanedPayment { payment: "p-1".to_string(), account: 3 }
    )]
    #[case::unsupported_field_value(
        LedgerError::unsupported_field_value("category", "a;b"),
        LedgerError::UnsupportedFieldValue { field: "category".to_string(), value: "a;b".to_string() }
    )]
    fn test_helper_functions(#[case] result: LedgerError, #[case] expected: LedgerError) {
        assert_eq!(result, expected);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: LedgerError = io_error.into();
        assert!(matches!(error, LedgerError::IoError { .. }));
        assert_eq!(error.to_string(), "I/O error: Permission denied");
    }
}
