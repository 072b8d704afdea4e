//! Dump file format handling
//!
//! This module centralizes all snapshot format concerns:
//! - File names for each entity kind
//! - csv reader/writer configuration (`;` delimiter, no header, no quoting)
//! - Record encoding with field validation
//! - Record decoding with line-numbered parse errors
//!
//! Encoding and decoding are pure (they work on any `Read`/`Write`) for easy testing.
//!
//! # Format
//!
//! One record per line, fields separated by `;`, in the field order of the
//! record struct. There is no escaping, so text fields containing `;` or a
//! line break are refused on encode.

use crate::types::{Account, Favorite, LedgerError, Payment, Result};
use csv::{QuoteStyle, ReaderBuilder, Terminator, WriterBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{Read, Write};

pub const ACCOUNTS_FILE: &str = "accounts.dump";
pub const PAYMENTS_FILE: &str = "payments.dump";
pub const FAVORITES_FILE: &str = "favorites.dump";

/// Field delimiter
pub const DELIMITER: u8 = b';';

/// Record terminator of the three-file snapshot
pub const LINE_TERMINATOR: u8 = b'\n';

/// Record separator of the single-file account list
pub const LIST_SEPARATOR: u8 = b'|';

/// Record written as one dump line
///
/// Exposes the free-text fields that must not contain the delimiter.
pub trait DumpRecord: Serialize + DeserializeOwned {
    /// Named free-text fields of the record
    fn text_fields(&self) -> Vec<(&'static str, &str)>;
}

impl DumpRecord for Account {
    fn text_fields(&self) -> Vec<(&'static str, &str)> {
        vec![("phone", self.phone())]
    }
}

impl DumpRecord for Payment {
    fn text_fields(&self) -> Vec<(&'static str, &str)> {
        vec![("id", &self.id), ("category", &self.category)]
    }
}

impl DumpRecord for Favorite {
    fn text_fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("id", &self.id),
            ("name", &self.name),
            ("category", &self.category),
        ]
    }
}

/// Name of the `n`-th history file when a history is split (1-based)
pub fn numbered_payments_file(n: usize) -> String {
    format!("payments{}.dump", n)
}

fn check_fields<T: DumpRecord>(record: &T, terminator: u8) -> Result<()> {
    let terminator = char::from(terminator);
    for (field, value) in record.text_fields() {
        if value.contains(|c: char| matches!(c, ';' | '\n' | '\r') || c == terminator) {
            return Err(LedgerError::unsupported_field_value(field, value));
        }
    }
    Ok(())
}

/// Encode records as dump lines
///
/// Every record is validated before anything is written, so an unsupported
/// value leaves `output` untouched.
///
/// # Errors
///
/// - `UnsupportedFieldValue` if a text field contains `;` or a line break
/// - `IoError` if writing fails
pub fn encode_records<T: DumpRecord, W: Write>(records: &[T], output: W) -> Result<()> {
    encode_terminated(records, output, LINE_TERMINATOR)
}

/// Encode accounts as a single `|`-separated list with no trailing separator
///
/// # Errors
///
/// - `UnsupportedFieldValue` if a phone contains `;`, `|` or a line break
/// - `IoError` if writing fails
pub fn encode_account_list<W: Write>(accounts: &[Account], mut output: W) -> Result<()> {
    let mut content = Vec::new();
    encode_terminated(accounts, &mut content, LIST_SEPARATOR)?;
    if content.last() == Some(&LIST_SEPARATOR) {
        content.pop();
    }

    output.write_all(&content)?;
    Ok(())
}

fn encode_terminated<T: DumpRecord, W: Write>(
    records: &[T],
    output: W,
    terminator: u8,
) -> Result<()> {
    for record in records {
        check_fields(record, terminator)?;
    }

    let mut writer = WriterBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(terminator))
        .from_writer(output);

    for record in records {
        writer.serialize(record).map_err(|e| LedgerError::IoError {
            message: e.to_string(),
        })?;
    }

    writer.flush()?;
    Ok(())
}

/// Decode dump lines into records
///
/// Blank lines are skipped and a trailing newline is optional.
///
/// # Arguments
///
/// * `file` - File name used in error messages
/// * `input` - Reader over the dump content
///
/// # Errors
///
/// Returns `ParseError` (with the line number) for the first record with a
/// malformed number, an unknown status or a wrong field count.
pub fn decode_records<T: DumpRecord, R: Read>(file: &str, input: R) -> Result<Vec<T>> {
    decode_terminated(file, input, Terminator::CRLF)
}

/// Decode a `|`-separated account list
///
/// Empty records (including a trailing separator) are skipped.
pub fn decode_account_list<R: Read>(file: &str, input: R) -> Result<Vec<Account>> {
    decode_terminated(file, input, Terminator::Any(LIST_SEPARATOR))
}

fn decode_terminated<T: DumpRecord, R: Read>(
    file: &str,
    input: R,
    terminator: Terminator,
) -> Result<Vec<T>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .quoting(false)
        .terminator(terminator)
        .from_reader(input);

    reader
        .deserialize::<T>()
        .map(|record| record.map_err(|e| LedgerError::parse(file, &e)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PaymentStatus;
    use rstest::rstest;

    fn payment(id: &str, category: &str, status: PaymentStatus) -> Payment {
        Payment {
            id: id.to_string(),
            account_id: 2,
            amount: 300,
            category: category.to_string(),
            status,
        }
    }

    fn encode<T: DumpRecord>(records: &[T]) -> Result<String> {
        let mut output = Vec::new();
        encode_records(records, &mut output)?;
        Ok(String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_encode_accounts() {
        let accounts = vec![
            Account::with_balance(1, "555-0100", 700),
            Account::with_balance(2, "555-0101", -3),
        ];

        assert_eq!(
            encode(&accounts).unwrap(),
            "1;555-0100;700\n2;555-0101;-3\n"
        );
    }

    #[rstest]
    #[case::ok(PaymentStatus::Ok, "p1;2;300;food;OK\n")]
    #[case::failed(PaymentStatus::Failed, "p1;2;300;food;FAIL\n")]
    #[case::in_progress(PaymentStatus::InProgress, "p1;2;300;food;INPROGRESS\n")]
    fn test_encode_payment_status(#[case] status: PaymentStatus, #[case] expected: &str) {
        assert_eq!(encode(&[payment("p1", "food", status)]).unwrap(), expected);
    }

    #[test]
    fn test_encode_favorites() {
        let favorites = vec![Favorite {
            id: "f1".to_string(),
            account_id: 4,
            name: "Lunch".to_string(),
            amount: 12,
            category: "food".to_string(),
        }];

        assert_eq!(encode(&favorites).unwrap(), "f1;4;Lunch;12;food\n");
    }

    #[rstest]
    #[case::delimiter("fo;od")]
    #[case::newline("fo\nod")]
    #[case::carriage_return("fo\rod")]
    fn test_encode_refuses_unsupported_values(#[case] category: &str) {
        let records = vec![
            payment("p1", "fine", PaymentStatus::Ok),
            payment("p2", category, PaymentStatus::Ok),
        ];
        let mut output = Vec::new();

        let result = encode_records(&records, &mut output);

        assert_eq!(
            result.unwrap_err(),
            LedgerError::UnsupportedFieldValue {
                field: "category".to_string(),
                value: category.to_string()
            }
        );
        assert!(output.is_empty());
    }

    #[rstest]
    #[case::trailing_newline("1;555-0100;700\n2;555-0101;0\n")]
    #[case::no_trailing_newline("1;555-0100;700\n2;555-0101;0")]
    #[case::blank_lines("1;555-0100;700\n\n2;555-0101;0\n\n")]
    fn test_decode_accounts(#[case] content: &str) {
        let accounts: Vec<Account> = decode_records(ACCOUNTS_FILE, content.as_bytes()).unwrap();

        assert_eq!(
            accounts,
            vec![
                Account::with_balance(1, "555-0100", 700),
                Account::with_balance(2, "555-0101", 0),
            ]
        );
    }

    #[test]
    fn test_decode_payments() {
        let content = "p1;2;300;food;OK\np2;2;300;;INPROGRESS\n";
        let payments: Vec<Payment> = decode_records(PAYMENTS_FILE, content.as_bytes()).unwrap();

        assert_eq!(
            payments,
            vec![
                payment("p1", "food", PaymentStatus::Ok),
                payment("p2", "", PaymentStatus::InProgress),
            ]
        );
    }

    #[rstest]
    #[case::malformed_balance("1;555-0100;7x0\n", Some(1))]
    #[case::malformed_id("1;555-0100;700\nabc;555-0101;0\n", Some(2))]
    #[case::missing_field("1;555-0100\n", Some(1))]
    fn test_decode_accounts_errors(#[case] content: &str, #[case] line: Option<u64>) {
        let result: Result<Vec<Account>> = decode_records(ACCOUNTS_FILE, content.as_bytes());

        match result {
            Err(LedgerError::ParseError { file, line: got, .. }) => {
                assert_eq!(file, ACCOUNTS_FILE);
                assert_eq!(got, line);
            }
            other => panic!("Expected ParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_unknown_status_fails() {
        let result: Result<Vec<Payment>> =
            decode_records(PAYMENTS_FILE, "p1;2;300;food;DONE\n".as_bytes());
        assert!(matches!(result, Err(LedgerError::ParseError { .. })));
    }

    #[test]
    fn test_encode_account_list() {
        let accounts = vec![
            Account::with_balance(1, "555-0100", 700),
            Account::with_balance(2, "555-0101", 0),
        ];
        let mut output = Vec::new();

        encode_account_list(&accounts, &mut output).unwrap();

        assert_eq!(output, b"1;555-0100;700|2;555-0101;0");
    }

    #[test]
    fn test_encode_account_list_refuses_separator() {
        let accounts = vec![Account::with_balance(1, "555|0100", 0)];
        let mut output = Vec::new();

        let result = encode_account_list(&accounts, &mut output);

        assert_eq!(
            result.unwrap_err(),
            LedgerError::unsupported_field_value("phone", "555|0100")
        );
        assert!(output.is_empty());
    }

    #[rstest]
    #[case::no_trailing_separator("1;555-0100;700|2;555-0101;0")]
    #[case::trailing_separator("1;555-0100;700|2;555-0101;0|")]
    fn test_decode_account_list(#[case] content: &str) {
        let accounts = decode_account_list("accounts.list", content.as_bytes()).unwrap();

        assert_eq!(
            accounts,
            vec![
                Account::with_balance(1, "555-0100", 700),
                Account::with_balance(2, "555-0101", 0),
            ]
        );
    }

    #[test]
    fn test_decode_account_list_malformed_balance() {
        let result = decode_account_list("accounts.list", "1;555-0100;7OO".as_bytes());
        assert!(matches!(result, Err(LedgerError::ParseError { .. })));
    }

    #[test]
    fn test_numbered_payments_file() {
        assert_eq!(numbered_payments_file(1), "payments1.dump");
        assert_eq!(numbered_payments_file(12), "payments12.dump");
    }
}
