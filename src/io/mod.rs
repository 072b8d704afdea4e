//! Snapshot persistence
//!
//! # Components
//!
//! - `dump_format` - Dump file names and record encoding/decoding
//! - `snapshot` - Export/import of the ledger collections and history files

pub mod dump_format;
pub mod snapshot;

pub use dump_format::{ACCOUNTS_FILE, FAVORITES_FILE, PAYMENTS_FILE};
pub use snapshot::history_to_files;
