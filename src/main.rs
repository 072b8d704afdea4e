//! Wallet ledger CLI
//!
//! Inspects snapshot directories written by [`wallet_ledger::core::Ledger::export`].
//!
//! # Usage
//!
//! ```bash
//! cargo run -- summary ./snapshot
//! cargo run -- summary ./snapshot --workers 8 --chunk-size 50000
//! cargo run -- history ./snapshot --account 3 --out ./history --records-per-file 1000
//! RUST_LOG=debug cargo run -- summary ./snapshot
//! ```
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (malformed snapshot, unknown account, unwritable output, etc.)

use std::process;
use wallet_ledger::cli;

fn main() {
    env_logger::init();

    let args = cli::parse_args();

    let mut output = std::io::stdout();
    if let Err(e) = cli::run(&args, &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
