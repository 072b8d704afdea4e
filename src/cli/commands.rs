//! Command execution
//!
//! Each command imports a snapshot into a fresh ledger and runs inside a
//! Tokio multi-threaded runtime sized by `--workers`.

use crate::cli::{CliArgs, Command};
use crate::core::Ledger;
use crate::io::history_to_files;
use futures::StreamExt;
use std::io::Write;
use std::path::Path;

/// Run the parsed command, writing its report to `output`
///
/// # Errors
///
/// Returns a message for runtime creation, snapshot or output failures.
pub fn run(args: &CliArgs, output: &mut dyn Write) -> Result<(), String> {
    let workers = args.workers();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(workers)
        .build()
        .map_err(|e| format!("Failed to create tokio runtime: {}", e))?;

    let mut ledger = Ledger::with_config(args.to_aggregation_config());

    runtime.block_on(async {
        match &args.command {
            Command::Summary { dir } => summary(&mut ledger, dir, workers, output).await,
            Command::History {
                dir,
                account,
                out,
                records_per_file,
            } => history(&mut ledger, dir, *account, out, *records_per_file, output),
        }
    })
}

async fn summary(
    ledger: &mut Ledger,
    dir: &Path,
    workers: usize,
    output: &mut dyn Write,
) -> Result<(), String> {
    ledger.import(dir).map_err(|e| e.to_string())?;

    let mut progress: Vec<_> = ledger.sum_payments_with_progress().collect().await;
    progress.sort_by_key(|p| p.part);
    let total = ledger.sum_payments(workers).await;

    write_line(output, format!("accounts: {}", ledger.accounts().len()))?;
    write_line(output, format!("payments: {}", ledger.payments().len()))?;
    write_line(output, format!("favorites: {}", ledger.favorites().len()))?;
    for p in progress {
        write_line(output, format!("chunk {}: {}", p.part, p.partial_sum))?;
    }
    write_line(output, format!("total: {}", total))
}

fn history(
    ledger: &mut Ledger,
    dir: &Path,
    account: i64,
    out: &Path,
    records_per_file: usize,
    output: &mut dyn Write,
) -> Result<(), String> {
    ledger.import(dir).map_err(|e| e.to_string())?;

    let payments = ledger
        .export_account_history(account)
        .map_err(|e| e.to_string())?;
    history_to_files(&payments, out, records_per_file).map_err(|e| e.to_string())?;

    write_line(
        output,
        format!(
            "account {}: {} payments written to {}",
            account,
            payments.len(),
            out.display()
        ),
    )
}

fn write_line(output: &mut dyn Write, line: String) -> Result<(), String> {
    writeln!(output, "{}", line).map_err(|e| format!("Failed to write output: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    fn snapshot() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("accounts.dump"), "1;555-0100;10\n2;555-0101;0\n").unwrap();
        fs::write(
            dir.path().join("payments.dump"),
            "a;1;5;food;OK\nb;2;7;auto;FAIL\nc;1;9;food;INPROGRESS\n",
        )
        .unwrap();
        dir
    }

    fn run_with(args: &[&str]) -> Result<String, String> {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        let mut output = Vec::new();
        run(&parsed, &mut output)?;
        Ok(String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_summary() {
        let dir = snapshot();
        let path = dir.path().to_str().unwrap();

        let output = run_with(&["program", "summary", path, "--workers", "2", "--chunk-size", "2"])
            .unwrap();

        assert_eq!(
            output,
            "accounts: 2\npayments: 3\nfavorites: 0\nchunk 0: 12\nchunk 1: 9\ntotal: 21\n"
        );
    }

    #[test]
    fn test_history() {
        let dir = snapshot();
        let out = TempDir::new().unwrap();

        let output = run_with(&[
            "program",
            "history",
            dir.path().to_str().unwrap(),
            "--account",
            "1",
            "--out",
            out.path().to_str().unwrap(),
            "--records-per-file",
            "1",
        ])
        .unwrap();

        assert!(output.starts_with("account 1: 2 payments written to"));
        assert_eq!(
            fs::read_to_string(out.path().join("payments1.dump")).unwrap(),
            "a;1;5;food;OK\n"
        );
        assert_eq!(
            fs::read_to_string(out.path().join("payments2.dump")).unwrap(),
            "c;1;9;food;INPROGRESS\n"
        );
    }

    #[test]
    fn test_history_unknown_account() {
        let dir = snapshot();
        let out = TempDir::new().unwrap();

        let result = run_with(&[
            "program",
            "history",
            dir.path().to_str().unwrap(),
            "--account",
            "9",
            "--out",
            out.path().to_str().unwrap(),
        ]);

        assert_eq!(result, Err("Account 9 not found".to_string()));
    }

    #[test]
    fn test_summary_malformed_snapshot() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("accounts.dump"), "1;555-0100;ten\n").unwrap();

        let result = run_with(&["program", "summary", dir.path().to_str().unwrap()]);

        assert!(result.unwrap_err().starts_with("Parse error in accounts.dump at line 1"));
    }
}
