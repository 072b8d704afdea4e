use crate::core::{AggregationConfig, DEFAULT_PROGRESS_CHUNK_SIZE};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Inspect wallet ledger snapshots
#[derive(Parser, Debug)]
#[command(name = "wallet-ledger")]
#[command(about = "Inspect wallet ledger snapshots", long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Number of aggregation workers and runtime threads
    #[arg(
        long = "workers",
        value_name = "COUNT",
        global = true,
        help = "Number of aggregation workers (default: CPU cores)"
    )]
    pub workers: Option<usize>,

    /// Payments summed per progress chunk
    #[arg(
        long = "chunk-size",
        value_name = "SIZE",
        global = true,
        help = "Payments per progress chunk (default: 100000)"
    )]
    pub chunk_size: Option<usize>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Import a snapshot and print collection counts and payment totals
    Summary {
        /// Directory holding the dump files
        #[arg(value_name = "DIR")]
        dir: PathBuf,
    },

    /// Import a snapshot and write one account's payment history
    History {
        /// Directory holding the dump files
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        #[arg(long = "account", value_name = "ID")]
        account: i64,

        /// Directory the history files are written to
        #[arg(long = "out", value_name = "OUT")]
        out: PathBuf,

        #[arg(long = "records-per-file", value_name = "N", default_value_t = 1000)]
        records_per_file: usize,
    },
}

impl CliArgs {
    /// Worker count, falling back to the number of CPU cores on zero or absence
    pub fn workers(&self) -> usize {
        match self.workers {
            Some(0) => {
                log::warn!(
                    "Invalid workers (0), using default ({})",
                    num_cpus::get()
                );
                num_cpus::get()
            }
            Some(workers) => workers,
            None => num_cpus::get(),
        }
    }

    pub fn to_aggregation_config(&self) -> AggregationConfig {
        AggregationConfig::new(self.chunk_size.unwrap_or(DEFAULT_PROGRESS_CHUNK_SIZE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_summary_parsing() {
        let parsed = CliArgs::try_parse_from(["program", "summary", "snap"]).unwrap();
        assert_eq!(
            parsed.command,
            Command::Summary {
                dir: PathBuf::from("snap")
            }
        );
    }

    #[rstest]
    #[case::default_chunk(&["program", "history", "snap", "--account", "3", "--out", "out"], 1000)]
    #[case::custom_chunk(
        &["program", "history", "snap", "--account", "3", "--out", "out", "--records-per-file", "50"],
        50
    )]
    fn test_history_parsing(#[case] args: &[&str], #[case] expected_records: usize) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(
            parsed.command,
            Command::History {
                dir: PathBuf::from("snap"),
                account: 3,
                out: PathBuf::from("out"),
                records_per_file: expected_records,
            }
        );
    }

    #[rstest]
    #[case::default(&["program", "summary", "snap"], num_cpus::get())]
    #[case::custom(&["program", "summary", "snap", "--workers", "8"], 8)]
    #[case::before_subcommand(&["program", "--workers", "3", "summary", "snap"], 3)]
    #[case::zero_falls_back(&["program", "summary", "snap", "--workers", "0"], num_cpus::get())]
    fn test_workers(#[case] args: &[&str], #[case] expected: usize) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.workers(), expected);
    }

    #[rstest]
    #[case::default(&["program", "summary", "snap"], DEFAULT_PROGRESS_CHUNK_SIZE)]
    #[case::custom(&["program", "summary", "snap", "--chunk-size", "500"], 500)]
    #[case::zero_falls_back(&["program", "summary", "snap", "--chunk-size", "0"], DEFAULT_PROGRESS_CHUNK_SIZE)]
    fn test_aggregation_config(#[case] args: &[&str], #[case] expected: usize) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.to_aggregation_config().progress_chunk_size, expected);
    }

    #[rstest]
    #[case::missing_command(&["program"])]
    #[case::missing_dir(&["program", "summary"])]
    #[case::missing_account(&["program", "history", "snap", "--out", "out"])]
    #[case::non_numeric_account(&["program", "history", "snap", "--account", "x", "--out", "out"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        let result = CliArgs::try_parse_from(args);
        assert!(result.is_err());
    }
}
