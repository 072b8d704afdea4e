//! Partitioned concurrent aggregation over the payment collection
//!
//! This module extends [`Ledger`] with read-only sum and filter operations.
//! Every operation has a sequential `*_regular` form, which is the reference
//! result, and a partitioned form that fans out over Tokio tasks.
//!
//! # Design
//!
//! The payment collection is split into `workers` contiguous shards of
//! `ceil(N / workers)` payments (the last shards may be short or empty).
//! One task is spawned per shard. Each task scans its shard into a local
//! partial result and then takes the shared accumulator lock exactly once to
//! combine it. The caller awaits every task handle before reading the
//! accumulator.
//!
//! ```text
//! payments: [ shard 0 | shard 1 | ... | shard w-1 ]
//!               |         |               |
//!             task 0    task 1   ...    task w-1      (tokio::spawn)
//!               \         |               /
//!                Arc<Mutex<accumulator>>              (one lock per task)
//! ```
//!
//! Tasks hold an `Arc` of the collection plus an index range, so no payment
//! is copied except into filter results. Because these methods borrow the
//! ledger immutably, the collection cannot change while a call is running.
//!
//! # Runtime
//!
//! Partitioned methods spawn onto the ambient Tokio runtime and must be
//! awaited from inside one (a multi-threaded runtime gives real parallelism).

use crate::core::ledger::Ledger;
use crate::types::{AccountId, Money, Payment, Result};
use futures::channel::mpsc;
use futures::Stream;
use log::{debug, warn};
use std::ops::Range;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Number of payments summed per task by [`Ledger::sum_payments_with_progress`]
pub const DEFAULT_PROGRESS_CHUNK_SIZE: usize = 100_000;

/// Configuration for aggregation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AggregationConfig {
    /// Number of payments per progress chunk
    pub progress_chunk_size: usize,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            progress_chunk_size: DEFAULT_PROGRESS_CHUNK_SIZE,
        }
    }
}

impl AggregationConfig {
    /// Create a new AggregationConfig, falling back to the default chunk size on zero
    pub fn new(progress_chunk_size: usize) -> Self {
        let progress_chunk_size = if progress_chunk_size == 0 {
            warn!(
                "Invalid progress_chunk_size ({}), using default ({})",
                progress_chunk_size, DEFAULT_PROGRESS_CHUNK_SIZE
            );
            DEFAULT_PROGRESS_CHUNK_SIZE
        } else {
            progress_chunk_size
        };

        Self {
            progress_chunk_size,
        }
    }
}

/// Partial sum reported by one progress chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Zero-based chunk index
    pub part: usize,

    /// Sum of the payment amounts in the chunk
    pub partial_sum: Money,
}

/// Split `len` items into `workers` contiguous ranges of `ceil(len / workers)`
///
/// Always returns exactly `workers` ranges; trailing ranges may be empty.
pub fn shard_ranges(len: usize, workers: usize) -> Vec<Range<usize>> {
    let size = len.div_ceil(workers.max(1));
    (0..workers)
        .map(|shard| {
            let start = (shard * size).min(len);
            let end = (start + size).min(len);
            start..end
        })
        .collect()
}

/// Two's-complement sum of the payment amounts
///
/// Wrapping addition is associative and commutative, so any partition of the
/// collection combines to the same total as the sequential sum.
fn sum_amounts(payments: &[Payment]) -> Money {
    payments
        .iter()
        .fold(0, |sum: Money, payment| sum.wrapping_add(payment.amount))
}

/// Wait for every worker task (the join barrier)
///
/// Workers only read and add, so a failure here means the caller-supplied
/// predicate panicked or the runtime is shutting down.
///
/// # Panics
///
/// Resumes a worker panic on the calling task, and panics if a worker was
/// cancelled, so a partial result is never returned.
async fn join_workers(tasks: Vec<JoinHandle<()>>) {
    for task in tasks {
        if let Err(e) = task.await {
            if e.is_panic() {
                std::panic::resume_unwind(e.into_panic());
            }
            panic!("Aggregation worker cancelled before completing: {}", e);
        }
    }
}

impl Ledger {
    /// Sum all payment amounts sequentially
    ///
    /// Failed payments are included. A total beyond the `Money` range wraps.
    pub fn sum_payments_regular(&self) -> Money {
        sum_amounts(self.payments.as_slice())
    }

    /// Sum all payment amounts with `workers` concurrent tasks
    ///
    /// With `workers <= 1` this is [`Ledger::sum_payments_regular`]. The result
    /// is always identical to the sequential sum, including when it wraps.
    pub async fn sum_payments(&self, workers: usize) -> Money {
        if workers <= 1 {
            return self.sum_payments_regular();
        }

        let payments = self.payments.shared();
        let total = Arc::new(Mutex::new(0 as Money));

        let mut tasks = Vec::with_capacity(workers);
        for range in shard_ranges(payments.len(), workers) {
            let payments = Arc::clone(&payments);
            let total = Arc::clone(&total);
            tasks.push(tokio::spawn(async move {
                let partial = sum_amounts(&payments[range]);
                let mut total = total.lock().await;
                *total = total.wrapping_add(partial);
            }));
        }

        join_workers(tasks).await;

        let sum = *total.lock().await;
        debug!("Summed {} payments with {} workers: {}", payments.len(), workers, sum);
        sum
    }

    /// Copies of every payment owned by an account, in ledger order
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the account does not resolve.
    pub fn filter_payments_regular(&self, account_id: AccountId) -> Result<Vec<Payment>> {
        self.registry.find(account_id)?;
        Ok(self.filter_payments_by_fn_regular(|payment| payment.account_id == account_id))
    }

    /// Copies of every payment owned by an account, selected by `workers` tasks
    ///
    /// The result holds the same payments as
    /// [`Ledger::filter_payments_regular`], in shard completion order.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the account does not resolve.
    pub async fn filter_payments(
        &self,
        account_id: AccountId,
        workers: usize,
    ) -> Result<Vec<Payment>> {
        if workers <= 1 {
            return self.filter_payments_regular(account_id);
        }

        self.registry.find(account_id)?;
        Ok(self
            .filter_partitioned(
                Arc::new(move |payment: &Payment| payment.account_id == account_id),
                workers,
            )
            .await)
    }

    /// Copies of every payment matching `predicate`, in ledger order
    pub fn filter_payments_by_fn_regular<F>(&self, predicate: F) -> Vec<Payment>
    where
        F: Fn(&Payment) -> bool,
    {
        self.payments
            .as_slice()
            .iter()
            .filter(|&payment| predicate(payment))
            .cloned()
            .collect()
    }

    /// Copies of every payment matching `predicate`, selected by `workers` tasks
    ///
    /// No account check is made. The predicate is shared by all tasks.
    pub async fn filter_payments_by_fn<F>(&self, predicate: F, workers: usize) -> Vec<Payment>
    where
        F: Fn(&Payment) -> bool + Send + Sync + 'static,
    {
        if workers <= 1 {
            return self.filter_payments_by_fn_regular(predicate);
        }

        self.filter_partitioned(Arc::new(predicate), workers).await
    }

    async fn filter_partitioned<F>(&self, predicate: Arc<F>, workers: usize) -> Vec<Payment>
    where
        F: Fn(&Payment) -> bool + Send + Sync + 'static,
    {
        let payments = self.payments.shared();
        let selected = Arc::new(Mutex::new(Vec::new()));

        let mut tasks = Vec::with_capacity(workers);
        for range in shard_ranges(payments.len(), workers) {
            let payments = Arc::clone(&payments);
            let selected = Arc::clone(&selected);
            let predicate = Arc::clone(&predicate);
            tasks.push(tokio::spawn(async move {
                let matches: Vec<Payment> = payments[range]
                    .iter()
                    .filter(|&payment| (*predicate)(payment))
                    .cloned()
                    .collect();
                selected.lock().await.extend(matches);
            }));
        }

        join_workers(tasks).await;

        let result = std::mem::take(&mut *selected.lock().await);
        debug!(
            "Filtered {} of {} payments with {} workers",
            result.len(),
            payments.len(),
            workers
        );
        result
    }

    /// Sum payments chunk by chunk, reporting each chunk as it completes
    ///
    /// The collection is split into chunks of `progress_chunk_size` payments
    /// and one task is spawned per chunk. Each task publishes a single
    /// [`Progress`] message. Messages arrive in completion order, not chunk
    /// order. The stream ends once every chunk has reported; an empty ledger
    /// yields an empty stream.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn sum_payments_with_progress(&self) -> impl Stream<Item = Progress> + Send + 'static {
        let (sender, receiver) = mpsc::unbounded();
        let payments = self.payments.shared();
        let size = self.config.progress_chunk_size;
        let parts = payments.len().div_ceil(size);

        for part in 0..parts {
            let payments = Arc::clone(&payments);
            let sender = sender.clone();
            tokio::spawn(async move {
                let start = part * size;
                let end = (start + size).min(payments.len());
                let partial_sum = sum_amounts(&payments[start..end]);
                if sender
                    .unbounded_send(Progress { part, partial_sum })
                    .is_err()
                {
                    debug!("Progress receiver dropped before part {} reported", part);
                }
            });
        }

        // Each task owns a sender clone; the stream closes when the last one drops
        receiver
    }
}
