use crate::error::{BatchAbortedSnafu, Error, InvalidConfigSnafu, Result};
use crate::storage::batch::Transfer;
use crate::storage::batch::aggregator::ResultSlots;
use crate::storage::batch::item::TransferItem;
use crate::storage::batch::options::BatchConfig;
use crate::storage::batch::outcome::{BatchResult, OutcomeStatus, TransferOutcome};
use snafu::{IntoError, ensure};
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tokio::time::Instant;

/// Runs a batch of items through a [`Transfer`] on a bounded pool of worker tasks.
///
/// Workers pull item indices from a shared queue until it is empty, the
/// deadline has passed, or a failure has tripped the abort flag. The batch
/// call always waits for in-flight transfers to finish before returning, so
/// no transfer outlives it.
pub struct Dispatcher<T> {
    transfer: Arc<T>,
    config: BatchConfig,
}

impl<T: Transfer> Dispatcher<T> {
    pub fn new(transfer: Arc<T>, config: BatchConfig) -> Self {
        Self { transfer, config }
    }

    pub async fn run(&self, items: Vec<TransferItem>) -> Result<BatchResult> {
        self.config.validate()?;
        validate_items(&items)?;
        if items.is_empty() {
            return Ok(BatchResult::default());
        }

        let started = Instant::now();
        let worker_count = self.config.max_workers.min(items.len());
        log::info!(
            "batch started items={} workers={} deadline={:?} raise_on_failure={} skip_if_exists={}",
            items.len(),
            worker_count,
            self.config.deadline,
            self.config.raise_on_failure,
            self.config.skip_if_exists
        );

        let state = Arc::new(BatchState {
            transfer: self.transfer.clone(),
            pending: Mutex::new((0..items.len()).collect()),
            slots: ResultSlots::new(items.len()),
            items,
            aborted: AtomicBool::new(false),
            first_failure: Mutex::new(None),
            deadline: self.config.deadline.map(|d| started + d),
            skip_if_exists: self.config.skip_if_exists,
            raise_on_failure: self.config.raise_on_failure,
        });

        let mut workers = JoinSet::new();
        for worker_id in 0..worker_count {
            let state = state.clone();
            workers.spawn(async move { state.work(worker_id).await });
        }
        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                log::error!("batch worker terminated abnormally: {e}");
            }
        }

        let leftover: Vec<usize> = state.pending.lock().await.drain(..).collect();

        if let Some((index, err)) = state.first_failure.lock().await.take() {
            return Err(state.abort_error(index, err, leftover));
        }

        if !leftover.is_empty() {
            let deadline_elapsed = state.deadline.is_some_and(|d| Instant::now() >= d);
            log::warn!(
                "{} item(s) not started{}",
                leftover.len(),
                if deadline_elapsed { " before deadline" } else { "" }
            );
            for index in leftover {
                let status = if deadline_elapsed {
                    OutcomeStatus::DeadlineExceeded
                } else {
                    OutcomeStatus::NotAttempted
                };
                let outcome = TransferOutcome::new(state.items[index].clone(), status);
                state.slots.record(index, outcome).await;
            }
        }

        let result = state.slots.finish(&state.items).await;
        let summary = result.summary();
        log::info!(
            "batch finished in {:?}: succeeded={} failed={} skipped={} deadline_exceeded={} not_attempted={}",
            started.elapsed(),
            summary.succeeded,
            summary.failed,
            summary.skipped,
            summary.deadline_exceeded,
            summary.not_attempted
        );
        Ok(result)
    }
}

fn validate_items(items: &[TransferItem]) -> Result<()> {
    for (index, item) in items.iter().enumerate() {
        ensure!(
            !item.source().is_empty() && !item.destination().is_empty(),
            InvalidConfigSnafu {
                reason: format!("item {index} has an empty source or destination"),
            }
        );
        ensure!(
            item.options().chunk_size != Some(0),
            InvalidConfigSnafu {
                reason: format!("item {index} has a zero chunk size"),
            }
        );
    }
    Ok(())
}

/// State shared by all workers of one batch.
struct BatchState<T> {
    transfer: Arc<T>,
    items: Vec<TransferItem>,
    pending: Mutex<VecDeque<usize>>,
    slots: ResultSlots,
    aborted: AtomicBool,
    first_failure: Mutex<Option<(usize, Error)>>,
    deadline: Option<Instant>,
    skip_if_exists: bool,
    raise_on_failure: bool,
}

impl<T: Transfer> BatchState<T> {
    async fn work(&self, worker_id: usize) {
        while let Some(index) = self.next_index().await {
            let item = &self.items[index];
            log::debug!(
                "worker {worker_id} picked item {index}: {} -> {}",
                item.source(),
                item.destination()
            );

            let status = match self.process(item).await {
                OutcomeStatus::Failed(err) => {
                    log::warn!(
                        "item {index} failed: {} -> {}: {err}",
                        item.source(),
                        item.destination()
                    );
                    if self.raise_on_failure {
                        self.trip(index, err).await;
                        break;
                    }
                    OutcomeStatus::Failed(err)
                }
                status => status,
            };

            self.slots
                .record(index, TransferOutcome::new(item.clone(), status))
                .await;
        }
        log::debug!("worker {worker_id} exiting");
    }

    /// Pop the next pending index, unless the batch is aborted or out of time.
    async fn next_index(&self) -> Option<usize> {
        let mut pending = self.pending.lock().await;
        if self.aborted.load(Ordering::Acquire) {
            return None;
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return None;
        }
        pending.pop_front()
    }

    async fn process(&self, item: &TransferItem) -> OutcomeStatus {
        if self.skip_if_exists {
            match self.transfer.exists(item).await {
                Ok(true) => return OutcomeStatus::Skipped,
                Ok(false) => {}
                Err(e) => return OutcomeStatus::Failed(e),
            }
        }
        match self.transfer.transfer(item).await {
            Ok(()) => OutcomeStatus::Succeeded,
            Err(e) => OutcomeStatus::Failed(e),
        }
    }

    /// Keep the first failure and stop further dispatch. Later failures of
    /// items already in flight are only logged.
    async fn trip(&self, index: usize, err: Error) {
        let mut first = self.first_failure.lock().await;
        if first.is_none() {
            *first = Some((index, err));
        }
        self.aborted.store(true, Ordering::Release);
    }

    fn abort_error(&self, index: usize, err: Error, mut not_attempted: Vec<usize>) -> Error {
        not_attempted.sort_unstable();
        let item = &self.items[index];
        log::error!(
            "batch aborted by item {index}, {} item(s) not attempted",
            not_attempted.len()
        );
        BatchAbortedSnafu {
            index,
            source_ref: item.source(),
            destination_ref: item.destination(),
            not_attempted,
        }
        .into_error(Box::new(err))
    }
}
