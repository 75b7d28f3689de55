// Concurrent batch transfers over a bounded worker pool
use crate::error::Result;
use std::future::Future;

mod aggregator;
mod dispatcher;
mod item;
mod options;
mod outcome;

pub use dispatcher::Dispatcher;
pub use item::{ItemOptions, TransferItem, collect_upload_items};
pub use options::BatchConfig;
pub use outcome::{
    BatchReport, BatchResult, BatchSummary, OutcomeReport, OutcomeStatus, TransferOutcome,
};

/// A single-item transfer primitive driven by the [`Dispatcher`].
///
/// Implementations are called concurrently from several workers, each with a
/// different item, and must not share mutable state between calls. Retries,
/// if any, belong inside `transfer`.
pub trait Transfer: Send + Sync + 'static {
    /// Whether the item's destination is already present.
    fn exists(&self, item: &TransferItem) -> impl Future<Output = Result<bool>> + Send;

    /// Move one item from its source to its destination.
    fn transfer(&self, item: &TransferItem) -> impl Future<Output = Result<()>> + Send;
}
