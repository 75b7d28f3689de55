use crate::error::{Error, Result};
use crate::storage::batch::item::TransferItem;
use serde::Serialize;

/// Terminal state of one item in a batch.
#[derive(Debug)]
pub enum OutcomeStatus {
    Succeeded,
    /// The transfer or its existence check returned an error.
    Failed(Error),
    /// The destination already existed and `skip_if_exists` was set.
    Skipped,
    /// The batch deadline elapsed before the item was started.
    DeadlineExceeded,
    /// The item was never picked up by a worker.
    NotAttempted,
}

impl OutcomeStatus {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Succeeded => "succeeded",
            Self::Failed(_) => "failed",
            Self::Skipped => "skipped",
            Self::DeadlineExceeded => "deadline_exceeded",
            Self::NotAttempted => "not_attempted",
        }
    }

    /// Skipped items are neither successes nor failures.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::Failed(_) | Self::DeadlineExceeded | Self::NotAttempted
        )
    }
}

#[derive(Debug)]
pub struct TransferOutcome {
    item: TransferItem,
    status: OutcomeStatus,
}

impl TransferOutcome {
    pub fn new(item: TransferItem, status: OutcomeStatus) -> Self {
        Self { item, status }
    }

    pub fn item(&self) -> &TransferItem {
        &self.item
    }

    pub fn status(&self) -> &OutcomeStatus {
        &self.status
    }

    pub fn succeeded(&self) -> bool {
        matches!(self.status, OutcomeStatus::Succeeded)
    }

    pub fn error(&self) -> Option<&Error> {
        match &self.status {
            OutcomeStatus::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn into_parts(self) -> (TransferItem, OutcomeStatus) {
        (self.item, self.status)
    }
}

/// Outcomes of a batch, index-aligned with the submitted items.
#[derive(Debug, Default)]
pub struct BatchResult {
    outcomes: Vec<TransferOutcome>,
}

impl BatchResult {
    pub(crate) fn new(outcomes: Vec<TransferOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn outcomes(&self) -> &[TransferOutcome] {
        &self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TransferOutcome> {
        self.outcomes.iter()
    }

    pub fn into_outcomes(self) -> Vec<TransferOutcome> {
        self.outcomes
    }

    /// True when no item failed. Skipped items do not count as failures.
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|o| !o.status.is_failure())
    }

    pub fn summary(&self) -> BatchSummary {
        let mut summary = BatchSummary {
            total: self.outcomes.len(),
            ..Default::default()
        };
        for outcome in &self.outcomes {
            match outcome.status {
                OutcomeStatus::Succeeded => summary.succeeded += 1,
                OutcomeStatus::Failed(_) => summary.failed += 1,
                OutcomeStatus::Skipped => summary.skipped += 1,
                OutcomeStatus::DeadlineExceeded => summary.deadline_exceeded += 1,
                OutcomeStatus::NotAttempted => summary.not_attempted += 1,
            }
        }
        summary
    }

    /// Printable view of the batch, with errors rendered as messages.
    pub fn report(&self) -> BatchReport {
        BatchReport {
            summary: self.summary(),
            items: self
                .outcomes
                .iter()
                .map(|o| OutcomeReport {
                    source: o.item.source().to_string(),
                    destination: o.item.destination().to_string(),
                    status: o.status.name(),
                    error: o.error().map(|e| e.to_string()),
                })
                .collect(),
        }
    }
}

impl IntoIterator for BatchResult {
    type Item = TransferOutcome;
    type IntoIter = std::vec::IntoIter<TransferOutcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.into_iter()
    }
}

impl<'a> IntoIterator for &'a BatchResult {
    type Item = &'a TransferOutcome;
    type IntoIter = std::slice::Iter<'a, TransferOutcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.iter()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub deadline_exceeded: usize,
    pub not_attempted: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutcomeReport {
    pub source: String,
    pub destination: String,
    pub status: &'static str,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub summary: BatchSummary,
    pub items: Vec<OutcomeReport>,
}

impl BatchReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
