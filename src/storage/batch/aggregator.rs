use crate::storage::batch::item::TransferItem;
use crate::storage::batch::outcome::{BatchResult, OutcomeStatus, TransferOutcome};
use tokio::sync::Mutex;

/// One write-once slot per submitted item, indexed by submission order.
pub(crate) struct ResultSlots {
    slots: Mutex<Vec<Option<TransferOutcome>>>,
}

impl ResultSlots {
    pub(crate) fn new(len: usize) -> Self {
        let mut slots = Vec::with_capacity(len);
        slots.resize_with(len, || None);
        Self {
            slots: Mutex::new(slots),
        }
    }

    /// Store `outcome` at `index`. Returns false if the slot was already written.
    pub(crate) async fn record(&self, index: usize, outcome: TransferOutcome) -> bool {
        let mut slots = self.slots.lock().await;
        let len = slots.len();
        let Some(slot) = slots.get_mut(index) else {
            log::error!("outcome index {index} out of range ({len} slots)");
            return false;
        };
        if slot.is_some() {
            log::warn!("outcome for item {index} already recorded, ignoring duplicate");
            return false;
        }
        *slot = Some(outcome);
        true
    }

    /// Assemble the final result in submission order. Slots nobody wrote are
    /// filled as `NotAttempted` so the result never has a gap.
    pub(crate) async fn finish(&self, items: &[TransferItem]) -> BatchResult {
        let slots = std::mem::take(&mut *self.slots.lock().await);
        let outcomes = slots
            .into_iter()
            .zip(items)
            .enumerate()
            .map(|(index, (slot, item))| {
                slot.unwrap_or_else(|| {
                    log::warn!("item {index} produced no outcome, marking as not attempted");
                    TransferOutcome::new(item.clone(), OutcomeStatus::NotAttempted)
                })
            })
            .collect();
        BatchResult::new(outcomes)
    }
}
