use crate::error::{InvalidConfigSnafu, Result};
use crate::storage::constants::DEFAULT_MAX_WORKERS;
use snafu::ensure;
use std::time::Duration;

/// Per-batch settings, read-only while the batch runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    /// Upper bound on transfers in flight at once.
    pub max_workers: usize,
    /// Wall-clock budget measured from batch start. Items not started
    /// before it elapses are reported as deadline exceeded.
    pub deadline: Option<Duration>,
    /// Stop dispatching on the first failure and return it as an error.
    pub raise_on_failure: bool,
    /// Skip items whose destination already exists.
    pub skip_if_exists: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_workers: DEFAULT_MAX_WORKERS,
            deadline: None,
            raise_on_failure: false,
            skip_if_exists: false,
        }
    }
}

impl BatchConfig {
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_raise_on_failure(mut self, raise_on_failure: bool) -> Self {
        self.raise_on_failure = raise_on_failure;
        self
    }

    pub fn with_skip_if_exists(mut self, skip_if_exists: bool) -> Self {
        self.skip_if_exists = skip_if_exists;
        self
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.max_workers > 0,
            InvalidConfigSnafu {
                reason: "max_workers must be greater than zero"
            }
        );
        Ok(())
    }
}
