//! Configuration for the filter pipeline.

use std::time::Duration;

use crate::batch::DEFAULT_BATCH_SIZE;

/// Configuration parameters for pipeline runs.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Units geocoded concurrently in the distance stage.
    pub batch_size: usize,

    /// Quiet period before a selection change triggers a run (milliseconds).
    /// Changes inside the window replace each other.
    pub debounce_ms: u64,
}

impl PipelineConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(batch_size: usize, debounce_ms: u64) -> Self {
        Self {
            batch_size,
            debounce_ms,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Returns the debounce window as a Duration.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            debounce_ms: 300,
        }
    }
}
