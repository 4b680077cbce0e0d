use anyhow::Result;
use tracing::info;

use crate::domain::repositories::progress_observer::ProgressObserver;

/// Writes progress messages into the regular log stream.
#[derive(Debug, Clone)]
pub struct LogProgressObserver {
    label: String,
}

impl LogProgressObserver {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl ProgressObserver for LogProgressObserver {
    fn notify(&self, message: &str) -> Result<()> {
        info!(label = %self.label, progress = %message, "progress update");
        Ok(())
    }
}
