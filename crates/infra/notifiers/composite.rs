use std::sync::Arc;

use anyhow::{Result, anyhow};

use crate::domain::repositories::progress_observer::ProgressObserver;

/// Fans one message out to several observers. Every observer is tried even
/// when an earlier one fails.
#[derive(Clone, Default)]
pub struct CompositeProgressObserver {
    observers: Vec<Arc<dyn ProgressObserver + Send + Sync>>,
}

impl CompositeProgressObserver {
    pub fn new(observers: Vec<Arc<dyn ProgressObserver + Send + Sync>>) -> Self {
        Self { observers }
    }

    pub fn push(&mut self, observer: Arc<dyn ProgressObserver + Send + Sync>) {
        self.observers.push(observer);
    }
}

impl ProgressObserver for CompositeProgressObserver {
    fn notify(&self, message: &str) -> Result<()> {
        let failures = self
            .observers
            .iter()
            .filter_map(|observer| observer.notify(message).err())
            .map(|err| err.to_string())
            .collect::<Vec<_>>();

        if failures.is_empty() {
            return Ok(());
        }

        Err(anyhow!(
            "{} progress observer(s) failed: {}",
            failures.len(),
            failures.join("; ")
        ))
    }
}
