use anyhow::Result;
use mockall::automock;

/// Sink for human-readable progress messages. Callers treat it as advisory:
/// an error here never changes the outcome of the operation being reported.
#[automock]
pub trait ProgressObserver {
    fn notify(&self, message: &str) -> Result<()>;
}
