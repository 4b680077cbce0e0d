use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    #[default]
    Created,
    EntryCreated,
    Uploaded,
    Processing,
    Ready,
    Failed,
}

impl WorkflowState {
    pub fn is_terminal(self) -> bool {
        matches!(self, WorkflowState::Ready | WorkflowState::Failed)
    }

    /// The only state reachable from `self` on success.
    pub fn next(self) -> Option<WorkflowState> {
        match self {
            WorkflowState::Created => Some(WorkflowState::EntryCreated),
            WorkflowState::EntryCreated => Some(WorkflowState::Uploaded),
            WorkflowState::Uploaded => Some(WorkflowState::Processing),
            WorkflowState::Processing => Some(WorkflowState::Ready),
            WorkflowState::Ready | WorkflowState::Failed => None,
        }
    }

    /// `Failed` is reachable from every non-terminal state; everything else
    /// must follow the linear order.
    pub fn advance(self, to: WorkflowState) -> Result<WorkflowState> {
        if self.is_terminal() {
            bail!("workflow already finished in state {}", self);
        }
        if to == WorkflowState::Failed || self.next() == Some(to) {
            return Ok(to);
        }
        bail!("invalid workflow transition {} -> {}", self, to);
    }
}

impl Display for WorkflowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let workflow_state = match self {
            WorkflowState::Created => "created",
            WorkflowState::EntryCreated => "entry_created",
            WorkflowState::Uploaded => "uploaded",
            WorkflowState::Processing => "processing",
            WorkflowState::Ready => "ready",
            WorkflowState::Failed => "failed",
        };
        write!(f, "{}", workflow_state)
    }
}
