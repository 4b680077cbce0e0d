use serde::{Deserialize, Serialize};

use super::enums::video_statuses::VideoStatus;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingStatus {
    pub status: VideoStatus,
    pub transcode_complete: bool,
    /// 0..=100 when the host reports it.
    pub progress_percent: Option<u8>,
    pub error_message: Option<String>,
}

impl ProcessingStatus {
    pub fn is_ready(&self) -> bool {
        self.status == VideoStatus::Available && self.transcode_complete
    }

    pub fn is_failed(&self) -> bool {
        self.status == VideoStatus::Error
    }
}
