use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VideoStatus {
    #[default]
    Pending,
    Transcoding,
    Available,
    Error,
}

impl Display for VideoStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let video_status = match self {
            VideoStatus::Pending => "pending",
            VideoStatus::Transcoding => "transcoding",
            VideoStatus::Available => "available",
            VideoStatus::Error => "error",
        };
        write!(f, "{}", video_status)
    }
}
