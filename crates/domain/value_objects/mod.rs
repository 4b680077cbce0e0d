pub mod enums;
pub mod processing_statuses;
pub mod upload_requests;
pub mod video_links;
pub mod workflow_states;
