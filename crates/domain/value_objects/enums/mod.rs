pub mod video_statuses;
