pub mod progress_observer;
pub mod video_hosting;
