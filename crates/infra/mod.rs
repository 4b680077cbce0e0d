pub mod notifiers;
pub mod video_hosting;
