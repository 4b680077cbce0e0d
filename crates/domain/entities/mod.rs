pub mod remote_videos;
