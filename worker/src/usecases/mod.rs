pub mod video_upload_workflow;
