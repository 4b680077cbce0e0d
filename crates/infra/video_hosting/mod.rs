pub mod vimeo;
