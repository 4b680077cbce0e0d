pub mod composite;
pub mod discord;
pub mod log;
