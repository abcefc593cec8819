pub mod app_settings;
pub mod app_state;
pub mod history;
pub mod live;
pub mod messages;
pub mod network;
