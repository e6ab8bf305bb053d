// Application layer - Use cases driving the dashboard client
pub mod config_editor;
pub mod dashboard_list_service;
pub mod error;
pub mod status_poller;
pub mod watchboard_api;
