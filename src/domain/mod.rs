// Domain layer - Watchboard data model
pub mod config_document;
pub mod dashboard;
pub mod status;
pub mod ui_state;
