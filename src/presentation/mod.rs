// Presentation layer - Page location, URL fragment state and view models
pub mod editor;
pub mod hash_state;
pub mod index_page;
pub mod location;
pub mod view;
pub mod watch_command;
