//! Configuration management for plumb

mod file;

// Re-export main types
pub use file::{Config, DEFAULT_BUILD_FILE_NAME, DEFAULT_PROPERTIES_FILE_NAME, DEFAULT_SETTINGS_FILE_NAME};
