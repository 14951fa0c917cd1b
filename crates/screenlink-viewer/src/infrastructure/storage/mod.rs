//! Persistence for the viewer configuration.

pub mod config_file;

pub use config_file::{load_config, save_config, ConfigError};
