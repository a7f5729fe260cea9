//! GCodeVM Settings Crate
//!
//! Loads and saves the machine configuration as JSON or TOML.

pub mod config;
pub mod error;

pub use config::{Config, APP_DIR, CONFIG_FILE};
pub use error::{SettingsError, SettingsResult};
