//! MangoView Settings Crate
//!
//! Handles viewer configuration: defaults, validation and file persistence.

pub mod config;
pub mod error;

pub use config::{Config, LoggingSettings, OverlaySettings, PageSettings, SelectionSettings};
pub use error::{ConfigError, SettingsError, SettingsResult};
