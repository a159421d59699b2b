//! Core types for the gifpick GIF picker.
//!
//! This crate contains shared data structures used across all gifpick crates:
//! - `SearchResult` and `Query` for remote searches
//! - Picker configuration and config file loading
//! - Error types

mod config;
mod error;
mod gif;

pub use config::{
    config_dir, config_path, ConfigFile, EmptyQueryPolicy, KeyBindingConfig, PickerConfig,
    API_KEY_ENV, CONFIG_PATH_ENV, DEFAULT_ENDPOINT, DEFAULT_PLACEHOLDER, DEFAULT_TIMEOUT,
};
pub use error::{ConfigError, SearchError};
pub use gif::{Query, SearchResult};
