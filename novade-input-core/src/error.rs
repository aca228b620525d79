//! Error handling for the NovaDE input controller infrastructure.
//!
//! The main error type for this crate is [`CoreError`], which wraps the more
//! specific [`ConfigError`] and [`LoggingError`]. The engine crate
//! (`novade-input-controller`) embeds `CoreError` in its own error enum so a
//! host only ever has to deal with a single error type during bootstrap.
//!
//! # Examples
//!
//! ```rust,ignore
//! use novade_input_core::error::{CoreError, ConfigError};
//!
//! fn check_seat_name(name: &str) -> Result<(), CoreError> {
//!     if name.is_empty() {
//!         return Err(ConfigError::ValidationError("empty seat name".into()).into());
//!     }
//!     Ok(())
//! }
//! ```

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while bootstrapping the input controller.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Configuration could not be loaded or is invalid.
    #[error("Configuration Error: {0}")]
    Config(#[from] ConfigError),

    /// The tracing subscriber could not be installed.
    #[error("Logging Error: {0}")]
    Logging(#[from] LoggingError),

    /// A directory needed for configuration or logs could not be prepared.
    #[error("Filesystem Error: {message} (Path: {path:?})")]
    Filesystem {
        message: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Configuration failures, wrapped by [`CoreError::Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration file exists but could not be read.
    #[error("Failed to read configuration file from {path:?}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Not valid TOML, or does not match the schema.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Parsed, but a value is out of range.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    /// An explicitly named configuration file does not exist.
    #[error("Configuration file not found at expected locations: {locations:?}")]
    NotFound { locations: Vec<PathBuf> },

    /// No XDG base directory could be determined.
    #[error("Could not determine base directory for {dir_type}")]
    DirectoryUnavailable { dir_type: String },
}

/// Logging setup failures, wrapped by [`CoreError::Logging`].
#[derive(Error, Debug)]
pub enum LoggingError {
    /// Bad level in the configuration, or a global subscriber already exists.
    #[error("Failed to initialize logging: {0}")]
    InitializationFailure(String),
}
