//! Configuration data structures.
//!
//! These structs are populated by deserialising TOML. Missing fields fall back
//! to [`super::defaults`], and unknown fields are rejected via
//! `#[serde(deny_unknown_fields)]` so a typo in a key does not silently
//! revert a setting to its default.

use super::defaults;
use serde::Deserialize;
use std::path::PathBuf;

/// Configuration settings for the logging subsystem.
///
/// # Examples
///
/// ```
/// use novade_input_core::config::LoggingConfig;
/// use std::path::PathBuf;
///
/// let toml_str = r#"
/// level = "debug"
/// file_path = "/var/log/novade/input-controller.log"
/// format = "json"
/// "#;
/// let log_config: LoggingConfig = toml::from_str(toml_str).unwrap();
/// assert_eq!(log_config.level, "debug");
/// assert_eq!(log_config.file_path, Some(PathBuf::from("/var/log/novade/input-controller.log")));
/// assert_eq!(log_config.format, "json");
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Minimum level: "trace", "debug", "info", "warn" or "error" (case-insensitive).
    #[serde(default = "defaults::default_log_level")]
    pub level: String,
    /// Optional log file. Relative paths are resolved against the state directory.
    #[serde(default = "defaults::default_log_file_path")]
    pub file_path: Option<PathBuf>,
    /// "text" or "json".
    #[serde(default = "defaults::default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        defaults::default_logging_config()
    }
}

/// Settings for the input focus and acceptance engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControllerConfig {
    /// Seat name that every newly created surface accepts.
    #[serde(default = "defaults::default_accepted_seat")]
    pub default_accepted_seat: String,
    /// Version advertised by the `ivi_input` global.
    #[serde(default = "defaults::default_global_version")]
    pub global_version: u32,
    /// Whether seats get exclusive device ownership claims installed.
    #[serde(default = "defaults::default_claim_devices")]
    pub claim_devices: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        defaults::default_controller_config()
    }
}

/// Root configuration structure.
///
/// ```
/// use novade_input_core::config::CoreConfig;
///
/// let loaded: CoreConfig = toml::from_str(r#"
/// [controller]
/// claim_devices = false
/// "#).unwrap();
/// assert!(!loaded.controller.claim_devices);
/// assert_eq!(loaded.controller.default_accepted_seat, "default");
/// assert_eq!(loaded.logging.level, "info");
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoreConfig {
    #[serde(default = "defaults::default_logging_config")]
    pub logging: LoggingConfig,
    #[serde(default = "defaults::default_controller_config")]
    pub controller: ControllerConfig,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            logging: defaults::default_logging_config(),
            controller: defaults::default_controller_config(),
        }
    }
}
