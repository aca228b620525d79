//! Default configuration values.
//!
//! Used by `serde`'s `default` attribute in [`super::types`] to fill in
//! fields that are absent from the configuration file.

use crate::config::{ControllerConfig, LoggingConfig};
use std::path::PathBuf;

/// Seat name every newly created surface accepts.
pub const DEFAULT_ACCEPTED_SEAT: &str = "default";

/// Only version of the `ivi_input` global this controller implements.
pub const SUPPORTED_GLOBAL_VERSION: u32 = 1;

pub(super) fn default_logging_config() -> LoggingConfig {
    LoggingConfig {
        level: default_log_level(),
        file_path: default_log_file_path(),
        format: default_log_format(),
    }
}

pub(super) fn default_log_level() -> String {
    "info".to_string()
}

pub(super) fn default_log_file_path() -> Option<PathBuf> {
    None // No log file by default
}

pub(super) fn default_log_format() -> String {
    "text".to_string()
}

pub(super) fn default_controller_config() -> ControllerConfig {
    ControllerConfig {
        default_accepted_seat: default_accepted_seat(),
        global_version: default_global_version(),
        claim_devices: default_claim_devices(),
    }
}

pub(super) fn default_accepted_seat() -> String {
    DEFAULT_ACCEPTED_SEAT.to_string()
}

pub(super) fn default_global_version() -> u32 {
    SUPPORTED_GLOBAL_VERSION
}

pub(super) fn default_claim_devices() -> bool {
    true
}
