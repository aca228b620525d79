//! Configuration Loading.
//!
//! [`ConfigLoader`] locates the system and user TOML files, merges them,
//! deserialises the result into [`CoreConfig`] and validates it.
//!
//! ## Validation
//!
//! - Log level and format are normalised to lowercase and checked against the
//!   supported values.
//! - A relative log `file_path` is resolved against the application state
//!   directory, and the parent directory of the log file is created.
//! - `controller.default_accepted_seat` must not be empty and
//!   `controller.global_version` must be a version this crate implements.

use std::path::{Path, PathBuf};
use toml::Value;

use crate::config::defaults::SUPPORTED_GLOBAL_VERSION;
use crate::config::{ControllerConfig, CoreConfig, LoggingConfig};
use crate::error::{ConfigError, CoreError};
use crate::utils::fs::{ensure_dir_exists, read_optional_to_string};
use crate::utils::paths::{get_app_state_dir, get_system_config_path, get_user_config_path};

/// Namespace for configuration loading.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads the system file, then the user file on top of it, then validates.
    ///
    /// Missing or blank files are skipped; with neither present the defaults are
    /// returned (after validation).
    pub fn load() -> Result<CoreConfig, CoreError> {
        let system_value = Self::read_toml_value(&get_system_config_path())?;
        let user_value = Self::read_toml_value(&get_user_config_path()?)?;

        let merged = Self::merge_toml_values(system_value, user_value);
        let mut config = match merged {
            Some(value) => value.try_into::<CoreConfig>().map_err(ConfigError::ParseError)?,
            None => CoreConfig::default(),
        };

        Self::validate_config(&mut config)?;
        Ok(config)
    }

    /// Loads a single explicit file. Unlike [`Self::load`], a missing file is an error.
    pub fn load_from_path(path: &Path) -> Result<CoreConfig, CoreError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound { locations: vec![path.to_path_buf()] }
            } else {
                ConfigError::ReadError { path: path.to_path_buf(), source: e }
            }
        })?;
        Self::load_from_str(&content)
    }

    /// Parses and validates configuration held in memory.
    pub fn load_from_str(content: &str) -> Result<CoreConfig, CoreError> {
        let mut config: CoreConfig = toml::from_str(content).map_err(ConfigError::ParseError)?;
        Self::validate_config(&mut config)?;
        Ok(config)
    }

    fn read_toml_value(path: &Path) -> Result<Option<Value>, CoreError> {
        let content = read_optional_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        match content {
            Some(text) => {
                let value = text.parse::<Value>().map_err(ConfigError::ParseError)?;
                tracing::debug!("Read configuration layer from {:?}", path);
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Merges two optional TOML values. `override_val` takes precedence.
    fn merge_toml_values(base: Option<Value>, override_val: Option<Value>) -> Option<Value> {
        match (base, override_val) {
            (None, None) => None,
            (Some(b), None) => Some(b),
            (None, Some(o)) => Some(o),
            (Some(Value::Table(mut base_table)), Some(Value::Table(override_table))) => {
                Self::merge_toml_tables(&mut base_table, &override_table);
                Some(Value::Table(base_table))
            }
            (_, Some(o)) => Some(o),
        }
    }

    /// Recursively merges `override_table` into `base_table`.
    fn merge_toml_tables(
        base_table: &mut toml::map::Map<String, Value>,
        override_table: &toml::map::Map<String, Value>,
    ) {
        for (key, override_item) in override_table {
            match base_table.get_mut(key) {
                Some(base_item) => {
                    if let (Value::Table(bt), Value::Table(ot)) = (&mut *base_item, override_item) {
                        Self::merge_toml_tables(bt, ot);
                    } else {
                        *base_item = override_item.clone();
                    }
                }
                None => {
                    base_table.insert(key.clone(), override_item.clone());
                }
            }
        }
    }

    fn validate_config(config: &mut CoreConfig) -> Result<(), CoreError> {
        Self::validate_logging_config(&mut config.logging)?;
        Self::validate_controller_config(&mut config.controller)?;
        Ok(())
    }

    fn validate_logging_config(logging: &mut LoggingConfig) -> Result<(), CoreError> {
        let level_lower = logging.level.to_lowercase();
        match level_lower.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => logging.level = level_lower,
            _ => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log level: '{}'. Must be one of trace, debug, info, warn, error.",
                    logging.level
                ))
                .into());
            }
        }

        let format_lower = logging.format.to_lowercase();
        match format_lower.as_str() {
            "text" | "json" => logging.format = format_lower,
            _ => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log format: '{}'. Must be one of text, json.",
                    logging.format
                ))
                .into());
            }
        }

        if let Some(path) = &logging.file_path {
            let absolute_path: PathBuf = if path.is_absolute() {
                path.clone()
            } else {
                get_app_state_dir()?.join(path)
            };
            if let Some(parent_dir) = absolute_path.parent() {
                if !parent_dir.as_os_str().is_empty() {
                    ensure_dir_exists(parent_dir)?;
                }
            }
            logging.file_path = Some(absolute_path);
        }
        Ok(())
    }

    fn validate_controller_config(controller: &mut ControllerConfig) -> Result<(), CoreError> {
        let trimmed = controller.default_accepted_seat.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::ValidationError(
                "controller.default_accepted_seat must not be empty.".to_string(),
            )
            .into());
        }
        controller.default_accepted_seat = trimmed.to_string();

        if controller.global_version != SUPPORTED_GLOBAL_VERSION {
            return Err(ConfigError::ValidationError(format!(
                "Unsupported controller.global_version {}; only version {} is implemented.",
                controller.global_version, SUPPORTED_GLOBAL_VERSION
            ))
            .into());
        }
        Ok(())
    }
}
