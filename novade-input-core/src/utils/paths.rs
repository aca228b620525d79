//! XDG Base Directory and Application-Specific Path Resolution.
//!
//! Relies on the `directories-next` crate. Application-specific paths are
//! built from the `QUALIFIER`/`ORGANIZATION`/`APPLICATION` triple shared with
//! the rest of NovaDE, so the input controller's config file lives next to
//! the other NovaDE component configs (e.g. `~/.config/NovaDE/NovaDE`).

use crate::error::{ConfigError, CoreError};
use directories_next::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

const QUALIFIER: &str = "org";
const ORGANIZATION: &str = "NovaDE";
const APPLICATION: &str = "NovaDE";

/// File name of the input controller configuration, both system and user level.
pub const CONFIG_FILE_NAME: &str = "input-controller.toml";

/// Environment variable overriding the system-wide configuration path.
pub const SYSTEM_CONFIG_PATH_ENV: &str = "NOVADE_INPUT_SYSTEM_CONFIG_PATH";

const DEFAULT_SYSTEM_CONFIG_DIR: &str = "/etc/novade";

/// Returns the base directory for user-specific state files.
///
/// On Linux this honours `$XDG_STATE_HOME` and falls back to
/// `~/.local/state`; elsewhere the platform's local data directory is used.
pub fn get_state_base_dir() -> Result<PathBuf, CoreError> {
    BaseDirs::new()
        .map(|dirs| {
            #[cfg(target_os = "linux")]
            {
                match std::env::var("XDG_STATE_HOME") {
                    Ok(state_home) if !state_home.is_empty() => PathBuf::from(state_home),
                    _ => dirs.home_dir().join(".local/state"),
                }
            }
            #[cfg(not(target_os = "linux"))]
            {
                dirs.data_local_dir().to_path_buf()
            }
        })
        .ok_or_else(|| {
            CoreError::Config(ConfigError::DirectoryUnavailable {
                dir_type: "State Base".to_string(),
            })
        })
}

/// Returns the application-specific configuration directory.
///
/// # Errors
/// [`CoreError::Config(ConfigError::DirectoryUnavailable)`] if `ProjectDirs`
/// cannot be initialised (usually: no home directory).
pub fn get_app_config_dir() -> Result<PathBuf, CoreError> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| {
            CoreError::Config(ConfigError::DirectoryUnavailable {
                dir_type: "App Config".to_string(),
            })
        })
}

/// Returns the application-specific state directory (`<state base>/NovaDE/NovaDE`).
pub fn get_app_state_dir() -> Result<PathBuf, CoreError> {
    get_state_base_dir().map(|base_state| base_state.join(ORGANIZATION).join(APPLICATION))
}

/// Path of the user-level input controller configuration file.
pub fn get_user_config_path() -> Result<PathBuf, CoreError> {
    get_app_config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// Path of the system-wide configuration file, honouring [`SYSTEM_CONFIG_PATH_ENV`].
pub fn get_system_config_path() -> PathBuf {
    match std::env::var(SYSTEM_CONFIG_PATH_ENV) {
        Ok(path) if !path.is_empty() => PathBuf::from(path),
        _ => PathBuf::from(DEFAULT_SYSTEM_CONFIG_DIR).join(CONFIG_FILE_NAME),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Helper to assert that a path is absolute and likely valid (non-empty)
    fn assert_is_valid_path(res: Result<PathBuf, CoreError>, dir_type: &str) {
        match res {
            Ok(path) => {
                assert!(path.is_absolute(), "Path for {} is not absolute: {:?}", dir_type, path);
                assert!(!path.as_os_str().is_empty(), "Path for {} is empty", dir_type);
            }
            // CI environments without HOME end up here.
            Err(CoreError::Config(ConfigError::DirectoryUnavailable { .. })) => {}
            Err(e) => panic!("Expected Ok or DirectoryUnavailable for {}, got {:?}", dir_type, e),
        }
    }

    #[test]
    fn test_get_state_base_dir() {
        assert_is_valid_path(get_state_base_dir(), "State Base");
    }

    #[test]
    fn test_get_app_config_dir() {
        assert_is_valid_path(get_app_config_dir(), "App Config");
    }

    #[test]
    fn test_get_app_state_dir() {
        assert_is_valid_path(get_app_state_dir(), "App State");
    }

    #[test]
    fn test_user_config_path_file_name() {
        if let Ok(path) = get_user_config_path() {
            assert_eq!(path.file_name().unwrap(), CONFIG_FILE_NAME);
        }
    }

    #[test]
    fn test_system_config_path_is_absolute() {
        assert!(get_system_config_path().is_absolute() || std::env::var(SYSTEM_CONFIG_PATH_ENV).is_ok());
    }
}
