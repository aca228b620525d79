//! # NovaDE Input Core (`novade-input-core`)
//!
//! Foundational infrastructure for the NovaDE input controller:
//!
//! - **Error Handling**: [`CoreError`] and the more specific [`ConfigError`]
//!   and [`LoggingError`].
//! - **Configuration Management**: TOML configuration layered from a system and
//!   a user file, loaded and validated by [`ConfigLoader`].
//! - **Logging**: `tracing` subscribers for console and rotating file output.
//! - **Utilities**: XDG path resolution and small filesystem helpers.
//!
//! ```rust,ignore
//! use novade_input_core::{ConfigLoader, CoreError, init_logging};
//!
//! fn main() -> Result<(), CoreError> {
//!     let config = ConfigLoader::load()?;
//!     init_logging(&config.logging, false)?;
//!     tracing::info!("input controller configuration loaded");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod utils;

pub use config::{ConfigLoader, ControllerConfig, CoreConfig, LoggingConfig};
pub use error::{ConfigError, CoreError, LoggingError};
pub use logging::{init_logging, init_minimal_logging};
