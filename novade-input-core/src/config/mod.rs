//! Configuration Management for the NovaDE input controller.
//!
//! - [`types`]: the schema ([`CoreConfig`], [`LoggingConfig`], [`ControllerConfig`]).
//! - [`defaults`]: default values used by `serde` when fields are missing.
//! - [`loader`]: [`ConfigLoader`], which locates, merges, parses and validates
//!   the TOML files.
//!
//! ## Loading process
//!
//! 1. The system file (`/etc/novade/input-controller.toml`, or the path in
//!    `NOVADE_INPUT_SYSTEM_CONFIG_PATH`) and the user file
//!    (`<XDG config>/NovaDE/NovaDE/input-controller.toml`) are read if present.
//! 2. Their TOML tables are merged recursively; user values win.
//! 3. The merged value is deserialised into [`CoreConfig`]; with no file at
//!    all the defaults are used.
//! 4. The result is validated and normalised.
//!
//! # Examples
//!
//! ```rust,ignore
//! use novade_input_core::config::ConfigLoader;
//!
//! match ConfigLoader::load() {
//!     Ok(config) => println!("default seat: {}", config.controller.default_accepted_seat),
//!     Err(e) => {
//!         novade_input_core::logging::init_minimal_logging();
//!         tracing::error!("Configuration loading failed: {}", e);
//!     }
//! }
//! ```

pub mod defaults;
pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{ControllerConfig, CoreConfig, LoggingConfig};
