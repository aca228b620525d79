//! General utilities for the input controller infrastructure.
//!
//! - [`fs`]: filesystem helpers (directory creation, optional file reads).
//! - [`paths`]: XDG base directory and application-specific path resolution.

pub mod fs;
pub mod paths;

pub use fs::{ensure_dir_exists, read_optional_to_string};
