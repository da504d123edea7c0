//! Configuration loading.
//!
//! A TOML file holds named profiles (one per vault), the `[export]` exclusion
//! rules and logging settings. Comma-separated rule lists are split here so
//! the export engine only ever sees finished lists.

pub mod loader;
pub mod types;

pub use loader::{ConfigError, ConfigLoader, default_config_path};
pub use types::{ExportSettings, LoggingConfig, ResolvedConfig, split_list};
