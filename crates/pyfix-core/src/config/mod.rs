//! Configuration system for pyfix
//!
//! This module provides:
//! - TOML (`pyfix.toml`) and JSON (`.pyfixrc.json`) configuration files
//! - Auto-discovery by traversing up directories
//! - Strong typing with serde
//!
//! ## Configuration Discovery
//!
//! When no explicit config path is provided, pyfix searches for configuration
//! files starting from the current directory and moving up the directory tree
//! until a config is found or the filesystem root is reached. No config file
//! at all is fine: every section has defaults.
//!
//! ## Example Configuration
//!
//! ```toml
//! [fixers]
//! select = ["apply"]
//! ignore = []
//!
//! [files]
//! include = ["src/**/*.py"]
//! exclude = ["**/vendored/**"]
//!
//! [write]
//! backups = false
//! validateOutput = true
//! ```

mod loader;
mod pyfix_config;

pub use loader::ConfigLoader;
pub use pyfix_config::{
    FilesConfiguration, FixersConfiguration, PyfixConfig, WriteConfiguration,
};
