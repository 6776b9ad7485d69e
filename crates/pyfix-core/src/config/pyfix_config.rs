//! Configuration types for pyfix

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::{PyfixError, Result};

/// Top-level configuration with optional sections
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PyfixConfig {
    /// Which fixers run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixers: Option<FixersConfiguration>,

    /// Which files are processed when a directory is given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<FilesConfiguration>,

    /// How results are written back
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write: Option<WriteConfiguration>,
}

/// Fixer selection
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FixersConfiguration {
    /// Fixers to run; all registered fixers when absent or empty
    pub select: Option<Vec<String>>,

    /// Fixers to skip, applied after `select`
    pub ignore: Option<Vec<String>>,
}

/// File discovery patterns
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilesConfiguration {
    /// Glob patterns to include
    pub include: Option<Vec<String>>,

    /// Glob patterns to exclude
    pub exclude: Option<Vec<String>>,
}

/// Write-back behavior
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WriteConfiguration {
    /// Keep a `.bak` copy of every rewritten file
    pub backups: Option<bool>,

    /// Re-parse rewritten output and reject it when it no longer parses
    pub validate_output: Option<bool>,
}

impl Default for FilesConfiguration {
    fn default() -> Self {
        Self {
            include: Some(vec!["**/*.py".to_string()]),
            exclude: Some(vec![
                "**/.git/**".to_string(),
                "**/__pycache__/**".to_string(),
                "**/.venv/**".to_string(),
                "**/venv/**".to_string(),
                "**/.tox/**".to_string(),
            ]),
        }
    }
}

impl Default for WriteConfiguration {
    fn default() -> Self {
        Self {
            backups: Some(true),
            validate_output: Some(true),
        }
    }
}

impl PyfixConfig {
    /// Load configuration from file
    ///
    /// The format follows the extension: `.toml` or `.json`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| PyfixError::io_error(path, e))?;
        let ext = path.extension().and_then(|e| e.to_str());

        match ext {
            Some("toml") => toml::from_str(&content).map_err(|e| {
                PyfixError::config_error(format!("Invalid TOML in '{}': {e}", path.display()))
            }),
            Some("json") => serde_json::from_str(&content).map_err(|e| {
                PyfixError::config_error(format!("Invalid JSON in '{}': {e}", path.display()))
            }),
            _ => Err(PyfixError::config_error(format!(
                "Unsupported config file '{}' (expected .toml or .json)",
                path.display()
            ))),
        }
    }

    /// Selected fixer names; empty means all
    pub fn selected_fixers(&self) -> Vec<String> {
        self.fixers
            .as_ref()
            .and_then(|f| f.select.clone())
            .unwrap_or_default()
    }

    /// Ignored fixer names
    pub fn ignored_fixers(&self) -> Vec<String> {
        self.fixers
            .as_ref()
            .and_then(|f| f.ignore.clone())
            .unwrap_or_default()
    }

    /// Files section with defaults filled in for missing fields
    pub fn files_or_default(&self) -> FilesConfiguration {
        let defaults = FilesConfiguration::default();
        match &self.files {
            Some(files) => FilesConfiguration {
                include: files.include.clone().or(defaults.include),
                exclude: files.exclude.clone().or(defaults.exclude),
            },
            None => defaults,
        }
    }

    pub fn backups_enabled(&self) -> bool {
        self.write.as_ref().and_then(|w| w.backups).unwrap_or(true)
    }

    pub fn validate_output(&self) -> bool {
        self.write
            .as_ref()
            .and_then(|w| w.validate_output)
            .unwrap_or(true)
    }
}
