//! Configuration file discovery and loading

use super::PyfixConfig;
use crate::{PyfixError, Result};
use std::path::{Path, PathBuf};

/// Config file names in priority order
const CONFIG_FILE_NAMES: &[&str] = &["pyfix.toml", ".pyfixrc.json"];

/// Configuration loader for discovering and loading config files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Auto-discover config file by traversing upward from start_path
    ///
    /// Searches for `pyfix.toml`, then `.pyfixrc.json`, in each directory from
    /// the given one up to the filesystem root.
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let mut current = start_path
            .canonicalize()
            .map_err(|e| PyfixError::config_error(format!("Invalid path: {e}")))?;

        loop {
            for filename in CONFIG_FILE_NAMES {
                let config_path = current.join(filename);
                if config_path.is_file() {
                    tracing::debug!("Found config: {}", config_path.display());
                    return Ok(Some(config_path));
                }
            }

            if let Some(parent) = current.parent() {
                current = parent.to_path_buf();
            } else {
                break;
            }
        }

        Ok(None)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<PyfixConfig> {
        PyfixConfig::load(path).map_err(|e| match e {
            PyfixError::ConfigError { .. } => e,
            other => PyfixError::config_error(format!(
                "Failed to load config from '{}': {other}",
                path.display()
            )),
        })
    }

    /// Load config from path or auto-discover
    ///
    /// An explicit path must exist. Without one, a discovered config is used
    /// when there is one and defaults otherwise.
    pub fn load(custom_path: Option<&Path>, start_dir: Option<&Path>) -> Result<PyfixConfig> {
        if let Some(path) = custom_path {
            if !path.exists() {
                return Err(PyfixError::config_error(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Self::load_from_file(path);
        }

        let search_dir = start_dir.unwrap_or_else(|| Path::new("."));
        match Self::auto_discover(search_dir)? {
            Some(path) => Self::load_from_file(&path),
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok(PyfixConfig::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_temp_config(dir: &Path, filename: &str, content: &str) -> PathBuf {
        let path = dir.join(filename);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_from_file_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(
            temp_dir.path(),
            "pyfix.toml",
            "[fixers]\nignore = [\"apply\"]\n",
        );

        let config = ConfigLoader::load_from_file(&config_path).unwrap();
        assert_eq!(config.ignored_fixers(), vec!["apply"]);
    }

    #[test]
    fn test_load_from_file_json() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(
            temp_dir.path(),
            ".pyfixrc.json",
            r#"{ "write": { "backups": false } }"#,
        );

        let config = ConfigLoader::load_from_file(&config_path).unwrap();
        assert!(!config.backups_enabled());
    }

    #[test]
    fn test_auto_discover_from_nested_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("pkg/sub");
        fs::create_dir_all(&nested).unwrap();
        create_temp_config(temp_dir.path(), "pyfix.toml", "");

        let found = ConfigLoader::auto_discover(&nested).unwrap();
        assert_eq!(
            found.unwrap().file_name().unwrap().to_str(),
            Some("pyfix.toml")
        );
    }

    #[test]
    fn test_toml_wins_over_json_in_same_directory() {
        let temp_dir = TempDir::new().unwrap();
        create_temp_config(temp_dir.path(), "pyfix.toml", "");
        create_temp_config(temp_dir.path(), ".pyfixrc.json", "{}");

        let found = ConfigLoader::auto_discover(temp_dir.path()).unwrap().unwrap();
        assert!(found.ends_with("pyfix.toml"));
    }

    #[test]
    fn test_invalid_config_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = create_temp_config(temp_dir.path(), "pyfix.toml", "[fixers\n");

        let err = ConfigLoader::load_from_file(&config_path).unwrap_err();
        assert!(matches!(err, PyfixError::ConfigError { .. }));
    }

    #[test]
    fn test_load_nonexistent_explicit_path() {
        let result = ConfigLoader::load(Some(Path::new("nonexistent.toml")), None);
        assert!(result.is_err());
    }
}
