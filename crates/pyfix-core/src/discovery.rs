//! Source file discovery
//!
//! Walks directories for Python files, keeping the ones that match the
//! configured include globs and dropping the excluded ones.

use crate::config::{FilesConfiguration, PyfixConfig};
use crate::{PyfixError, Result};
use glob::Pattern;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Trait for file discovery functionality
pub trait FileDiscovery {
    /// Discover Python files under the root based on configuration patterns
    fn discover_files(&self, config: &PyfixConfig) -> Result<Vec<PathBuf>>;
}

/// Default implementation of file discovery
#[derive(Debug, Clone)]
pub struct DefaultFileDiscovery {
    /// Root directory for file discovery
    pub root_dir: PathBuf,
}

impl DefaultFileDiscovery {
    /// Create a new file discovery instance
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    fn relative<'p>(&self, path: &'p Path) -> &'p Path {
        path.strip_prefix(&self.root_dir).unwrap_or(path)
    }

    fn matches_any(&self, path: &Path, patterns: &[Pattern]) -> bool {
        let path_str = self.relative(path).to_string_lossy().replace('\\', "/");
        patterns.iter().any(|pattern| pattern.matches(&path_str))
    }
}

impl FileDiscovery for DefaultFileDiscovery {
    fn discover_files(&self, config: &PyfixConfig) -> Result<Vec<PathBuf>> {
        info!("Discovering Python files in {}", self.root_dir.display());

        let files = config.files_or_default();
        let (include, exclude) = compile_patterns(&files)?;

        let mut discovered = BTreeSet::new();
        for entry in WalkDir::new(&self.root_dir).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            let path = entry.path();
            if !entry.file_type().is_file() {
                continue;
            }
            if self.matches_any(path, &include) && !self.matches_any(path, &exclude) {
                discovered.insert(path.to_path_buf());
            }
        }

        info!("Discovered {} Python files", discovered.len());
        debug!("Files: {:?}", discovered);

        Ok(discovered.into_iter().collect())
    }
}

/// Expand command line paths into the list of files to process
///
/// Files named explicitly are always kept; directories are searched with
/// [`DefaultFileDiscovery`].
pub fn collect_source_files(paths: &[PathBuf], config: &PyfixConfig) -> Result<Vec<PathBuf>> {
    let mut files = BTreeSet::new();

    for path in paths {
        if path.is_dir() {
            let discovery = DefaultFileDiscovery::new(path);
            files.extend(discovery.discover_files(config)?);
        } else if path.is_file() {
            files.insert(path.clone());
        } else {
            return Err(PyfixError::io_error(
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such file or directory"),
            ));
        }
    }

    Ok(files.into_iter().collect())
}

fn compile_patterns(files: &FilesConfiguration) -> Result<(Vec<Pattern>, Vec<Pattern>)> {
    let compile = |patterns: Option<&Vec<String>>| -> Result<Vec<Pattern>> {
        patterns
            .map(|list| list.as_slice())
            .unwrap_or_default()
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|e| {
                    PyfixError::config_error(format!("Invalid glob pattern '{p}': {e}"))
                })
            })
            .collect()
    };

    Ok((
        compile(files.include.as_ref())?,
        compile(files.exclude.as_ref())?,
    ))
}
