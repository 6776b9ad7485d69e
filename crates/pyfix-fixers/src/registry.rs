//! Registry of available fixers

use pyfix_core::{PyfixError, Result};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::builtin::builtin_fixers;
use crate::fixer::Fixer;

/// Fixers by name
#[derive(Default, Clone)]
pub struct FixerRegistry {
    fixers: BTreeMap<&'static str, Arc<dyn Fixer>>,
}

impl FixerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in fixer
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for fixer in builtin_fixers() {
            registry.register(fixer);
        }
        registry
    }

    /// Register a fixer, replacing one with the same name
    pub fn register(&mut self, fixer: Arc<dyn Fixer>) {
        let name = fixer.name();
        if self.fixers.insert(name, fixer).is_some() {
            tracing::warn!("Fixer '{}' registered twice, keeping the latest", name);
        }
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&'static str> {
        self.fixers.keys().copied().collect()
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Fixer>> {
        self.fixers.get(normalize_name(name)).cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Fixer>> {
        self.fixers.values()
    }

    pub fn len(&self) -> usize {
        self.fixers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixers.is_empty()
    }

    /// Resolve the fixers to run
    ///
    /// An empty `select` (or one containing `all`) selects every registered
    /// fixer; `ignore` is applied afterwards. Names may carry a `fix_` prefix.
    /// Unknown names in either list are errors.
    pub fn select(&self, select: &[String], ignore: &[String]) -> Result<Vec<Arc<dyn Fixer>>> {
        for name in select.iter().chain(ignore) {
            let name = normalize_name(name);
            if name != "all" && !self.fixers.contains_key(name) {
                return Err(PyfixError::fixer_error(
                    name,
                    format!("unknown fixer (available: {})", self.names().join(", ")),
                ));
            }
        }

        let select_all = select.is_empty() || select.iter().any(|n| normalize_name(n) == "all");
        let ignored: Vec<&str> = ignore.iter().map(|n| normalize_name(n)).collect();

        let selected: Vec<Arc<dyn Fixer>> = self
            .fixers
            .iter()
            .filter(|(name, _)| select_all || select.iter().any(|n| normalize_name(n) == **name))
            .filter(|(name, _)| !ignored.contains(*name))
            .map(|(_, fixer)| Arc::clone(fixer))
            .collect();

        tracing::debug!(
            "Selected fixers: {:?}",
            selected.iter().map(|f| f.name()).collect::<Vec<_>>()
        );
        Ok(selected)
    }
}

fn normalize_name(name: &str) -> &str {
    let name = name.trim();
    name.strip_prefix("fix_").unwrap_or(name)
}
