//! Built-in fixers

use std::sync::Arc;

use crate::fixer::Fixer;

pub mod apply;

pub use apply::ApplyFixer;

/// Every built-in fixer, in the order the engine runs them
pub fn builtin_fixers() -> Vec<Arc<dyn Fixer>> {
    vec![Arc::new(ApplyFixer::new())]
}
