//! Fixer capability and match bindings

use pyfix_core::{PySyntaxElement, PySyntaxNode};
use std::collections::HashMap;

/// Parts of a matched node, keyed by role name
///
/// Elements stay attached to the tree they were matched in, so they can be
/// inspected (kind, text, leading trivia) and cloned into a replacement.
#[derive(Debug, Clone, Default)]
pub struct MatchBindings {
    bindings: HashMap<String, PySyntaxElement>,
}

impl MatchBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind an element to a role, replacing any previous binding
    pub fn bind(&mut self, name: impl Into<String>, element: PySyntaxElement) {
        self.bindings.insert(name.into(), element);
    }

    pub fn get(&self, name: &str) -> Option<&PySyntaxElement> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Get a binding the matcher guarantees to produce
    ///
    /// # Panics
    ///
    /// Panics when the binding is missing. A transformer only ever sees
    /// bindings produced by its own matcher, so this is a programming error.
    pub fn expect_binding(&self, name: &str) -> &PySyntaxElement {
        match self.bindings.get(name) {
            Some(element) => element,
            None => panic!("matcher did not bind required role '{name}'"),
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// A source-to-source fixer
///
/// The engine calls [`Fixer::match_node`] on every node of the tree,
/// bottom-up, and hands successful matches to [`Fixer::transform`]. The node
/// passed to both is the root of a detached tree; fixers never see or mutate
/// the rest of the file.
pub trait Fixer: Send + Sync {
    /// Short name used on the command line and in config files
    fn name(&self) -> &'static str;

    /// One-line description for `--list-fixes`
    fn description(&self) -> &'static str;

    /// Recognize the node and bind its parts, or `None` when it does not match
    fn match_node(&self, node: &PySyntaxNode) -> Option<MatchBindings>;

    /// Build the replacement for a matched node
    ///
    /// Returns `None` to leave the node unchanged. The replacement keeps the
    /// leading trivia of `node` so surrounding formatting is untouched.
    fn transform(&self, node: &PySyntaxNode, bindings: &MatchBindings) -> Option<PySyntaxNode>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyfix_core::parse_python;

    #[test]
    fn test_bind_and_get() {
        let parse = parse_python("f\n");
        let name = parse
            .syntax()
            .descendants_with_tokens()
            .find(|e| e.kind() == pyfix_core::PySyntaxKind::Name)
            .unwrap();

        let mut bindings = MatchBindings::new();
        assert!(bindings.is_empty());
        bindings.bind("func", name);

        assert!(bindings.contains("func"));
        assert!(!bindings.contains("args"));
        assert_eq!(bindings.len(), 1);
        let func = bindings.expect_binding("func").as_token().unwrap();
        assert_eq!(func.text(), "f");
        assert!(bindings.get("kwds").is_none());
    }

    #[test]
    #[should_panic(expected = "matcher did not bind required role 'args'")]
    fn test_expect_binding_panics_on_missing_role() {
        MatchBindings::new().expect_binding("args");
    }
}
