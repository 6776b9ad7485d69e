//! Type aliases and utilities for Python CST nodes
//!
//! These types are built on top of Rowan's generic tree types, parameterized
//! with our PythonLanguage.

use super::{PySyntaxKind, PythonLanguage};

/// A node in the Python concrete syntax tree
///
/// Cheap to clone (reference counted); the underlying green tree is immutable.
///
/// # Example
///
/// ```rust,ignore
/// use pyfix_core::cst::{PySyntaxKind, parse_python};
///
/// let parse = parse_python("apply(f, a)\n");
/// let call = parse.syntax().descendants().find(|n| n.kind() == PySyntaxKind::Power);
/// assert!(call.is_some());
/// ```
pub type PySyntaxNode = rowan::SyntaxNode<PythonLanguage>;

/// A token (leaf) in the Python concrete syntax tree
pub type PySyntaxToken = rowan::SyntaxToken<PythonLanguage>;

/// Either a node or a token in the CST
///
/// Single-token expressions (names, numbers, strings) are tokens, so fixer
/// bindings hold elements rather than nodes.
pub type PySyntaxElement = rowan::SyntaxElement<PythonLanguage>;

/// Position independent storage for an element
pub type GreenElement = rowan::NodeOrToken<rowan::GreenNode, rowan::GreenToken>;

// Re-export common rowan types for convenience
pub use rowan::{Direction, GreenNode, GreenToken, NodeOrToken, TextRange, TextSize, WalkEvent};

/// Extension trait for PySyntaxNode with Python-specific helpers
pub trait PySyntaxNodeExt {
    /// Child nodes and tokens with trivia filtered out
    fn significant_children(&self) -> Vec<PySyntaxElement>;

    /// First non-trivia token in the subtree
    fn first_significant_token(&self) -> Option<PySyntaxToken>;

    /// Get the text content without surrounding whitespace
    fn trimmed_text(&self) -> String;
}

impl PySyntaxNodeExt for PySyntaxNode {
    fn significant_children(&self) -> Vec<PySyntaxElement> {
        self.children_with_tokens()
            .filter(|element| !element.kind().is_trivia())
            .collect()
    }

    fn first_significant_token(&self) -> Option<PySyntaxToken> {
        self.descendants_with_tokens()
            .filter_map(|element| element.into_token())
            .find(|token| !token.kind().is_trivia())
    }

    fn trimmed_text(&self) -> String {
        self.text().to_string().trim().to_string()
    }
}

/// Helpers shared by nodes and tokens
pub trait PySyntaxElementExt {
    /// Check if this element has the given kind
    fn is_kind(&self, kind: PySyntaxKind) -> bool;

    /// Token text when the element is a token of the given kind
    fn token_text(&self, kind: PySyntaxKind) -> Option<String>;
}

impl PySyntaxElementExt for PySyntaxElement {
    fn is_kind(&self, kind: PySyntaxKind) -> bool {
        self.kind() == kind
    }

    fn token_text(&self, kind: PySyntaxKind) -> Option<String> {
        self.as_token()
            .filter(|token| token.kind() == kind)
            .map(|token| token.text().to_string())
    }
}
