//! Tree editing helpers for fixers
//!
//! Green trees are immutable, so "editing" means building new green nodes out
//! of cloned pieces of the original tree. The helpers here deal with the one
//! formatting concern every rewrite shares: leading trivia, the whitespace and
//! comments in front of the first significant token of an element.

use rowan::Language;

use super::nodes::{GreenElement, GreenNode, GreenToken, NodeOrToken};
use super::{PySyntaxElement, PySyntaxKind, PythonLanguage, lex_with_trivia};

/// How [`deep_clone`] treats formatting of the cloned element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloneOptions {
    /// Keep leading trivia; when false the clone starts at its first
    /// significant token
    pub preserve_formatting: bool,
}

impl CloneOptions {
    pub fn preserve_formatting() -> Self {
        Self {
            preserve_formatting: true,
        }
    }

    pub fn reset_formatting() -> Self {
        Self {
            preserve_formatting: false,
        }
    }
}

impl Default for CloneOptions {
    fn default() -> Self {
        Self::preserve_formatting()
    }
}

/// Leading trivia of an element
///
/// Tokens never own trivia (it sits in front of them as sibling tokens), so
/// a token's leading trivia is always empty.
pub fn leading_trivia(element: &PySyntaxElement) -> String {
    match element {
        NodeOrToken::Token(_) => String::new(),
        NodeOrToken::Node(node) => node
            .descendants_with_tokens()
            .filter_map(|e| e.into_token())
            .take_while(|token| token.kind().is_trivia())
            .map(|token| token.text().to_string())
            .collect(),
    }
}

/// Clone an element into a detached green element
///
/// The clone shares no identity with the source tree; attaching it somewhere
/// else never affects the original.
pub fn deep_clone(element: &PySyntaxElement, options: CloneOptions) -> GreenElement {
    let green: GreenElement = match element {
        NodeOrToken::Node(node) => NodeOrToken::Node(node.green().into_owned()),
        NodeOrToken::Token(token) => NodeOrToken::Token(token.green().to_owned()),
    };

    if options.preserve_formatting {
        return green;
    }

    match green {
        NodeOrToken::Node(node) => NodeOrToken::Node(strip_leading_trivia(&node).0),
        token => token,
    }
}

/// Replace the leading trivia of `node` with `trivia`
///
/// The trivia text is lexed into trivia tokens and placed in the innermost
/// node that starts at the first significant token, the same place the
/// parser puts it.
pub fn with_leading_trivia(node: &GreenNode, trivia: &str) -> GreenNode {
    let (stripped, _) = strip_leading_trivia(node);
    if trivia.is_empty() {
        return stripped;
    }

    let (tokens, _) = lex_with_trivia(trivia);
    let trivia_tokens: Vec<GreenElement> = tokens
        .iter()
        .map(|token| NodeOrToken::Token(GreenToken::new(token.kind.into(), &token.text)))
        .collect();

    insert_leading(&stripped, trivia_tokens)
}

/// Source text of a green element
pub fn green_text(element: &GreenElement) -> String {
    match element {
        NodeOrToken::Node(node) => node.to_string(),
        NodeOrToken::Token(token) => token.text().to_string(),
    }
}

/// Owned copies of a green node's children
pub fn green_children(node: &GreenNode) -> Vec<GreenElement> {
    node.children()
        .map(|child| match child {
            NodeOrToken::Node(node) => NodeOrToken::Node(node.to_owned()),
            NodeOrToken::Token(token) => NodeOrToken::Token(token.to_owned()),
        })
        .collect()
}

/// Kind of a green element
pub fn green_kind(element: &GreenElement) -> PySyntaxKind {
    let raw = match element {
        NodeOrToken::Node(node) => node.kind(),
        NodeOrToken::Token(token) => token.kind(),
    };
    PythonLanguage::kind_from_raw(raw)
}

/// Remove trivia in front of the first significant token
///
/// Returns the rebuilt node and whether a significant token was reached.
fn strip_leading_trivia(node: &GreenNode) -> (GreenNode, bool) {
    let mut children: Vec<GreenElement> = Vec::new();
    let mut reached = false;

    for child in green_children(node) {
        if reached {
            children.push(child);
            continue;
        }

        match child {
            NodeOrToken::Token(token) => {
                if PythonLanguage::kind_from_raw(token.kind()).is_trivia() {
                    continue;
                }
                reached = true;
                children.push(NodeOrToken::Token(token));
            }
            NodeOrToken::Node(inner) => {
                let (stripped, inner_reached) = strip_leading_trivia(&inner);
                reached = inner_reached;
                children.push(NodeOrToken::Node(stripped));
            }
        }
    }

    (GreenNode::new(node.kind(), children), reached)
}

/// Insert tokens before the first token of the innermost leading node
fn insert_leading(node: &GreenNode, tokens: Vec<GreenElement>) -> GreenNode {
    let mut children = green_children(node);

    match children.first() {
        Some(NodeOrToken::Node(first)) => {
            let rebuilt = insert_leading(first, tokens);
            children[0] = NodeOrToken::Node(rebuilt);
        }
        _ => {
            children.splice(0..0, tokens);
        }
    }

    GreenNode::new(node.kind(), children)
}
