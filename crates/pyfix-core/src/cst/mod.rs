//! Concrete Syntax Tree (CST) for Python source
//!
//! This module implements a lossless syntax tree using the Rowan library.
//! The CST preserves all source information including whitespace, comments,
//! line continuations and blank lines, so a rewritten file differs from the
//! original only where a fixer changed something.
//!
//! ## Architecture
//!
//! The CST uses Rowan's green/red tree pattern:
//!
//! - **Green Tree**: Immutable, position-independent storage
//!   - Stores actual source text with trivia (whitespace, comments)
//!   - Cheap to clone and `Send + Sync`
//!
//! - **Red Tree**: Dynamically constructed view with parent pointers
//!   - Created on-demand for traversal and matching
//!
//! ## Trivia Handling
//!
//! Trivia is owned by the innermost node that starts at the next significant
//! token. The trivia in front of an expression is therefore part of that
//! expression's node: its *leading trivia*. See [`edit`] for the helpers that
//! read, strip and re-attach it.
//!
//! This enables lossless representation: `parse(source).text() == source`
//!
//! ## Example
//!
//! ```rust,ignore
//! use pyfix_core::cst::{PySyntaxKind, parse_python};
//!
//! let parse = parse_python("y = apply(f, g, h)  # call\n");
//! assert_eq!(parse.syntax().text().to_string(), "y = apply(f, g, h)  # call\n");
//!
//! for token in parse.syntax().descendants_with_tokens() {
//!     if let Some(comment) = token.as_token() {
//!         if comment.kind() == PySyntaxKind::Comment {
//!             println!("Found comment: {}", comment.text());
//!         }
//!     }
//! }
//! ```

mod builder;
mod language;
mod lexer;
mod nodes;
mod parser;
mod syntax_kind;

pub mod edit;

pub use builder::CstBuilder;
pub use edit::{
    CloneOptions, deep_clone, green_children, green_kind, green_text, leading_trivia,
    with_leading_trivia,
};
pub use language::PythonLanguage;
pub use lexer::{CstLexResult, CstSpan, CstToken, LexerError, lex_with_trivia};
pub use nodes::*;
pub use parser::{Parse, ParseError, parse_python};
pub use syntax_kind::PySyntaxKind;
