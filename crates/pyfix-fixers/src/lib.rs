//! pyfix fixers
//!
//! Source-to-source fixers for Python code and the engine that runs them.
//! A fixer pairs a matcher, which recognizes a syntactic shape and binds its
//! parts by role, with a transformer that builds the replacement tree from
//! those bindings.

pub mod builtin;
pub mod engine;
pub mod fixer;
pub mod registry;
pub mod util;

pub use builtin::ApplyFixer;
pub use engine::{AppliedFix, RefactorOptions, RefactorResult, RefactoringEngine};
pub use fixer::{Fixer, MatchBindings};
pub use registry::FixerRegistry;
