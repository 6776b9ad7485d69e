//! pyfix core
//!
//! Shared building blocks for the pyfix source-to-source fixer: a lossless,
//! Rowan-based syntax tree for Python source, configuration loading, source
//! file discovery and diff rendering.

pub mod config;
pub mod cst; // Concrete Syntax Tree (lossless, Rowan-based)
pub mod diff;
pub mod discovery;
pub mod error;
pub mod result;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FilesConfiguration, FixersConfiguration, PyfixConfig, WriteConfiguration,
};
pub use cst::{
    CloneOptions, CstToken, Parse, ParseError, PySyntaxElement, PySyntaxKind, PySyntaxNode,
    PySyntaxToken, PythonLanguage, deep_clone, leading_trivia, lex_with_trivia, parse_python,
    with_leading_trivia,
};
pub use diff::{generate_unified_diff, generate_unified_diff_plain};
pub use discovery::{DefaultFileDiscovery, FileDiscovery, collect_source_files};
pub use error::{ErrorKind, PyfixError};
pub use result::Result;

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pyfix=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
