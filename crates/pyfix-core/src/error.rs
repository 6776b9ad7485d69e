//! Error types and handling for pyfix operations

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for pyfix operations
#[derive(Debug, Error)]
pub enum PyfixError {
    /// Source that could not be parsed cleanly
    #[error("Parse error in '{path}' at line {line}, column {column}: {message}")]
    ParseError {
        path: PathBuf,
        message: String,
        line: usize,
        column: usize,
    },

    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Fixer selection or execution errors
    #[error("Fixer error in '{fixer}': {message}")]
    FixerError { fixer: String, message: String },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    Config,
    Fixer,
    Io,
}

impl PyfixError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            PyfixError::ParseError { .. } => ErrorKind::Parse,
            PyfixError::ConfigError { .. } => ErrorKind::Config,
            PyfixError::FixerError { .. } => ErrorKind::Fixer,
            PyfixError::IoError { .. } => ErrorKind::Io,
        }
    }

    /// Check if this error is recoverable (can continue processing other files)
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Parse | ErrorKind::Io)
    }

    /// Create a parse error
    pub fn parse_error(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        Self::ParseError {
            path: path.into(),
            message: message.into(),
            line,
            column,
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a fixer error
    pub fn fixer_error(fixer: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FixerError {
            fixer: fixer.into(),
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }
}
