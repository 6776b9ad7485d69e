//! Result type alias for pyfix operations

use crate::error::PyfixError;

/// Standard Result type for pyfix operations
pub type Result<T> = std::result::Result<T, PyfixError>;
