//! Error types for scout-core

use thiserror::Error;

/// Core error type for schemascout
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Malformed table key
    #[error("[C001] Invalid table key '{key}': expected '<schema>.<table>'")]
    InvalidTableKey { key: String },

    /// C002: Card serialization failure
    #[error("[C002] Schema card serialization failed: {message}")]
    CardSerialization { message: String },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
