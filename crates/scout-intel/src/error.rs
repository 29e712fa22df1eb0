//! Error types for scout-intel

use thiserror::Error;

/// Card building and store errors
#[derive(Error, Debug)]
pub enum BuildError {
    /// I001: Reflection failed outright
    #[error("[I001] Schema reflection failed")]
    Reflection(#[source] scout_db::DbError),

    /// I002: Database unreachable
    #[error("[I002] Database unreachable: {0}")]
    Connectivity(#[source] scout_db::DbError),

    /// I003: Card cache I/O failure
    #[error("[I003] Card cache error at {path}: {message}")]
    CacheIo { path: String, message: String },

    /// I004: Card cache format mismatch
    #[error("[I004] Card cache format not understood (version {found})")]
    CacheVersion { found: u32 },
}

/// Result type alias for BuildError
pub type BuildResult<T> = Result<T, BuildError>;
