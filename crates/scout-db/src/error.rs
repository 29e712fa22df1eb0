//! Error types for scout-db

use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error with preserved source chain (D001)
    #[error("[D001] Database connection failed: {message}")]
    ConnectionFailed {
        message: String,
        #[source]
        source: duckdb::Error,
    },

    /// Query execution error with preserved source chain (D002)
    #[error("[D002] SQL execution failed: {context}")]
    ExecutionFailed {
        context: String,
        #[source]
        source: duckdb::Error,
    },

    /// Table not found (D003)
    #[error("[D003] Table or view not found: {0}")]
    TableNotFound(String),

    /// Query exceeded its deadline (D004)
    #[error("[D004] Query timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// Reflection produced nothing usable (D005)
    #[error("[D005] Reflection failed: {0}")]
    ReflectionFailed(String),

    /// Mutex poisoned (D006)
    #[error("[D006] Database mutex poisoned: {0}")]
    MutexPoisoned(String),

    /// Blocking driver task failed to join (D007)
    #[error("[D007] Blocking database task failed: {0}")]
    TaskFailed(String),
}

impl DbError {
    /// Whether the underlying driver message points at a missing relation.
    pub fn is_not_found(&self) -> bool {
        match self {
            DbError::TableNotFound(_) => true,
            DbError::ExecutionFailed { source, .. } => is_table_not_found(&source.to_string()),
            _ => false,
        }
    }
}

fn is_table_not_found(msg: &str) -> bool {
    msg.contains("Table with name")
        || msg.contains("View with name")
        || msg.contains("Table or view with name")
        || (msg.contains("Catalog Error") && msg.contains("not found"))
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;
