//! Error types for scout-sql

use thiserror::Error;

/// SQL service errors
#[derive(Error, Debug)]
pub enum SqlError {
    /// S001: Empty input
    #[error("[S001] SQL input is empty")]
    EmptySql,

    /// S002: Parse failure
    #[error("[S002] SQL parse error: {message}")]
    ParseError { message: String },

    /// S003: More than one statement where a single one is required
    #[error("[S003] Multiple SQL statements are not allowed")]
    MultiStatement,

    /// S004: Statement is not a SELECT
    #[error("[S004] Only SELECT statements are permitted, found {found}")]
    NotSelect { found: String },

    /// S005: Unknown dialect name
    #[error("[S005] Unknown SQL dialect: {name}")]
    UnknownDialect { name: String },
}

/// Result type alias for SqlError
pub type SqlResult<T> = Result<T, SqlError>;
