//! scout-sql - SQL-AST service for schemascout
//!
//! This crate wraps sqlparser-rs with dialect support and exposes the pure
//! operations the rest of the service needs: validation, transpilation with
//! source-dialect detection, SELECT-only enforcement, structural metadata
//! extraction, and driver-error assistance with fuzzy identifier repair.
//! Parse trees are cached per (sql, dialect).

pub mod assist;
pub mod dialect;
pub mod error;
pub mod guard;
pub mod metadata;
pub mod optimize;
pub mod parser;
pub mod transpile;

pub use assist::{assist_error, AssistKind, ErrorAssist};
pub use dialect::SqlDialect;
pub use error::{SqlError, SqlResult};
pub use guard::{ensure_single_select, strip_trailing_semicolons};
pub use metadata::{extract_metadata, SqlMetadata};
pub use optimize::{optimize, OptimizeOutcome};
pub use parser::SqlParser;
pub use sqlparser::ast::Statement;
pub use transpile::{auto_transpile, transpile, validate, TranspileOutcome, ValidationOutcome};

/// Convert a sqlparser `ObjectName` to a dot-separated string.
pub(crate) fn object_name_to_string(name: &sqlparser::ast::ObjectName) -> String {
    name.0
        .iter()
        .map(|part| part.to_string())
        .collect::<Vec<_>>()
        .join(".")
}
