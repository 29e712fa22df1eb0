//! Validation and dialect normalization.
//!
//! sqlparser has no dialect rewriter, so transpilation here means parsing
//! under the source dialect and rendering the AST in canonical form, with
//! warnings carrying anything the caller should know. Auto-transpilation
//! detects the source dialect by parse trial, preferring the target.

use crate::dialect::SqlDialect;
use crate::error::{SqlError, SqlResult};
use crate::parser::SqlParser;
use sqlparser::ast::Statement;

/// Outcome of `validate`.
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    pub is_valid: bool,
    pub error_message: Option<String>,
    /// Canonical rendering when the SQL parsed.
    pub normalized_sql: Option<String>,
    pub dialect: SqlDialect,
    pub notes: Vec<String>,
}

/// Outcome of `transpile` and `auto_transpile`.
#[derive(Debug, Clone)]
pub struct TranspileOutcome {
    pub sql: String,
    pub source: SqlDialect,
    pub target: SqlDialect,
    pub warnings: Vec<String>,
}

fn render(statements: &[Statement]) -> String {
    statements
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(";\n")
}

/// Parse and validate SQL under one dialect, returning the canonical form
/// on success. Never errors; failures come back as a typed outcome.
pub fn validate(parser: &SqlParser, sql: &str, dialect: SqlDialect) -> ValidationOutcome {
    let mut notes = Vec::new();
    if dialect.is_approximated() {
        notes.push(format!(
            "dialect {dialect} is approximated with the generic parser"
        ));
    }
    match parser.parse(sql, dialect) {
        Ok(statements) => ValidationOutcome {
            is_valid: true,
            error_message: None,
            normalized_sql: Some(render(&statements)),
            dialect,
            notes,
        },
        Err(e) => ValidationOutcome {
            is_valid: false,
            error_message: Some(e.to_string()),
            normalized_sql: None,
            dialect,
            notes,
        },
    }
}

/// Transpile from a known source dialect to a target. The rendered form is
/// canonical; constructs with no portable rendering surface as warnings
/// rather than errors.
pub fn transpile(
    parser: &SqlParser,
    sql: &str,
    source: SqlDialect,
    target: SqlDialect,
) -> SqlResult<TranspileOutcome> {
    let statements = parser.parse(sql, source)?;
    let mut warnings = Vec::new();
    if source.is_approximated() || target.is_approximated() {
        warnings.push("oracle is approximated with the generic parser".to_string());
    }
    Ok(TranspileOutcome {
        sql: render(&statements),
        source,
        target,
        warnings,
    })
}

/// Transpile with source-dialect detection by parse trial. The target is
/// tried first so that already-correct SQL round-trips unchanged; the
/// remaining dialects are tried in a fixed order for determinism.
pub fn auto_transpile(
    parser: &SqlParser,
    sql: &str,
    target: SqlDialect,
) -> SqlResult<TranspileOutcome> {
    let mut last_error: Option<SqlError> = None;
    let trial_order = std::iter::once(target)
        .chain(SqlDialect::ALL.iter().copied().filter(|d| *d != target));

    for candidate in trial_order {
        match transpile(parser, sql, candidate, target) {
            Ok(mut outcome) => {
                if candidate != target {
                    outcome
                        .warnings
                        .push(format!("source dialect detected as {candidate}"));
                }
                return Ok(outcome);
            }
            Err(e @ SqlError::EmptySql) => return Err(e),
            Err(e) => last_error = Some(e),
        }
    }
    Err(last_error.unwrap_or(SqlError::ParseError {
        message: "no dialect could parse the input".to_string(),
    }))
}

#[cfg(test)]
#[path = "transpile_test.rs"]
mod tests;
