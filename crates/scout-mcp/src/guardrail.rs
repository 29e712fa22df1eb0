//! SELECT-only execution with budgets and structured diagnostics.
//!
//! Order of operations: SELECT-only enforcement on the parsed root,
//! normalization to the active dialect, validation, bounded execution with
//! a truncation probe row, then cell truncation and shaping. Safety
//! rejections happen before any driver call.

use log::{info, warn};
use scout_core::execute::{
    ErrorCode, ExecuteResult, ExecuteStatus, NextAction, ResultColumn, ToolError,
};
use scout_core::card::SchemaCard;
use scout_db::{Database, DbError, DbValue};
use scout_sql::{
    assist_error, auto_transpile, ensure_single_select, strip_trailing_semicolons, validate,
    AssistKind, SqlDialect, SqlError, SqlParser,
};
use serde_json::Value;
use std::time::Duration;

/// Budgets applied to one execution.
#[derive(Debug, Clone, Copy)]
pub struct ExecutionLimits {
    pub row_limit: usize,
    pub max_cell_chars: usize,
    /// Driver-call deadline.
    pub timeout: Duration,
}

impl Default for ExecutionLimits {
    fn default() -> Self {
        Self {
            row_limit: 200,
            max_cell_chars: 200,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Run one guarded SELECT.
pub async fn run_execute(
    sql: &str,
    db: &dyn Database,
    parser: &SqlParser,
    dialect: SqlDialect,
    limits: ExecutionLimits,
    card: Option<&SchemaCard>,
) -> ExecuteResult {
    let base_sql = strip_trailing_semicolons(sql);

    // Transpile to the active dialect, detecting the source dialect by
    // parse trial (the active dialect is tried first, so native SQL takes
    // the same path). A failure here is the only way input can be
    // unparseable, so it doubles as the parse gate.
    let transpiled = match auto_transpile(parser, base_sql, dialect) {
        Ok(outcome) => outcome,
        Err(e) => return parse_failure(base_sql, e, parser, dialect, card),
    };

    // Safety gate on the parsed root; nothing reaches the driver on
    // failure. The source-dialect parse is already cached from the trial.
    let statements = match parser.parse(base_sql, transpiled.source) {
        Ok(statements) => statements,
        Err(e) => return parse_failure(base_sql, e, parser, dialect, card),
    };
    if let Err(e) = ensure_single_select(&statements) {
        let code = match e {
            SqlError::MultiStatement => ErrorCode::MultiStatement,
            _ => ErrorCode::NonSelectStatement,
        };
        return ExecuteResult::failure(
            base_sql,
            ToolError::new(code, e.to_string()),
            NextAction::RefinePlan,
        );
    }

    // Validate the normalized form under the active dialect.
    let sql_to_run = transpiled.sql;
    let mut notes = transpiled.warnings;
    let validation = validate(parser, &sql_to_run, dialect);
    notes.extend(validation.notes);
    if let Some(message) = validation.error_message {
        notes.push(message);
    }

    info!("executing ({dialect}): {sql_to_run}");

    // Fetch one row beyond the limit to detect truncation.
    let probe_limit = limits.row_limit + 1;
    let query = db.query(&sql_to_run, probe_limit);
    let output = match tokio::time::timeout(limits.timeout, query).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => return driver_failure(&sql_to_run, e, parser, dialect, card, notes),
        Err(_) => {
            return ExecuteResult {
                validation_notes: notes,
                ..ExecuteResult::failure(
                    sql_to_run,
                    ToolError::new(
                        ErrorCode::Timeout,
                        format!("query exceeded {}s deadline", limits.timeout.as_secs()),
                    ),
                    NextAction::RefinePlan,
                )
            }
        }
    };

    let truncated = output.rows.len() > limits.row_limit;
    let columns: Vec<ResultColumn> = output
        .columns
        .iter()
        .map(|c| ResultColumn {
            name: c.name.clone(),
            vendor_type: c.vendor_type.clone(),
        })
        .collect();
    let rows: Vec<serde_json::Map<String, Value>> = output
        .rows
        .iter()
        .take(limits.row_limit)
        .map(|row| {
            columns
                .iter()
                .zip(row)
                .map(|(col, cell)| (col.name.clone(), truncate_cell(cell, limits.max_cell_chars)))
                .collect()
        })
        .collect();
    let rows_returned = rows.len();

    if truncated {
        notes.push(format!(
            "result truncated to the {} row limit",
            limits.row_limit
        ));
    }

    ExecuteResult {
        sql: sql_to_run,
        validation_notes: notes,
        columns,
        rows,
        rows_returned,
        truncated,
        status: ExecuteStatus::Ok,
        error: None,
        next_action: if truncated {
            NextAction::Paginate
        } else {
            NextAction::None
        },
    }
}

fn truncate_cell(cell: &DbValue, max_chars: usize) -> Value {
    match cell {
        DbValue::Text(s) if s.chars().count() > max_chars => {
            let cut: String = s.chars().take(max_chars.saturating_sub(1)).collect();
            Value::String(format!("{cut}\u{2026}"))
        }
        other => other.to_json(),
    }
}

fn known_identifiers(card: Option<&SchemaCard>) -> (Vec<String>, Vec<String>) {
    let Some(card) = card else {
        return (Vec::new(), Vec::new());
    };
    let tables: Vec<String> = card.tables.keys().map(|k| k.to_string()).collect();
    let columns: Vec<String> = card
        .tables
        .values()
        .flat_map(|t| t.columns.iter().map(|c| c.name.clone()))
        .collect();
    (tables, columns)
}

fn parse_failure(
    sql: &str,
    error: SqlError,
    parser: &SqlParser,
    dialect: SqlDialect,
    card: Option<&SchemaCard>,
) -> ExecuteResult {
    let (tables, columns) = known_identifiers(card);
    let assist = assist_error(parser, sql, &error.to_string(), dialect, &tables, &columns);
    let mut hints = assist.likely_causes;
    hints.extend(assist.suggested_fixes);
    ExecuteResult::failure(
        sql,
        ToolError::new(ErrorCode::ParseError, error.to_string()).with_hints(hints),
        NextAction::RefinePlan,
    )
}

fn driver_failure(
    sql: &str,
    error: DbError,
    parser: &SqlParser,
    dialect: SqlDialect,
    card: Option<&SchemaCard>,
    notes: Vec<String>,
) -> ExecuteResult {
    warn!("driver error: {error}");
    let (tables, columns) = known_identifiers(card);
    let message = full_error_chain(&error);
    let assist = assist_error(parser, sql, &message, dialect, &tables, &columns);

    let code = match &assist.kind {
        AssistKind::UnresolvedColumn { .. } | AssistKind::UnresolvedTable { .. } => {
            ErrorCode::UnresolvedIdentifier
        }
        AssistKind::TypeMismatch => ErrorCode::TypeMismatch,
        AssistKind::Syntax => ErrorCode::ParseError,
        AssistKind::Other => {
            if error.is_not_found() {
                ErrorCode::UnresolvedIdentifier
            } else {
                ErrorCode::DriverError
            }
        }
    };

    let mut hints = assist.likely_causes;
    hints.extend(assist.suggested_fixes);
    ExecuteResult {
        validation_notes: notes,
        ..ExecuteResult::failure(
            sql,
            ToolError::new(code, message).with_hints(hints),
            NextAction::RefinePlan,
        )
    }
}

/// Driver errors carry the useful part in their source chain.
fn full_error_chain(error: &DbError) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
#[path = "guardrail_test.rs"]
mod tests;
