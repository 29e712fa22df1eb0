//! SELECT-only statement enforcement.
//!
//! The execution guardrail calls this before anything touches the driver.
//! The parsed root must be a single SELECT (CTE-wrapped SELECT and set
//! operations over SELECTs included). Everything else, including SELECT
//! INTO, is rejected.

use crate::error::{SqlError, SqlResult};
use sqlparser::ast::{Query, SetExpr, Statement};

/// Strip trailing semicolons and surrounding whitespace.
pub fn strip_trailing_semicolons(sql: &str) -> &str {
    sql.trim().trim_end_matches(';').trim_end()
}

/// Validate that the statement list is exactly one read-only SELECT.
pub fn ensure_single_select(statements: &[Statement]) -> SqlResult<()> {
    match statements {
        [] => Err(SqlError::EmptySql),
        [only] => ensure_select_statement(only),
        _ => Err(SqlError::MultiStatement),
    }
}

fn ensure_select_statement(stmt: &Statement) -> SqlResult<()> {
    match stmt {
        Statement::Query(query) => ensure_select_query(query),
        other => Err(SqlError::NotSelect {
            found: statement_kind(other).to_string(),
        }),
    }
}

fn ensure_select_query(query: &Query) -> SqlResult<()> {
    ensure_select_body(query.body.as_ref())
}

fn ensure_select_body(body: &SetExpr) -> SqlResult<()> {
    match body {
        SetExpr::Select(select) => {
            if select.into.is_some() {
                return Err(SqlError::NotSelect {
                    found: "SELECT INTO".to_string(),
                });
            }
            Ok(())
        }
        SetExpr::Query(query) => ensure_select_query(query),
        SetExpr::SetOperation { left, right, .. } => {
            ensure_select_body(left)?;
            ensure_select_body(right)
        }
        other => Err(SqlError::NotSelect {
            found: body_kind(other).to_string(),
        }),
    }
}

fn statement_kind(stmt: &Statement) -> &'static str {
    match stmt {
        Statement::Insert { .. } => "INSERT",
        Statement::Update { .. } => "UPDATE",
        Statement::Delete { .. } => "DELETE",
        Statement::Truncate { .. } => "TRUNCATE",
        Statement::CreateTable { .. } => "CREATE TABLE",
        Statement::CreateView { .. } => "CREATE VIEW",
        Statement::CreateIndex { .. } => "CREATE INDEX",
        Statement::AlterTable { .. } => "ALTER TABLE",
        Statement::Drop { .. } => "DROP",
        Statement::Grant { .. } => "GRANT",
        Statement::Revoke { .. } => "REVOKE",
        Statement::Merge { .. } => "MERGE",
        Statement::Call { .. } => "CALL",
        Statement::Execute { .. } => "EXECUTE",
        _ => "non-SELECT statement",
    }
}

fn body_kind(body: &SetExpr) -> &'static str {
    match body {
        SetExpr::Values(_) => "VALUES",
        SetExpr::Insert(_) => "INSERT",
        SetExpr::Update(_) => "UPDATE",
        SetExpr::Table(_) => "TABLE",
        _ => "non-SELECT query body",
    }
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
