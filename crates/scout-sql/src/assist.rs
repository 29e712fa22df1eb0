//! Driver-error assistance.
//!
//! Turns an opaque driver message plus the failing SQL into concrete next
//! steps: likely causes, suggested dialect fixes, and fuzzy identifier
//! repair against the known schema within a small edit distance.

use crate::dialect::SqlDialect;
use crate::parser::SqlParser;
use crate::transpile::validate;

/// Maximum edit distance for identifier repair suggestions.
const MAX_EDIT_DISTANCE: usize = 2;

/// Classified failure kind, used by the guardrail for error-code mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistKind {
    UnresolvedColumn { name: String, suggestions: Vec<String> },
    UnresolvedTable { name: String, suggestions: Vec<String> },
    TypeMismatch,
    Syntax,
    Other,
}

/// Assistance payload for a failed execution.
#[derive(Debug, Clone)]
pub struct ErrorAssist {
    pub kind: AssistKind,
    /// Canonical SQL when the input still parses.
    pub normalized_sql: Option<String>,
    pub likely_causes: Vec<String>,
    pub suggested_fixes: Vec<String>,
}

/// Analyze a driver error message against the failing SQL and the known
/// identifier universe.
pub fn assist_error(
    parser: &SqlParser,
    sql: &str,
    driver_message: &str,
    dialect: SqlDialect,
    known_tables: &[String],
    known_columns: &[String],
) -> ErrorAssist {
    let validation = validate(parser, sql, dialect);
    let normalized_sql = validation.normalized_sql;

    let msg = driver_message.to_lowercase();
    let mut likely_causes = Vec::new();
    let mut suggested_fixes = Vec::new();

    let kind = if msg.contains("column") && (msg.contains("not found") || msg.contains("does not exist"))
    {
        let name = quoted_identifier(driver_message).unwrap_or_default();
        let suggestions = close_matches(&name, known_columns);
        likely_causes.push("a selected or filtered column is misspelled or absent".to_string());
        for s in &suggestions {
            suggested_fixes.push(format!("did you mean '{s}'?"));
        }
        AssistKind::UnresolvedColumn { name, suggestions }
    } else if (msg.contains("table") || msg.contains("relation"))
        && (msg.contains("not found") || msg.contains("does not exist"))
    {
        let name = quoted_identifier(driver_message).unwrap_or_default();
        let suggestions = close_matches(&name, known_tables);
        likely_causes.push("the referenced table name is wrong or not in scope".to_string());
        for s in &suggestions {
            suggested_fixes.push(format!("did you mean '{s}'?"));
        }
        AssistKind::UnresolvedTable { name, suggestions }
    } else if msg.contains("syntax error") || msg.contains("parser error") || msg.contains("mismatched input")
    {
        likely_causes.push(format!("syntax near the reported token is invalid for {dialect}"));
        AssistKind::Syntax
    } else if msg.contains("type mismatch")
        || msg.contains("cannot be cast")
        || msg.contains("conversion error")
        || msg.contains("invalid input syntax")
    {
        likely_causes.push("a predicate or expression compares incompatible types".to_string());
        AssistKind::TypeMismatch
    } else {
        AssistKind::Other
    };

    // Dialect-portability fixes from the SQL text itself.
    let sql_lower = sql.to_lowercase();
    if sql_lower.contains("top ") && dialect != SqlDialect::Tsql {
        suggested_fixes.push("replace T-SQL TOP with LIMIT".to_string());
    }
    if sql_lower.contains("limit") && dialect == SqlDialect::Tsql {
        suggested_fixes.push("replace LIMIT with TOP n in the SELECT clause".to_string());
    }
    if sql_lower.contains("ifnull(") || sql_lower.contains("isnull(") {
        suggested_fixes.push("use COALESCE for portable null handling".to_string());
    }

    ErrorAssist {
        kind,
        normalized_sql,
        likely_causes,
        suggested_fixes,
    }
}

/// Pull the first quoted identifier out of a driver message.
fn quoted_identifier(message: &str) -> Option<String> {
    for quote in ['"', '\''] {
        let mut parts = message.split(quote);
        parts.next()?;
        if let Some(inner) = parts.next() {
            if !inner.is_empty() && inner.len() < 128 {
                return Some(inner.to_string());
            }
        }
    }
    None
}

/// Known identifiers within the edit-distance budget, closest first.
fn close_matches(name: &str, known: &[String]) -> Vec<String> {
    if name.is_empty() {
        return Vec::new();
    }
    let target = name.to_lowercase();
    let mut scored: Vec<(usize, &String)> = known
        .iter()
        .filter_map(|candidate| {
            let d = edit_distance(&target, &candidate.to_lowercase());
            (d <= MAX_EDIT_DISTANCE && d > 0).then_some((d, candidate))
        })
        .collect();
    scored.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));
    scored.into_iter().map(|(_, c)| c.clone()).take(3).collect()
}

/// Levenshtein distance with the classic two-row table.
fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

#[cfg(test)]
#[path = "assist_test.rs"]
mod tests;
