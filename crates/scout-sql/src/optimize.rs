//! Statement normalization with optional schema-aware qualification.
//!
//! With a schema map, unqualified column references are rewritten to
//! `table.column` when exactly one referenced table defines the column.
//! Without one, the pass is canonical rendering only.

use crate::dialect::SqlDialect;
use crate::error::SqlResult;
use crate::metadata::extract_metadata;
use crate::parser::SqlParser;
use sqlparser::ast::{Expr, Ident, VisitMut, VisitorMut};
use std::collections::HashMap;
use std::ops::ControlFlow;

/// Outcome of `optimize`.
#[derive(Debug, Clone)]
pub struct OptimizeOutcome {
    pub sql: String,
    pub applied_rules: Vec<String>,
    pub notes: Vec<String>,
}

struct QualifyVisitor<'a> {
    /// lowercased column name -> owning table key, unambiguous only.
    unique_owner: &'a HashMap<String, String>,
    rewrites: usize,
}

impl VisitorMut for QualifyVisitor<'_> {
    type Break = ();

    fn post_visit_expr(&mut self, expr: &mut Expr) -> ControlFlow<()> {
        if let Expr::Identifier(ident) = expr {
            if let Some(owner) = self.unique_owner.get(&ident.value.to_lowercase()) {
                let mut parts: Vec<Ident> = owner.split('.').map(Ident::new).collect();
                parts.push(ident.clone());
                *expr = Expr::CompoundIdentifier(parts);
                self.rewrites += 1;
            }
        }
        ControlFlow::Continue(())
    }
}

/// Resolve a referenced table against the schema map, accepting bare or
/// qualified spellings, case-insensitively. Returns the map's own key.
fn resolve_key<'m>(schema_map: &'m HashMap<String, Vec<String>>, table: &str) -> Option<&'m str> {
    let lower = table.to_lowercase();
    let bare = lower.rsplit('.').next().unwrap_or(&lower).to_string();
    schema_map.keys().find_map(|key| {
        let key_lower = key.to_lowercase();
        let key_bare = key_lower.rsplit('.').next().unwrap_or(&key_lower);
        (key_lower == lower || key_bare == bare).then_some(key.as_str())
    })
}

/// Normalize a statement; when `schema_map` (table key -> column names) is
/// given, qualify column references that resolve to exactly one of the
/// statement's tables.
pub fn optimize(
    parser: &SqlParser,
    sql: &str,
    dialect: SqlDialect,
    schema_map: Option<&HashMap<String, Vec<String>>>,
) -> SqlResult<OptimizeOutcome> {
    let mut stmt = parser.parse_single(sql, dialect)?;
    let mut applied_rules = vec!["canonical-render".to_string()];
    let mut notes = Vec::new();

    if let Some(schema_map) = schema_map {
        let mut owners: HashMap<String, Vec<String>> = HashMap::new();
        for table in extract_metadata(&stmt).tables {
            let Some(key) = resolve_key(schema_map, &table) else {
                notes.push(format!("table {table} not in schema map"));
                continue;
            };
            for column in &schema_map[key] {
                owners
                    .entry(column.to_lowercase())
                    .or_default()
                    .push(key.to_string());
            }
        }
        let unique_owner: HashMap<String, String> = owners
            .into_iter()
            .filter_map(|(col, mut tables)| {
                tables.dedup();
                (tables.len() == 1).then(|| (col, tables.remove(0)))
            })
            .collect();

        if !unique_owner.is_empty() {
            let mut visitor = QualifyVisitor {
                unique_owner: &unique_owner,
                rewrites: 0,
            };
            let _ = stmt.visit(&mut visitor);
            if visitor.rewrites > 0 {
                applied_rules.push("qualify-columns".to_string());
            }
        }
    }

    Ok(OptimizeOutcome {
        sql: stmt.to_string(),
        applied_rules,
        notes,
    })
}

#[cfg(test)]
#[path = "optimize_test.rs"]
mod tests;
