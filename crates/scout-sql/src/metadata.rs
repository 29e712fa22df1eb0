//! Structural metadata extraction from SQL AST.

use crate::object_name_to_string;
use sqlparser::ast::{
    Expr, GroupByExpr, Query, SetExpr, Statement, TableFactor, TableWithJoins, Visit, Visitor,
    With,
};
use std::collections::{BTreeSet, HashSet};
use std::ops::ControlFlow;

const AGGREGATE_FUNCTIONS: &[&str] = &["COUNT", "SUM", "AVG", "MIN", "MAX", "GROUP_CONCAT"];

/// Structural facts about one statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SqlMetadata {
    /// Statement kind, e.g. `"Query"`.
    pub query_type: String,
    /// Referenced tables, CTE names excluded, sorted.
    pub tables: Vec<String>,
    /// Referenced column identifiers, sorted.
    pub columns: Vec<String>,
    /// Function call names, sorted.
    pub functions: Vec<String>,
    pub has_joins: bool,
    pub has_subqueries: bool,
    pub has_aggregations: bool,
}

/// Extract CTE names from a WITH clause
fn extract_cte_names(with: &With) -> HashSet<String> {
    with.cte_tables
        .iter()
        .map(|cte| cte.alias.name.value.clone())
        .collect()
}

struct MetadataVisitor {
    columns: BTreeSet<String>,
    functions: BTreeSet<String>,
    has_subqueries: bool,
}

impl Visitor for MetadataVisitor {
    type Break = ();

    fn pre_visit_expr(&mut self, expr: &Expr) -> ControlFlow<()> {
        match expr {
            Expr::Identifier(ident) => {
                self.columns.insert(ident.value.clone());
            }
            Expr::CompoundIdentifier(parts) => {
                if let Some(last) = parts.last() {
                    self.columns.insert(last.value.clone());
                }
            }
            Expr::Function(func) => {
                self.functions.insert(object_name_to_string(&func.name));
            }
            Expr::Subquery(_) | Expr::InSubquery { .. } | Expr::Exists { .. } => {
                self.has_subqueries = true;
            }
            _ => {}
        }
        ControlFlow::Continue(())
    }
}

/// Extract tables, columns, functions, and shape flags from a statement.
pub fn extract_metadata(stmt: &Statement) -> SqlMetadata {
    let cte_names = match stmt {
        Statement::Query(query) => query
            .with
            .as_ref()
            .map(extract_cte_names)
            .unwrap_or_default(),
        _ => HashSet::new(),
    };

    let mut tables: BTreeSet<String> = BTreeSet::new();
    let _ = sqlparser::ast::visit_relations(stmt, |relation| {
        let name = object_name_to_string(relation);
        let bare = name.rsplit('.').next().unwrap_or(&name);
        if !cte_names.contains(bare) {
            tables.insert(name);
        }
        ControlFlow::<()>::Continue(())
    });

    let mut visitor = MetadataVisitor {
        columns: BTreeSet::new(),
        functions: BTreeSet::new(),
        has_subqueries: false,
    };
    let _ = stmt.visit(&mut visitor);

    let mut meta = SqlMetadata {
        query_type: statement_type(stmt).to_string(),
        tables: tables.into_iter().collect(),
        columns: visitor.columns.into_iter().collect(),
        functions: visitor.functions.into_iter().collect(),
        has_joins: false,
        has_subqueries: visitor.has_subqueries,
        has_aggregations: false,
    };

    if let Statement::Query(query) = stmt {
        inspect_query(query, &mut meta);
    }

    let has_agg_call = meta
        .functions
        .iter()
        .any(|f| AGGREGATE_FUNCTIONS.contains(&f.to_uppercase().as_str()));
    meta.has_aggregations = meta.has_aggregations || has_agg_call;

    meta
}

fn statement_type(stmt: &Statement) -> &'static str {
    match stmt {
        Statement::Query(_) => "Query",
        Statement::Insert { .. } => "Insert",
        Statement::Update { .. } => "Update",
        Statement::Delete { .. } => "Delete",
        _ => "Other",
    }
}

fn inspect_query(query: &Query, meta: &mut SqlMetadata) {
    inspect_body(query.body.as_ref(), meta);
    if let Some(with) = &query.with {
        for cte in &with.cte_tables {
            inspect_query(&cte.query, meta);
        }
    }
}

fn inspect_body(body: &SetExpr, meta: &mut SqlMetadata) {
    match body {
        SetExpr::Select(select) => {
            for table in &select.from {
                inspect_table_with_joins(table, meta);
            }
            if let GroupByExpr::Expressions(exprs, _) = &select.group_by {
                if !exprs.is_empty() {
                    meta.has_aggregations = true;
                }
            }
        }
        SetExpr::Query(query) => inspect_query(query, meta),
        SetExpr::SetOperation { left, right, .. } => {
            inspect_body(left, meta);
            inspect_body(right, meta);
        }
        _ => {}
    }
}

fn inspect_table_with_joins(table: &TableWithJoins, meta: &mut SqlMetadata) {
    if !table.joins.is_empty() {
        meta.has_joins = true;
    }
    inspect_factor(&table.relation, meta);
    for join in &table.joins {
        inspect_factor(&join.relation, meta);
    }
}

fn inspect_factor(factor: &TableFactor, meta: &mut SqlMetadata) {
    match factor {
        TableFactor::Derived { subquery, .. } => {
            meta.has_subqueries = true;
            inspect_query(subquery, meta);
        }
        TableFactor::NestedJoin {
            table_with_joins, ..
        } => inspect_table_with_joins(table_with_joins, meta),
        _ => {}
    }
}

#[cfg(test)]
#[path = "metadata_test.rs"]
mod tests;
