use super::*;

fn known_columns() -> Vec<String> {
    vec![
        "customer_id".to_string(),
        "order_date".to_string(),
        "amount".to_string(),
        "region".to_string(),
    ]
}

fn known_tables() -> Vec<String> {
    vec!["sales.orders".to_string(), "sales.customers".to_string()]
}

#[test]
fn test_edit_distance() {
    assert_eq!(edit_distance("custmr_id", "customer_id"), 2);
    assert_eq!(edit_distance("amount", "amount"), 0);
    assert_eq!(edit_distance("", "abc"), 3);
    assert_eq!(edit_distance("kitten", "sitting"), 3);
}

#[test]
fn test_unresolved_column_suggestion() {
    let parser = SqlParser::new();
    let assist = assist_error(
        &parser,
        "SELECT custmr_id FROM sales.orders",
        "Binder Error: Referenced column \"custmr_id\" not found in FROM clause",
        SqlDialect::Generic,
        &known_tables(),
        &known_columns(),
    );
    match assist.kind {
        AssistKind::UnresolvedColumn { name, suggestions } => {
            assert_eq!(name, "custmr_id");
            assert_eq!(suggestions, vec!["customer_id".to_string()]);
        }
        other => panic!("unexpected kind: {other:?}"),
    }
    assert!(assist
        .suggested_fixes
        .iter()
        .any(|f| f.contains("customer_id")));
}

#[test]
fn test_unresolved_table_suggestion() {
    let parser = SqlParser::new();
    let assist = assist_error(
        &parser,
        "SELECT id FROM sales.order",
        "Catalog Error: Table with name 'sales.order' does not exist",
        SqlDialect::Generic,
        &known_tables(),
        &known_columns(),
    );
    match assist.kind {
        AssistKind::UnresolvedTable { suggestions, .. } => {
            assert_eq!(suggestions, vec!["sales.orders".to_string()]);
        }
        other => panic!("unexpected kind: {other:?}"),
    }
}

#[test]
fn test_type_mismatch_classification() {
    let parser = SqlParser::new();
    let assist = assist_error(
        &parser,
        "SELECT amount FROM sales.orders WHERE amount > 'abc'",
        "Conversion Error: Could not convert string 'abc' to DECIMAL",
        SqlDialect::Generic,
        &known_tables(),
        &known_columns(),
    );
    assert_eq!(assist.kind, AssistKind::TypeMismatch);
}

#[test]
fn test_normalized_sql_present_when_parseable() {
    let parser = SqlParser::new();
    let assist = assist_error(
        &parser,
        "select amount from sales.orders",
        "some runtime failure",
        SqlDialect::Generic,
        &known_tables(),
        &known_columns(),
    );
    assert_eq!(
        assist.normalized_sql.as_deref(),
        Some("SELECT amount FROM sales.orders")
    );
    assert_eq!(assist.kind, AssistKind::Other);
}

#[test]
fn test_dialect_portability_fixes() {
    let parser = SqlParser::new();
    let assist = assist_error(
        &parser,
        "SELECT TOP 5 amount FROM sales.orders",
        "syntax error at or near TOP",
        SqlDialect::Postgres,
        &known_tables(),
        &known_columns(),
    );
    assert_eq!(assist.kind, AssistKind::Syntax);
    assert!(assist.suggested_fixes.iter().any(|f| f.contains("LIMIT")));
}
