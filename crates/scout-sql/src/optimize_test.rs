use super::*;

fn schema_map() -> HashMap<String, Vec<String>> {
    let mut map = HashMap::new();
    map.insert(
        "sales.orders".to_string(),
        vec![
            "id".to_string(),
            "customer_id".to_string(),
            "amount".to_string(),
        ],
    );
    map.insert(
        "sales.customers".to_string(),
        vec!["id".to_string(), "region".to_string()],
    );
    map
}

#[test]
fn test_optimize_without_schema_map_renders_canonically() {
    let parser = SqlParser::new();
    let out = optimize(&parser, "select  1", SqlDialect::Generic, None).unwrap();
    assert_eq!(out.sql, "SELECT 1");
    assert_eq!(out.applied_rules, vec!["canonical-render"]);
}

#[test]
fn test_optimize_qualifies_unambiguous_columns() {
    let parser = SqlParser::new();
    let out = optimize(
        &parser,
        "SELECT amount, region FROM sales.orders JOIN sales.customers ON customer_id = sales.customers.id",
        SqlDialect::Generic,
        Some(&schema_map()),
    )
    .unwrap();
    assert!(out.applied_rules.contains(&"qualify-columns".to_string()));
    assert!(out.sql.contains("sales.orders.amount"));
    assert!(out.sql.contains("sales.customers.region"));
    // `id` exists on both tables and must stay untouched.
    assert!(!out.sql.contains("sales.orders.id"));
}

#[test]
fn test_optimize_notes_unknown_tables() {
    let parser = SqlParser::new();
    let out = optimize(
        &parser,
        "SELECT x FROM mystery_table",
        SqlDialect::Generic,
        Some(&schema_map()),
    )
    .unwrap();
    assert!(out.notes.iter().any(|n| n.contains("mystery_table")));
}

#[test]
fn test_optimize_rejects_multi_statement() {
    let parser = SqlParser::new();
    assert!(optimize(&parser, "SELECT 1; SELECT 2", SqlDialect::Generic, None).is_err());
}
