use super::*;
use scout_core::card::SchemaCard;
use scout_core::roles::ColumnRole;
use scout_core::testing::{card_from_tables, column, sales_card, table};

fn hit(key: &str, score: f64) -> RetrievalHit {
    RetrievalHit {
        table: TableKey::parse(key).unwrap(),
        score,
        lexical: score,
        embedding: 0.0,
    }
}

/// orders -> customers -> regions chain plus an archive sibling.
fn chain_card() -> SchemaCard {
    let customers_key = TableKey::new("sales", "customers");
    let regions_key = TableKey::new("sales", "regions");

    let mut orders = table(
        "sales",
        "orders",
        vec![column("id", "integer"), column("customer_id", "integer"), column("amount", "decimal")],
    );
    orders.pk_cols = vec!["id".to_string()];
    orders.fks = vec![("customer_id".to_string(), customers_key.clone(), "id".to_string())];
    orders.columns[2].role = Some(ColumnRole::Metric);
    orders.n_metrics = 1;
    orders.archetype = Some(scout_core::TableArchetype::Fact);
    orders.centrality = 1.0;

    let mut customers = table(
        "sales",
        "customers",
        vec![column("id", "integer"), column("region_id", "integer")],
    );
    customers.pk_cols = vec!["id".to_string()];
    customers.fks = vec![("region_id".to_string(), regions_key.clone(), "id".to_string())];
    customers.archetype = Some(scout_core::TableArchetype::Dimension);
    customers.centrality = 0.7;

    let mut regions = table("sales", "regions", vec![column("id", "integer")]);
    regions.pk_cols = vec!["id".to_string()];
    regions.archetype = Some(scout_core::TableArchetype::Dimension);
    regions.centrality = 0.3;

    let mut archive = table("sales", "orders_archive", vec![column("id", "integer"), column("order_id", "integer")]);
    archive.fks = vec![("order_id".to_string(), TableKey::new("sales", "orders"), "id".to_string())];
    archive.is_archive = true;

    card_from_tables(vec![orders, customers, regions, archive])
}

#[test]
fn test_seeds_always_preserved() {
    let card = chain_card();
    let expander = GraphExpander::new(&card, &ExplorerConfig::default());
    let result = expander.expand(&[hit("sales.orders", 0.9)], 3);
    assert_eq!(result[0].table.as_str(), "sales.orders");
    assert!(matches!(result[0].origin, ExpansionOrigin::Seed));
}

#[test]
fn test_fk_following_reaches_depth_two() {
    let card = chain_card();
    let expander = GraphExpander::new(&card, &ExplorerConfig::default());
    let result = expander.expand(&[hit("sales.orders", 0.9)], 4);
    let keys: Vec<&str> = result.iter().map(|t| t.table.as_str()).collect();
    assert!(keys.contains(&"sales.customers"), "depth 1 neighbor");
    assert!(keys.contains(&"sales.regions"), "depth 2 neighbor");
}

#[test]
fn test_simple_strategy_stays_at_depth_one() {
    let card = chain_card();
    let config = ExplorerConfig {
        expander: ExpanderKind::Simple,
        ..ExplorerConfig::default()
    };
    let expander = GraphExpander::new(&card, &config);
    let result = expander.expand(&[hit("sales.orders", 0.9)], 4);
    let keys: Vec<&str> = result.iter().map(|t| t.table.as_str()).collect();
    assert!(keys.contains(&"sales.customers"));
    assert!(!keys.contains(&"sales.regions"));
}

#[test]
fn test_archive_excluded_by_default() {
    let card = chain_card();
    let expander = GraphExpander::new(&card, &ExplorerConfig::default());
    let result = expander.expand(&[hit("sales.orders", 0.9)], 10);
    assert!(!result.iter().any(|t| t.table.as_str() == "sales.orders_archive"));
}

#[test]
fn test_archive_included_when_not_strict() {
    let card = chain_card();
    let config = ExplorerConfig {
        strict_archive_exclude: false,
        ..ExplorerConfig::default()
    };
    let expander = GraphExpander::new(&card, &config);
    let result = expander.expand(&[hit("sales.orders", 0.9)], 10);
    assert!(result.iter().any(|t| t.table.as_str() == "sales.orders_archive"));
}

#[test]
fn test_budget_respected_and_dimension_preferred() {
    let card = chain_card();
    let expander = GraphExpander::new(&card, &ExplorerConfig::default());
    let result = expander.expand(&[hit("sales.orders", 0.9)], 2);
    assert_eq!(result.len(), 2);
    // The fact seed pulls the dimension at depth 1 in first.
    assert_eq!(result[1].table.as_str(), "sales.customers");
    assert!(result[1].utility > 0.0);
}

#[test]
fn test_expansion_from_sales_card() {
    let card = sales_card();
    let expander = GraphExpander::new(&card, &ExplorerConfig::default());
    let result = expander.expand(&[hit("sales.orders", 1.0)], 5);
    let keys: Vec<&str> = result.iter().map(|t| t.table.as_str()).collect();
    assert_eq!(keys, vec!["sales.orders", "sales.customers"]);
}

#[test]
fn test_unknown_seed_yields_empty() {
    let card = chain_card();
    let expander = GraphExpander::new(&card, &ExplorerConfig::default());
    assert!(expander.expand(&[hit("no.such", 1.0)], 3).is_empty());
}
