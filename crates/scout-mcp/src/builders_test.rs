use super::*;
use scout_core::config::ExplorerConfig;
use scout_core::testing::sales_card;
use std::sync::Arc;

#[test]
fn test_overview_counts_and_areas() {
    let card = sales_card();
    let overview = database_overview(&card, true, 8);
    assert_eq!(overview.table_count, 2);
    assert_eq!(overview.schemas, vec!["sales".to_string()]);
    assert_eq!(overview.subject_areas.len(), 1);
    assert_eq!(
        overview.most_connected_tables[0].as_str(),
        "sales.orders"
    );
}

#[test]
fn test_overview_without_areas() {
    let card = sales_card();
    let overview = database_overview(&card, false, 8);
    assert!(overview.subject_areas.is_empty());
}

#[test]
fn test_table_info_includes_relationships_both_ways() {
    let card = sales_card();

    let orders = table_info(
        &card,
        &TableKey::new("sales", "orders"),
        true,
        &[],
        5,
        None,
    )
    .unwrap();
    assert_eq!(orders.pk_cols, vec!["id".to_string()]);
    assert_eq!(orders.relationships.len(), 1);
    assert_eq!(
        orders.relationships[0].join_sql,
        "JOIN sales.customers ON sales.orders.customer_id = sales.customers.id"
    );

    // The referenced side sees the incoming edge.
    let customers = table_info(
        &card,
        &TableKey::new("sales", "customers"),
        true,
        &[],
        5,
        None,
    )
    .unwrap();
    assert_eq!(customers.relationships.len(), 1);
    assert_eq!(customers.relationships[0].ref_table.as_str(), "sales.orders");
}

#[test]
fn test_table_info_role_filter_and_samples() {
    let card = sales_card();
    let info = table_info(
        &card,
        &TableKey::new("sales", "customers"),
        true,
        &[ColumnRole::Category],
        2,
        None,
    )
    .unwrap();
    assert_eq!(info.columns.len(), 1);
    assert_eq!(info.columns[0].name, "region");
    assert_eq!(info.columns[0].sample_values.len(), 2);
    assert!(info
        .common_filters
        .iter()
        .any(|f| f.starts_with("sales.customers.region IN (")));
}

#[test]
fn test_table_info_unknown_key() {
    let card = sales_card();
    assert!(table_info(&card, &TableKey::new("sales", "nope"), true, &[], 5, None).is_none());
}

#[test]
fn test_column_hits_carry_types() {
    let card = Arc::new(sales_card());
    let engine = RetrievalEngine::build(Arc::clone(&card), None, &ExplorerConfig::default());
    let hits = column_hits(&card, &engine, "region", 10, None);
    assert!(!hits.is_empty());
    let hit = &hits[0];
    assert_eq!(hit.column, "region");
    assert_eq!(hit.vendor_type.as_deref(), Some("varchar"));
}
