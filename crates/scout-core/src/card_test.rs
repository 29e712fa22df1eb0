use super::*;
use crate::testing::{column, sales_card, table};

#[test]
fn test_invariants_hold_for_fixture() {
    let card = sales_card();
    assert!(card.check_invariants().is_empty());
}

#[test]
fn test_invariants_catch_dangling_fk() {
    let mut card = sales_card();
    let orders = TableKey::new("sales", "orders");
    card.tables.get_mut(&orders).unwrap().fks.push((
        "warehouse_id".to_string(),
        TableKey::new("sales", "warehouses"),
        "id".to_string(),
    ));
    let problems = card.check_invariants();
    assert_eq!(problems.len(), 1);
    assert!(problems[0].contains("missing table"));
}

#[test]
fn test_invariants_catch_missing_fk_column() {
    let mut card = sales_card();
    let orders = TableKey::new("sales", "orders");
    card.tables.get_mut(&orders).unwrap().fks.push((
        "customer_id".to_string(),
        TableKey::new("sales", "customers"),
        "nope".to_string(),
    ));
    assert!(card
        .check_invariants()
        .iter()
        .any(|p| p.contains("missing column")));
}

#[test]
fn test_invariants_require_single_subject_area() {
    let mut card = sales_card();
    // Duplicate membership in a second area.
    let area = card.subject_areas.values().next().unwrap().clone();
    card.subject_areas.insert("deadbeef".to_string(), area);
    assert!(!card.check_invariants().is_empty());
}

#[test]
fn test_card_serde_round_trip() {
    let card = sales_card();
    let json = serde_json::to_string(&card).unwrap();
    let back: SchemaCard = serde_json::from_str(&json).unwrap();
    assert_eq!(back.reflection_hash, card.reflection_hash);
    assert_eq!(back.tables.len(), card.tables.len());
    assert_eq!(back.edges, card.edges);
    let orders = back.table(&TableKey::new("sales", "orders")).unwrap();
    assert_eq!(orders.archetype, Some(TableArchetype::Fact));
}

#[test]
fn test_columns_with_role() {
    let mut t = table("sales", "orders", vec![column("id", "integer")]);
    t.columns[0].role = Some(ColumnRole::Key);
    assert_eq!(t.columns_with_role(ColumnRole::Key).count(), 1);
    assert_eq!(t.columns_with_role(ColumnRole::Metric).count(), 0);
}
