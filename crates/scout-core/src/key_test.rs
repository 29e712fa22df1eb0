use super::*;

#[test]
fn test_parse_valid() {
    let key = TableKey::parse("sales.orders").unwrap();
    assert_eq!(key.schema(), "sales");
    assert_eq!(key.table(), "orders");
    assert_eq!(key.as_str(), "sales.orders");
}

#[test]
fn test_parse_dotted_table_name() {
    // First dot separates schema; the rest belongs to the table.
    let key = TableKey::parse("main.weird.name").unwrap();
    assert_eq!(key.schema(), "main");
    assert_eq!(key.table(), "weird.name");
}

#[test]
fn test_parse_rejects_bad_shapes() {
    assert!(TableKey::parse("orders").is_none());
    assert!(TableKey::parse(".orders").is_none());
    assert!(TableKey::parse("sales.").is_none());
    assert!(TableKey::parse("").is_none());
}

#[test]
fn test_serde_round_trip() {
    let key = TableKey::new("sales", "orders");
    let json = serde_json::to_string(&key).unwrap();
    assert_eq!(json, "\"sales.orders\"");
    let back: TableKey = serde_json::from_str(&json).unwrap();
    assert_eq!(back, key);
}

#[test]
fn test_deserialize_rejects_missing_schema() {
    let result: Result<TableKey, _> = serde_json::from_str("\"orders\"");
    assert!(result.is_err());
}

#[test]
fn test_ordering_is_lexical() {
    let a = TableKey::new("a", "z");
    let b = TableKey::new("b", "a");
    assert!(a < b);
}
