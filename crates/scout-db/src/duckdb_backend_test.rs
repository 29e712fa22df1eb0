use super::*;

fn seeded_backend() -> DuckDbBackend {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch(
        "CREATE SCHEMA sales;
         CREATE TABLE sales.customers (id INTEGER PRIMARY KEY, region VARCHAR);
         CREATE TABLE sales.orders (
             id INTEGER PRIMARY KEY,
             customer_id INTEGER REFERENCES sales.customers(id),
             order_date DATE,
             amount DECIMAL(18,2)
         );
         INSERT INTO sales.customers VALUES (1, 'north'), (2, 'south');
         INSERT INTO sales.orders VALUES
             (1, 1, DATE '2024-01-05', 10.50),
             (2, 2, DATE '2024-02-06', 20.00),
             (3, 1, DATE '2024-03-07', 5.25);",
    )
    .unwrap();
    db
}

#[tokio::test]
async fn test_query_basic_types() {
    let db = seeded_backend();
    let out = db
        .query("SELECT 1 AS one, 'x' AS s, TRUE AS b, 1.5 AS f", 10)
        .await
        .unwrap();
    assert_eq!(out.rows.len(), 1);
    assert_eq!(out.rows[0][0], DbValue::Int(1));
    assert_eq!(out.rows[0][1], DbValue::Text("x".to_string()));
    assert_eq!(out.rows[0][2], DbValue::Bool(true));
    assert_eq!(out.rows[0][3], DbValue::Float(1.5));
    assert_eq!(out.columns[0].name, "one");
}

#[tokio::test]
async fn test_query_temporal_types_render_readably() {
    let db = seeded_backend();
    let out = db
        .query(
            "SELECT DATE '2024-01-05' AS d, TIMESTAMP '2024-01-05 06:30:00' AS ts",
            1,
        )
        .await
        .unwrap();
    assert_eq!(out.rows[0][0], DbValue::Text("2024-01-05".to_string()));
    assert_eq!(
        out.rows[0][1],
        DbValue::Text("2024-01-05 06:30:00".to_string())
    );
}

#[tokio::test]
async fn test_query_respects_max_rows() {
    let db = seeded_backend();
    let out = db
        .query("SELECT id FROM sales.orders ORDER BY id", 2)
        .await
        .unwrap();
    assert_eq!(out.rows.len(), 2);
}

#[tokio::test]
async fn test_query_missing_table_maps_to_not_found() {
    let db = seeded_backend();
    let err = db.query("SELECT * FROM sales.nope", 10).await.unwrap_err();
    assert!(err.is_not_found(), "unexpected error: {err}");
}

#[tokio::test]
async fn test_list_relations() {
    let db = seeded_backend();
    let relations = db.list_relations().await.unwrap();
    assert!(relations.contains(&("sales".to_string(), "orders".to_string())));
    assert!(relations.contains(&("sales".to_string(), "customers".to_string())));
}

#[tokio::test]
async fn test_table_columns_preserve_order_and_types() {
    let db = seeded_backend();
    let cols = db.table_columns("sales", "orders").await.unwrap();
    let names: Vec<&str> = cols.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["id", "customer_id", "order_date", "amount"]);
    assert!(cols[3].vendor_type.to_lowercase().starts_with("decimal"));
    assert!(!cols[0].nullable);
}

#[tokio::test]
async fn test_primary_key_and_foreign_keys() {
    let db = seeded_backend();
    let pk = db.primary_key("sales", "orders").await.unwrap();
    assert_eq!(pk, vec!["id".to_string()]);

    let fks = db.foreign_keys("sales", "orders").await.unwrap();
    assert_eq!(fks.len(), 1);
    assert_eq!(fks[0].column, "customer_id");
    assert_eq!(fks[0].ref_table.as_str(), "sales.customers");
    assert_eq!(fks[0].ref_column, "id");
}

#[tokio::test]
async fn test_ping() {
    let db = seeded_backend();
    db.ping().await.unwrap();
}
