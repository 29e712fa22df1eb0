//! End-to-end planning scenarios over a live in-memory database: build a
//! card with the full pipeline, then plan against it.

use scout_core::config::ExplorerConfig;
use scout_core::plan::ClarificationCode;
use scout_intel::{BuildCaps, CardBuilder, HashEncoder, PlanRequest, Planner, RetrievalEngine};
use scout_db::DuckDbBackend;
use std::sync::Arc;

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
         INSERT INTO sales.customers VALUES (1, 'north'), (2, 'south'), (3, 'west');
         INSERT INTO sales.orders
         SELECT range,
                1 + range % 3,
                DATE '2024-01-01' + INTERVAL (range % 300) DAY,
                25.0 + range * 1.25
         FROM range(80);",
    )
    .unwrap();
    db
}

async fn build_engine() -> (Arc<scout_core::SchemaCard>, RetrievalEngine) {
    let db = seeded_backend();
    let config = ExplorerConfig::default();
    let builder = CardBuilder::new(&db, &config);
    let card = Arc::new(builder.build("e2e", BuildCaps::full()).await.unwrap());
    let engine = RetrievalEngine::build(
        Arc::clone(&card),
        Some(Arc::new(HashEncoder::default())),
        &config,
    );
    (card, engine)
}

#[tokio::test]
async fn test_revenue_by_region_for_2024() {
    let (card, engine) = build_engine().await;
    assert!(card.check_invariants().is_empty());

    let planner = Planner::new(Arc::clone(&card));
    let plan = planner.plan(
        &engine,
        &ExplorerConfig::default(),
        &PlanRequest::new("total revenue by region for 2024"),
    );

    assert_eq!(plan.main_table.as_ref().unwrap().as_str(), "sales.orders");
    assert_eq!(plan.join_plan.len(), 1);
    assert_eq!(plan.join_plan[0].left, "sales.orders.customer_id");
    assert_eq!(plan.join_plan[0].right, "sales.customers.id");
    assert!(plan
        .group_by_candidates
        .iter()
        .any(|c| c.table.as_str() == "sales.customers" && c.column == "region"));
    assert!(plan.filter_candidates.iter().any(|f| f.example.as_deref()
        == Some("sales.orders.order_date BETWEEN '2024-01-01' AND '2025-01-01'")));
    assert!(plan.clarifications.is_empty(), "{:?}", plan.clarifications);
    assert!(plan.confidence >= 0.6);
    assert!(plan.draft_sql.is_some());
}

#[tokio::test]
async fn test_top_customers_last_month_blocks() {
    let (card, engine) = build_engine().await;
    let planner = Planner::new(card);
    let plan = planner.plan(
        &engine,
        &ExplorerConfig::default(),
        &PlanRequest::new("top customers last month"),
    );
    assert!(plan
        .clarifications
        .iter()
        .any(|c| c.code == ClarificationCode::AmbiguousTimeRange && c.blocking));
    assert!(plan.draft_sql.is_none());
}

#[tokio::test]
async fn test_plan_twice_is_identical() {
    let (card, engine) = build_engine().await;
    let planner = Planner::new(card);
    let req = PlanRequest::new("total revenue by region for 2024");
    let a = planner.plan(&engine, &ExplorerConfig::default(), &req);
    let b = planner.plan(&engine, &ExplorerConfig::default(), &req);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}
