use super::*;
use crate::retrieval::RetrievalEngine;
use scout_core::testing::sales_card;

fn setup() -> (Arc<SchemaCard>, RetrievalEngine) {
    let card = Arc::new(sales_card());
    let engine = RetrievalEngine::build(Arc::clone(&card), None, &ExplorerConfig::default());
    (card, engine)
}

fn plan_for(request: &str) -> PlanResult {
    let (card, engine) = setup();
    let planner = Planner::new(card);
    planner.plan(
        &engine,
        &ExplorerConfig::default(),
        &PlanRequest::new(request),
    )
}

#[test]
fn test_revenue_by_region_scenario() {
    let plan = plan_for("total revenue by region for 2024");

    assert_eq!(plan.main_table.as_ref().unwrap().as_str(), "sales.orders");
    assert_eq!(
        plan.join_plan,
        vec![JoinEdge {
            left: "sales.orders.customer_id".to_string(),
            right: "sales.customers.id".to_string(),
        }]
    );
    assert!(plan
        .group_by_candidates
        .iter()
        .any(|c| c.table.as_str() == "sales.customers" && c.column == "region"));
    assert!(plan.filter_candidates.iter().any(|f| {
        f.example.as_deref()
            == Some("sales.orders.order_date BETWEEN '2024-01-01' AND '2025-01-01'")
    }));
    assert!(plan.clarifications.is_empty(), "{:?}", plan.clarifications);
    assert!(plan.confidence >= 0.6, "confidence {}", plan.confidence);
    let draft = plan.draft_sql.expect("draft sql emitted");
    assert!(draft.starts_with("SELECT "));
    assert!(!draft.contains('*'));
    assert!(draft.contains("JOIN sales.customers ON sales.orders.customer_id = sales.customers.id"));
    assert!(draft.contains("WHERE sales.orders.order_date BETWEEN '2024-01-01' AND '2025-01-01'"));
}

#[test]
fn test_relative_time_blocks_draft() {
    let plan = plan_for("top customers last month");

    let codes: Vec<ClarificationCode> = plan.clarifications.iter().map(|c| c.code).collect();
    assert!(codes.contains(&ClarificationCode::AmbiguousTimeRange));
    assert!(plan
        .clarifications
        .iter()
        .find(|c| c.code == ClarificationCode::AmbiguousTimeRange)
        .unwrap()
        .blocking);
    assert!(plan.draft_sql.is_none());
}

#[test]
fn test_planning_is_deterministic() {
    let a = plan_for("total revenue by region for 2024");
    let b = plan_for("total revenue by region for 2024");
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn test_join_plan_references_only_relevant_tables() {
    let plan = plan_for("total revenue by region for 2024");
    let tables: Vec<String> = plan
        .relevant_tables
        .iter()
        .map(|t| t.table.to_string())
        .collect();
    for edge in &plan.join_plan {
        for qualified in [&edge.left, &edge.right] {
            let (table, _) = qualified.rsplit_once('.').unwrap();
            assert!(tables.iter().any(|t| t == table), "{qualified} not in {tables:?}");
        }
    }
}

#[test]
fn test_key_columns_cover_pk_and_join_columns() {
    let plan = plan_for("total revenue by region for 2024");
    let orders = &plan.key_columns[&TableKey::new("sales", "orders")];
    assert!(orders.contains(&"id".to_string()));
    assert!(orders.contains(&"customer_id".to_string()));
    let customers = &plan.key_columns[&TableKey::new("sales", "customers")];
    assert!(customers.contains(&"id".to_string()));
}

#[test]
fn test_no_metric_clarification() {
    // A card with no measures anywhere.
    let mut card = sales_card();
    {
        let orders = card.tables.get_mut("sales.orders").unwrap();
        orders.columns[3].role = Some(scout_core::ColumnRole::Category);
        orders.n_metrics = 0;
        orders.archetype = Some(scout_core::TableArchetype::Operational);
    }
    let card = Arc::new(card);
    let engine = RetrievalEngine::build(Arc::clone(&card), None, &ExplorerConfig::default());
    let planner = Planner::new(Arc::clone(&card));
    let plan = planner.plan(
        &engine,
        &ExplorerConfig::default(),
        &PlanRequest::new("total revenue by customer for 2024"),
    );
    assert!(plan
        .clarifications
        .iter()
        .any(|c| c.code == ClarificationCode::NoMetric));
    assert!(plan.draft_sql.is_none());
}

#[test]
fn test_empty_request_yields_no_tables_clarification() {
    let plan = plan_for("zzzz qqqq");
    assert!(plan.relevant_tables.is_empty());
    assert_eq!(plan.confidence, 0.0);
    assert_eq!(plan.clarifications.len(), 1);
    assert_eq!(plan.clarifications[0].code, ClarificationCode::NoTables);
    assert!(plan.draft_sql.is_none());
}

#[test]
fn test_constraints_echoed_into_assumptions() {
    let (card, engine) = setup();
    let planner = Planner::new(card);
    let mut req = PlanRequest::new("revenue by region for 2024");
    req.constraints
        .insert("fiscal_calendar".to_string(), "4-4-5".to_string());
    let plan = planner.plan(&engine, &ExplorerConfig::default(), &req);
    assert!(plan
        .assumptions
        .iter()
        .any(|a| a.contains("fiscal_calendar=4-4-5")));
}

#[test]
fn test_selected_columns_respect_budget() {
    let (card, engine) = setup();
    let planner = Planner::new(card);
    let mut req = PlanRequest::new("total revenue by region for 2024");
    req.budget.columns_per_table = 1;
    let plan = planner.plan(&engine, &ExplorerConfig::default(), &req);
    let orders_cols: Vec<&str> = plan
        .selected_columns
        .iter()
        .filter(|c| c.table.as_str() == "sales.orders")
        .map(|c| c.column.as_str())
        .collect();
    // PK plus the single highest-priority column (the date).
    assert_eq!(orders_cols, vec!["id", "order_date"]);
}
