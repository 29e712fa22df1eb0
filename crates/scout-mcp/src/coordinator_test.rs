use super::*;
use scout_db::DuckDbBackend;

fn seeded_db() -> Arc<dyn Database> {
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
         INSERT INTO sales.customers VALUES (1, 'north');
         INSERT INTO sales.orders VALUES (1, 1, DATE '2024-03-01', 12.5);",
    )
    .unwrap();
    Arc::new(db)
}

fn test_config() -> ServiceConfig {
    ServiceConfig {
        database_url: ":memory:".to_string(),
        row_limit: 200,
        max_cell_chars: 200,
        sample_rows: 20,
        sample_timeout_secs: 5,
        embeddings_enabled: false,
        debug_tools: true,
        card_cache_dir: None,
    }
}

#[tokio::test]
async fn test_start_reaches_ready_then_enriches() {
    let coordinator = Coordinator::new(seeded_db(), &test_config());
    assert_eq!(coordinator.status().phase, InitPhase::Idle);

    coordinator.start();
    assert!(coordinator.ensure_ready(Duration::from_secs(10)).await);

    let status = coordinator.status();
    assert_eq!(status.phase, InitPhase::Ready);
    assert_eq!(status.attempts, 1);
    assert!(status.started_at.is_some());
    assert!(status.completed_at.is_some());

    let card = coordinator.card().unwrap();
    assert_eq!(card.table_count(), 2);

    // Shutdown joins the enrichment task; by then the sampled card has
    // replaced the fast-start one without regressing readiness.
    coordinator.shutdown().await;
    assert_eq!(coordinator.status().phase, InitPhase::Stopped);
    let enriched = coordinator.card().unwrap();
    assert!(!enriched.build_meta.fast_start);
    assert_eq!(enriched.reflection_hash, card.reflection_hash);
}

#[tokio::test]
async fn test_start_is_idempotent() {
    let coordinator = Coordinator::new(seeded_db(), &test_config());
    coordinator.start();
    coordinator.start();
    assert!(coordinator.ensure_ready(Duration::from_secs(10)).await);
    assert_eq!(coordinator.status().attempts, 1);
    coordinator.shutdown().await;
}

#[tokio::test]
async fn test_engine_cache_reused_for_same_card() {
    let coordinator = Coordinator::new(seeded_db(), &test_config());
    coordinator.start();
    assert!(coordinator.ensure_ready(Duration::from_secs(10)).await);
    coordinator.shutdown().await;

    let (card_a, engine_a) = coordinator.engine().unwrap();
    let (card_b, engine_b) = coordinator.engine().unwrap();
    assert!(Arc::ptr_eq(&card_a, &card_b));
    assert!(Arc::ptr_eq(&engine_a, &engine_b));
}

#[tokio::test]
async fn test_ensure_ready_times_out_before_start() {
    let coordinator = Coordinator::new(seeded_db(), &test_config());
    assert!(!coordinator.ensure_ready(Duration::from_millis(50)).await);
}

#[tokio::test]
async fn test_failed_connectivity_reports_failed() {
    struct BrokenDb;
    #[async_trait::async_trait]
    impl Database for BrokenDb {
        async fn query(
            &self,
            _sql: &str,
            _max_rows: usize,
        ) -> scout_db::DbResult<scout_db::QueryOutput> {
            Err(scout_db::DbError::ReflectionFailed("down".to_string()))
        }
        async fn ping(&self) -> scout_db::DbResult<()> {
            Err(scout_db::DbError::ReflectionFailed("down".to_string()))
        }
        async fn list_relations(&self) -> scout_db::DbResult<Vec<(String, String)>> {
            Err(scout_db::DbError::ReflectionFailed("down".to_string()))
        }
        async fn table_columns(
            &self,
            _schema: &str,
            _table: &str,
        ) -> scout_db::DbResult<Vec<scout_core::RawColumn>> {
            Err(scout_db::DbError::ReflectionFailed("down".to_string()))
        }
        async fn primary_key(
            &self,
            _schema: &str,
            _table: &str,
        ) -> scout_db::DbResult<Vec<String>> {
            Err(scout_db::DbError::ReflectionFailed("down".to_string()))
        }
        async fn foreign_keys(
            &self,
            _schema: &str,
            _table: &str,
        ) -> scout_db::DbResult<Vec<scout_core::RawFk>> {
            Err(scout_db::DbError::ReflectionFailed("down".to_string()))
        }
        async fn approx_rowcount(
            &self,
            _schema: &str,
            _table: &str,
        ) -> scout_db::DbResult<Option<u64>> {
            Ok(None)
        }
        fn dialect_name(&self) -> &'static str {
            "duckdb"
        }
    }

    let coordinator = Coordinator::new(Arc::new(BrokenDb), &test_config());
    coordinator.start();
    assert!(!coordinator.ensure_ready(Duration::from_secs(5)).await);
    let status = coordinator.status();
    assert_eq!(status.phase, InitPhase::Failed);
    assert!(status.error_message.unwrap().contains("[I002]"));
    coordinator.shutdown().await;
}
