use super::*;
use scout_core::roles::SampledState;
use scout_core::testing::{column, table};

fn sample(columns: &[&str], rows: Vec<Vec<DbValue>>) -> SampleResult {
    SampleResult {
        columns: columns.iter().map(|c| c.to_string()).collect(),
        rows,
        state: SampledState::Full,
    }
}

fn text(s: &str) -> DbValue {
    DbValue::Text(s.to_string())
}

#[test]
fn test_pk_wins_over_everything() {
    let mut t = table("s", "t", vec![column("amount_id", "integer")]);
    t.columns[0].is_pk = true;
    let rows = (0..10).map(|i| vec![DbValue::Int(i)]).collect();
    Profiler::new(20).profile_table(&mut t, &sample(&["amount_id"], rows));
    assert_eq!(t.columns[0].role, Some(ColumnRole::Key));
}

#[test]
fn test_id_suffix_and_fk() {
    let mut t = table(
        "s",
        "t",
        vec![column("customer_id", "integer"), column("tracking_guid", "varchar")],
    );
    let rows = (0..5)
        .map(|i| vec![DbValue::Int(i), text(&format!("g-{i}"))])
        .collect();
    Profiler::new(20).profile_table(&mut t, &sample(&["customer_id", "tracking_guid"], rows));
    assert_eq!(t.columns[0].role, Some(ColumnRole::Id));
    assert_eq!(t.columns[1].role, Some(ColumnRole::Id));
}

#[test]
fn test_temporal_type() {
    let mut t = table("s", "t", vec![column("created", "timestamp")]);
    let rows = vec![vec![text("2024-01-01 00:00:00")], vec![text("2024-02-01 00:00:00")]];
    Profiler::new(20).profile_table(&mut t, &sample(&["created"], rows));
    assert_eq!(t.columns[0].role, Some(ColumnRole::Date));
    assert_eq!(
        t.columns[0].value_range,
        Some(("2024-01-01 00:00:00".to_string(), "2024-02-01 00:00:00".to_string()))
    );
    assert_eq!(t.n_dates, 1);
}

#[test]
fn test_metric_needs_cardinality_and_name() {
    let mut t = table(
        "s",
        "t",
        vec![column("amount", "decimal(18,2)"), column("flags", "integer")],
    );
    let rows: Vec<Vec<DbValue>> = (0..50)
        .map(|i| vec![DbValue::Float(i as f64 * 1.5), DbValue::Int(i % 3)])
        .collect();
    Profiler::new(20).profile_table(&mut t, &sample(&["amount", "flags"], rows));
    assert_eq!(t.columns[0].role, Some(ColumnRole::Metric));
    // High-cardinality requirement: three distinct flag values fall through
    // to the category rule.
    assert_eq!(t.columns[1].role, Some(ColumnRole::Category));
    assert_eq!(t.n_metrics, 1);
}

#[test]
fn test_low_cardinality_enumerates_values() {
    let mut t = table("s", "t", vec![column("status", "varchar")]);
    let rows: Vec<Vec<DbValue>> = (0..30)
        .map(|i| vec![text(if i % 2 == 0 { "open" } else { "closed" })])
        .collect();
    Profiler::new(20).profile_table(&mut t, &sample(&["status"], rows));
    assert_eq!(t.columns[0].role, Some(ColumnRole::Category));
    assert_eq!(
        t.columns[0].distinct_values,
        Some(vec!["closed".to_string(), "open".to_string()])
    );
}

#[test]
fn test_long_text_role() {
    let mut t = table("s", "t", vec![column("description", "varchar")]);
    let long = "a sufficiently long free text value that goes on and on";
    let rows: Vec<Vec<DbValue>> = (0..40)
        .map(|i| vec![text(&format!("{long} {i}"))])
        .collect();
    Profiler::new(20).profile_table(&mut t, &sample(&["description"], rows));
    assert_eq!(t.columns[0].role, Some(ColumnRole::Text));
}

#[test]
fn test_null_rate_and_distinct_ratio() {
    let mut t = table("s", "t", vec![column("maybe", "varchar")]);
    let rows = vec![
        vec![text("a")],
        vec![DbValue::Null],
        vec![text("b")],
        vec![DbValue::Null],
    ];
    Profiler::new(20).profile_table(&mut t, &sample(&["maybe"], rows));
    assert_eq!(t.columns[0].null_rate, Some(0.5));
    assert_eq!(t.columns[0].distinct_ratio, Some(0.5));
}

#[test]
fn test_email_pattern_detection() {
    let mut t = table("s", "t", vec![column("contact", "varchar")]);
    let rows: Vec<Vec<DbValue>> = (0..10)
        .map(|i| vec![text(&format!("user{i}@example.com"))])
        .collect();
    Profiler::new(20).profile_table(&mut t, &sample(&["contact"], rows));
    assert_eq!(t.columns[0].sample_patterns, vec!["email-like".to_string()]);
}

#[test]
fn test_numeric_range_recorded() {
    let mut t = table("s", "t", vec![column("price", "double")]);
    let rows: Vec<Vec<DbValue>> = (1..=60).map(|i| vec![DbValue::Float(i as f64)]).collect();
    Profiler::new(20).profile_table(&mut t, &sample(&["price"], rows));
    assert_eq!(
        t.columns[0].value_range,
        Some(("1".to_string(), "60".to_string()))
    );
}

#[test]
fn test_empty_sample_leaves_stats_unset() {
    let mut t = table("s", "t", vec![column("anything", "varchar")]);
    Profiler::new(20).profile_table(
        &mut t,
        &SampleResult {
            columns: vec!["anything".to_string()],
            rows: Vec::new(),
            state: SampledState::None,
        },
    );
    assert_eq!(t.columns[0].null_rate, None);
    assert_eq!(t.columns[0].distinct_ratio, None);
    // No sample means no cardinality evidence; the fallback applies.
    assert_eq!(t.columns[0].role, Some(ColumnRole::Category));
}
