//! Typed results for the planning and discovery tools.

use crate::key::TableKey;
use crate::roles::ColumnRole;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lifecycle phase published by the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InitPhase {
    Idle,
    Starting,
    Running,
    Ready,
    Failed,
    Stopped,
}

/// Snapshot of initialization state for `get_init_status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitStatus {
    pub phase: InitPhase,
    pub attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Subject area record for overview responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectAreaItem {
    pub id: String,
    pub name: String,
    pub tables: Vec<TableKey>,
    pub summary: String,
}

/// High-level database overview returned by `get_database_overview`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseOverview {
    pub dialect: String,
    pub schemas: Vec<String>,
    pub table_count: usize,
    pub subject_areas: Vec<SubjectAreaItem>,
    /// Highest-centrality tables, most joined-to first.
    pub most_connected_tables: Vec<TableKey>,
}

/// Whether a table entered the plan from retrieval or graph expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpansionOrigin {
    Seed,
    Expanded,
}

/// Per-component score breakdown for a ranked table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreComponents {
    pub lexical: f64,
    pub embedding: f64,
    pub centrality: f64,
    pub archetype_bonus: f64,
    pub origin: ExpansionOrigin,
}

/// A table selected for a plan, with its combined score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedTable {
    pub table: TableKey,
    pub score: f64,
    pub components: ScoreComponents,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// One join edge as a pair of fully-qualified columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinEdge {
    /// `schema.table.column` on the near side.
    pub left: String,
    /// `schema.table.column` on the far side.
    pub right: String,
}

/// Suggested predicate shape for a filter candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredicateShape {
    Eq,
    In,
    Between,
    /// Half-open range, `>= lo AND < hi`.
    Range,
}

/// A column worth filtering on, with its evidence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterCandidate {
    pub table: TableKey,
    pub column: String,
    pub predicate: PredicateShape,
    /// Enumerated values when the profiler captured them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    /// A ready-to-edit predicate, e.g.
    /// `sales.orders.order_date BETWEEN '2024-01-01' AND '2025-01-01'`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

/// A suggested select-list column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectedColumn {
    pub table: TableKey,
    pub column: String,
    pub role: ColumnRole,
}

/// Machine-readable reason a clarification was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClarificationCode {
    AmbiguousIntent,
    AmbiguousTimeRange,
    NoDateDimension,
    NoMetric,
    MultipleDateCandidates,
    UnjoinableSubset,
    NoTables,
}

/// A question the caller should resolve before trusting the plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clarification {
    pub question: String,
    pub code: ClarificationCode,
    /// Blocking clarifications suppress draft SQL.
    pub blocking: bool,
}

/// Structured plan returned by `plan_query_for_intent`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanResult {
    /// The request text, echoed.
    pub request: String,
    pub relevant_tables: Vec<RankedTable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_table: Option<TableKey>,
    /// Minimum spanning set of FK edges connecting the chosen tables.
    pub join_plan: Vec<JoinEdge>,
    /// Primary keys plus join columns, per table.
    pub key_columns: BTreeMap<TableKey, Vec<String>>,
    pub group_by_candidates: Vec<SelectedColumn>,
    pub filter_candidates: Vec<FilterCandidate>,
    pub selected_columns: Vec<SelectedColumn>,
    pub clarifications: Vec<Clarification>,
    pub assumptions: Vec<String>,
    pub confidence: f64,
    /// Present only when there are no clarifications and confidence is at
    /// least the draft threshold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft_sql: Option<String>,
}

/// Column detail for `get_table_info`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub vendor_type: String,
    pub nullable: bool,
    pub is_pk: bool,
    pub is_fk: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<ColumnRole>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sample_values: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<String>,
}

/// Relationship entry for `get_table_info`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipInfo {
    pub column: String,
    pub ref_table: TableKey,
    pub ref_column: String,
    /// A ready JOIN clause for the relationship.
    pub join_sql: String,
}

/// Detailed table response for `get_table_info`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableInfo {
    pub table: TableKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archetype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_area: Option<String>,
    pub columns: Vec<ColumnInfo>,
    pub pk_cols: Vec<String>,
    pub relationships: Vec<RelationshipInfo>,
    /// Commonly useful WHERE shapes derived from profiled constraints.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub common_filters: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approx_rowcount: Option<u64>,
}

/// Ranked hit for the `find_tables` debug tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableHit {
    pub table: TableKey,
    pub score: f64,
    pub lexical: f64,
    pub embedding: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Ranked hit for the `find_columns` debug tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableColumnHit {
    pub table: TableKey,
    pub column: String,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<ColumnRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_type: Option<String>,
}
