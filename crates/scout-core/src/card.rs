//! Schema card: the immutable, fingerprinted snapshot of reflected and
//! derived database metadata.

use crate::key::TableKey;
use crate::roles::{ColumnRole, SampledState, TableArchetype};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Foreign key target: the referenced table and its column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FkRef {
    pub table: TableKey,
    pub column: String,
}

/// Profile of a single column, combining reflected structure with
/// statistics derived from sampling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    /// Vendor type string, lowercased (e.g. `"varchar"`, `"decimal(18,2)"`).
    pub vendor_type: String,
    pub nullable: bool,
    #[serde(default)]
    pub is_pk: bool,
    #[serde(default)]
    pub is_fk: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fk_ref: Option<FkRef>,
    /// Proportion of NULLs in the sample, when sampled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub null_rate: Option<f64>,
    /// Distinct count over sample size, when sampled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distinct_ratio: Option<f64>,
    /// Detected surface patterns (`email-like`, `url-like`, ...).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sample_patterns: Vec<String>,
    /// Gazetteer tags (`person`, `organization`, `location`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub semantic_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<ColumnRole>,
    /// Enumerated distinct values for low-cardinality columns, capped by
    /// the profiler's value-constraint threshold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distinct_values: Option<Vec<String>>,
    /// `(min, max)` over sampled non-null values for numeric and date
    /// columns, rendered as strings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_range: Option<(String, String)>,
}

impl ColumnProfile {
    /// A bare structural profile, before any sampling or role inference.
    pub fn structural(name: impl Into<String>, vendor_type: impl Into<String>, nullable: bool) -> Self {
        Self {
            name: name.into(),
            vendor_type: vendor_type.into().to_lowercase(),
            nullable,
            is_pk: false,
            is_fk: false,
            fk_ref: None,
            null_rate: None,
            distinct_ratio: None,
            sample_patterns: Vec::new(),
            semantic_tags: Vec::new(),
            role: None,
            distinct_values: None,
            value_range: None,
        }
    }
}

/// Profile of a table: reflected structure plus derived classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableProfile {
    pub schema: String,
    pub name: String,
    /// Columns in database ordinal order.
    pub columns: Vec<ColumnProfile>,
    #[serde(default)]
    pub pk_cols: Vec<String>,
    /// Outgoing FK edges as `(local column, referenced table, referenced column)`.
    #[serde(default)]
    pub fks: Vec<(String, TableKey, String)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approx_rowcount: Option<u64>,
    #[serde(default)]
    pub sampled: SampledState,
    #[serde(default)]
    pub n_rows_sampled: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archetype: Option<TableArchetype>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_area: Option<String>,
    #[serde(default)]
    pub centrality: f64,
    #[serde(default)]
    pub n_metrics: usize,
    #[serde(default)]
    pub n_dates: usize,
    #[serde(default)]
    pub is_archive: bool,
    #[serde(default)]
    pub is_audit_like: bool,
}

impl TableProfile {
    pub fn key(&self) -> TableKey {
        TableKey::new(&self.schema, &self.name)
    }

    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Columns carrying the given role.
    pub fn columns_with_role(&self, role: ColumnRole) -> impl Iterator<Item = &ColumnProfile> {
        self.columns.iter().filter(move |c| c.role == Some(role))
    }
}

/// A community of tables partitioned from the FK graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectArea {
    pub name: String,
    pub tables: Vec<TableKey>,
    pub summary: String,
}

/// Build provenance recorded on every card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildMeta {
    pub version: String,
    pub embeddings_enabled: bool,
    /// True for the conservative fast-start build, false once enriched.
    pub fast_start: bool,
}

/// Immutable snapshot of everything the service knows about one database.
///
/// Cards are created once per reflection hash, never mutated, and replaced
/// wholesale when a rebuild produces a new hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaCard {
    /// Active SQL dialect name derived from the driver.
    pub dialect: String,
    /// Stable fingerprint of the connection target.
    pub connection_fingerprint: String,
    pub schemas: Vec<String>,
    pub subject_areas: BTreeMap<String, SubjectArea>,
    pub tables: BTreeMap<TableKey, TableProfile>,
    /// FK edge list as `(source table, target table, "src.col->dst.col")`.
    pub edges: Vec<(TableKey, TableKey, String)>,
    pub built_at: DateTime<Utc>,
    /// Content hash over reflected structure and profiling parameters.
    pub reflection_hash: String,
    pub build_meta: BuildMeta,
    /// Warnings accumulated during reflection (skipped tables etc).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl SchemaCard {
    pub fn table(&self, key: &TableKey) -> Option<&TableProfile> {
        self.tables.get(key)
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Verify the card's structural invariants, returning a violation
    /// description per problem found. An empty result means the card is
    /// internally consistent: every FK target resolves and every table
    /// belongs to exactly one subject area.
    pub fn check_invariants(&self) -> Vec<String> {
        let mut problems = Vec::new();
        for (key, profile) in &self.tables {
            for (col, ref_table, ref_col) in &profile.fks {
                match self.tables.get(ref_table) {
                    None => problems.push(format!(
                        "{key}.{col} references missing table {ref_table}"
                    )),
                    Some(target) if target.column(ref_col).is_none() => problems.push(format!(
                        "{key}.{col} references missing column {ref_table}.{ref_col}"
                    )),
                    Some(_) => {}
                }
            }
            let memberships = self
                .subject_areas
                .values()
                .filter(|area| area.tables.contains(key))
                .count();
            if memberships != 1 {
                problems.push(format!(
                    "{key} belongs to {memberships} subject areas, expected exactly 1"
                ));
            }
        }
        problems
    }
}

#[cfg(test)]
#[path = "card_test.rs"]
mod tests;
