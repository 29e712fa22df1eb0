//! Explorer configuration: everything that shapes card building and
//! query-time retrieval.

use serde::{Deserialize, Serialize};

/// Graph expansion strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExpanderKind {
    #[default]
    FkFollowing,
    Simple,
}

/// Tunables for schema exploration and planning.
///
/// The subset returned by [`Self::profiling_params`] participates in the
/// reflection hash; the subset in [`Self::planner_fingerprint`] keys the
/// cached retrieval engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplorerConfig {
    /// Schema whitelist; empty means all non-system schemas.
    pub include_schemas: Vec<String>,
    /// Schema blacklist applied after system-schema filtering.
    pub exclude_schemas: Vec<String>,
    /// Rows to sample per table.
    pub per_table_rows: usize,
    /// Per-table sampling deadline in seconds.
    pub sample_timeout_secs: u64,
    /// Cap on distinct values kept as an enumeration per column.
    pub value_constraint_threshold: usize,
    /// Communities smaller than this merge into a neighbor.
    pub min_area_size: usize,
    /// Coalesce communities whose tables are majority archive.
    pub merge_archive_areas: bool,
    pub expander: ExpanderKind,
    /// Exclude archive tables from expansion entirely.
    pub strict_archive_exclude: bool,
    /// Whether the embedding capability should be constructed at all.
    pub embeddings_enabled: bool,
    /// Build the per-column embedding index in addition to tables.
    pub build_column_index: bool,
    /// Columns per table considered for the column embedding index.
    pub max_cols_for_embeddings: usize,
    /// Table cap for the conservative fast-start build.
    pub max_tables_at_startup: usize,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            include_schemas: Vec::new(),
            exclude_schemas: Vec::new(),
            per_table_rows: 50,
            sample_timeout_secs: 15,
            value_constraint_threshold: 20,
            min_area_size: 2,
            merge_archive_areas: true,
            expander: ExpanderKind::FkFollowing,
            strict_archive_exclude: true,
            embeddings_enabled: true,
            build_column_index: true,
            max_cols_for_embeddings: 20,
            max_tables_at_startup: 300,
        }
    }
}

impl ExplorerConfig {
    /// The profiling parameters that feed the reflection hash. Sampling
    /// depth changes derived content (enumerations, ratios), so it belongs
    /// here; purely query-time knobs do not.
    pub fn profiling_params(&self) -> serde_json::Value {
        serde_json::json!({
            "per_table_rows": self.per_table_rows,
            "value_constraint_threshold": self.value_constraint_threshold,
            "min_area_size": self.min_area_size,
            "merge_archive_areas": self.merge_archive_areas,
        })
    }

    /// Fingerprint of the knobs that shape the retrieval engine. The cached
    /// engine is rebuilt when this or the reflection hash changes.
    pub fn planner_fingerprint(&self) -> String {
        format!(
            "emb={}|cols={}|maxcols={}|exp={:?}|strict={}",
            self.embeddings_enabled,
            self.build_column_index,
            self.max_cols_for_embeddings,
            self.expander,
            self.strict_archive_exclude,
        )
    }
}

/// Per-request budget for plan assembly.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlanBudget {
    pub tables: usize,
    pub columns_per_table: usize,
    pub sample_values: usize,
}

impl Default for PlanBudget {
    fn default() -> Self {
        Self {
            tables: 8,
            columns_per_table: 6,
            sample_values: 5,
        }
    }
}
