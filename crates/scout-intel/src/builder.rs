//! Card building: reflection through classification in one pass.

use crate::classify::{classify_tables, flag_audit_like, summarize_table};
use crate::error::{BuildError, BuildResult};
use crate::graph::{assign_subject_areas, summarize_subject_areas, FkGraph};
use crate::profiler::Profiler;
use chrono::Utc;
use log::info;
use scout_core::card::{BuildMeta, ColumnProfile, FkRef, SchemaCard, TableProfile};
use scout_core::config::ExplorerConfig;
use scout_core::fingerprint::reflection_hash;
use scout_core::raw::RawSchema;
use scout_core::roles::SampledState;
use scout_core::TableKey;
use scout_db::{Database, ReflectionAdapter, ReflectionOptions, SampleResult, Sampler};
use std::collections::BTreeMap;

/// Scope caps for one build pass.
#[derive(Debug, Clone, Copy)]
pub struct BuildCaps {
    /// Table cap; 0 means unbounded.
    pub max_tables: usize,
    /// Whether to draw samples and run deep profiling.
    pub sampling: bool,
}

impl BuildCaps {
    /// Conservative caps for the fast-start build.
    pub fn fast_start(config: &ExplorerConfig) -> Self {
        Self {
            max_tables: config.max_tables_at_startup,
            sampling: false,
        }
    }

    /// Full-scope caps for enrichment.
    pub fn full() -> Self {
        Self {
            max_tables: 0,
            sampling: true,
        }
    }
}

/// Builds schema cards from a live database.
pub struct CardBuilder<'a> {
    db: &'a dyn Database,
    config: &'a ExplorerConfig,
}

impl<'a> CardBuilder<'a> {
    pub fn new(db: &'a dyn Database, config: &'a ExplorerConfig) -> Self {
        Self { db, config }
    }

    /// Build a complete card under the given caps.
    pub async fn build(
        &self,
        connection_fingerprint: &str,
        caps: BuildCaps,
    ) -> BuildResult<SchemaCard> {
        self.db.ping().await.map_err(BuildError::Connectivity)?;

        let adapter = ReflectionAdapter::new(
            self.db,
            ReflectionOptions {
                include_schemas: self.config.include_schemas.clone(),
                exclude_schemas: self.config.exclude_schemas.clone(),
                max_tables: caps.max_tables,
            },
        );
        let raw = adapter.reflect().await.map_err(BuildError::Reflection)?;
        let hash = reflection_hash(&raw, self.config);
        info!(
            "reflected {} tables in {} schemas (hash {hash})",
            raw.tables.len(),
            raw.schemas.len()
        );

        let mut tables = profiles_from_raw(&raw);

        if caps.sampling {
            let sampler = Sampler::new(self.config.per_table_rows, self.config.sample_timeout_secs);
            let profiler = Profiler::new(self.config.value_constraint_threshold);
            for profile in tables.values_mut() {
                let columns: Vec<String> =
                    profile.columns.iter().map(|c| c.name.clone()).collect();
                let sample = sampler
                    .sample_table(self.db, &profile.schema, &profile.name, &columns)
                    .await;
                profiler.profile_table(profile, &sample);
            }
        } else {
            // Fast start: structural roles only, no data-derived stats.
            let profiler = Profiler::new(self.config.value_constraint_threshold);
            let empty = SampleResult::default();
            for profile in tables.values_mut() {
                profiler.profile_table(profile, &empty);
                profile.sampled = SampledState::None;
            }
        }

        let graph = FkGraph::build(&tables);
        let centrality = graph.centrality();
        for (key, profile) in tables.iter_mut() {
            profile.centrality = centrality.get(key).copied().unwrap_or(0.0);
        }

        // Archive flags feed both area merging and classification.
        for (key, profile) in tables.iter_mut() {
            profile.is_archive = scout_core::text::is_archive_label(key.as_str());
        }

        let mut areas = assign_subject_areas(
            &mut tables,
            &graph,
            self.config.min_area_size,
            self.config.merge_archive_areas,
        );

        classify_tables(&mut tables);
        flag_audit_like(&mut tables);
        for profile in tables.values_mut() {
            profile.summary = Some(summarize_table(profile, &areas));
        }
        summarize_subject_areas(&mut areas, &tables);

        let edges = edges_from_tables(&tables);

        Ok(SchemaCard {
            dialect: raw.dialect.clone(),
            connection_fingerprint: connection_fingerprint.to_string(),
            schemas: raw.schemas.clone(),
            subject_areas: areas,
            tables,
            edges,
            built_at: Utc::now(),
            reflection_hash: hash,
            build_meta: BuildMeta {
                version: env!("CARGO_PKG_VERSION").to_string(),
                embeddings_enabled: self.config.embeddings_enabled,
                fast_start: !caps.sampling,
            },
            warnings: raw.warnings,
        })
    }

    /// Reflect and hash without building, for change detection.
    pub async fn current_reflection_hash(&self, caps: BuildCaps) -> BuildResult<String> {
        let adapter = ReflectionAdapter::new(
            self.db,
            ReflectionOptions {
                include_schemas: self.config.include_schemas.clone(),
                exclude_schemas: self.config.exclude_schemas.clone(),
                max_tables: caps.max_tables,
            },
        );
        let raw = adapter.reflect().await.map_err(BuildError::Reflection)?;
        Ok(reflection_hash(&raw, self.config))
    }
}

/// Turn raw reflection output into unprofiled table profiles, with FK
/// columns marked. FK targets pointing outside the reflected scope are
/// dropped so the card's resolution invariant holds under table caps.
fn profiles_from_raw(raw: &RawSchema) -> BTreeMap<TableKey, TableProfile> {
    let mut tables: BTreeMap<TableKey, TableProfile> = BTreeMap::new();
    for (key, raw_table) in &raw.tables {
        let columns: Vec<ColumnProfile> = raw_table
            .columns
            .iter()
            .map(|c| ColumnProfile::structural(&c.name, &c.vendor_type, c.nullable))
            .collect();
        let mut profile = TableProfile {
            schema: raw_table.schema.clone(),
            name: raw_table.name.clone(),
            columns,
            pk_cols: raw_table.pk_cols.clone(),
            fks: raw_table
                .fks
                .iter()
                .filter(|fk| raw.tables.contains_key(&fk.ref_table))
                .map(|fk| (fk.column.clone(), fk.ref_table.clone(), fk.ref_column.clone()))
                .collect(),
            approx_rowcount: raw_table.approx_rowcount,
            sampled: SampledState::None,
            n_rows_sampled: 0,
            archetype: None,
            summary: None,
            subject_area: None,
            centrality: 0.0,
            n_metrics: 0,
            n_dates: 0,
            is_archive: false,
            is_audit_like: false,
        };
        for pk in &profile.pk_cols.clone() {
            if let Some(column) = profile.columns.iter_mut().find(|c| &c.name == pk) {
                column.is_pk = true;
            }
        }
        let fks = profile.fks.clone();
        for (col, ref_table, ref_col) in &fks {
            if let Some(column) = profile.columns.iter_mut().find(|c| &c.name == col) {
                column.is_fk = true;
                column.fk_ref = Some(FkRef {
                    table: ref_table.clone(),
                    column: ref_col.clone(),
                });
            }
        }
        tables.insert(key.clone(), profile);
    }
    tables
}

fn edges_from_tables(
    tables: &BTreeMap<TableKey, TableProfile>,
) -> Vec<(TableKey, TableKey, String)> {
    let mut edges = Vec::new();
    for (key, profile) in tables {
        for (col, ref_table, ref_col) in &profile.fks {
            edges.push((
                key.clone(),
                ref_table.clone(),
                format!("{key}.{col}->{ref_table}.{ref_col}"),
            ));
        }
    }
    edges
}

#[cfg(test)]
#[path = "builder_test.rs"]
mod tests;
