//! Database schema reflection through the driver abstraction.
//!
//! Enumerates schemas, tables, columns, and keys. Individual tables that
//! fail to reflect are skipped with a recorded warning; reflection only
//! fails outright when nothing at all is reflectable.

use crate::error::{DbError, DbResult};
use crate::traits::Database;
use log::{debug, warn};
use scout_core::raw::{RawSchema, RawTable};
use scout_core::TableKey;
use std::collections::BTreeSet;

/// Vendor system schemas dropped regardless of configuration.
const SYSTEM_SCHEMAS: &[&str] = &[
    "information_schema",
    "pg_catalog",
    "pg_toast",
    "performance_schema",
    "mysql",
    "sys",
    "system",
];

/// Scope controls for one reflection pass.
#[derive(Debug, Clone, Default)]
pub struct ReflectionOptions {
    /// Whitelist; empty means all non-system schemas.
    pub include_schemas: Vec<String>,
    /// Blacklist applied after system filtering.
    pub exclude_schemas: Vec<String>,
    /// Deterministic cap on reflected tables (sorted by key); 0 means all.
    pub max_tables: usize,
}

/// Adapter that turns driver metadata lookups into a [`RawSchema`].
pub struct ReflectionAdapter<'a> {
    db: &'a dyn Database,
    options: ReflectionOptions,
}

impl<'a> ReflectionAdapter<'a> {
    pub fn new(db: &'a dyn Database, options: ReflectionOptions) -> Self {
        Self { db, options }
    }

    fn schema_allowed(&self, schema: &str) -> bool {
        let lower = schema.to_lowercase();
        if SYSTEM_SCHEMAS.contains(&lower.as_str()) {
            return false;
        }
        if self
            .options
            .exclude_schemas
            .iter()
            .any(|s| s.eq_ignore_ascii_case(schema))
        {
            return false;
        }
        if self.options.include_schemas.is_empty() {
            return true;
        }
        self.options
            .include_schemas
            .iter()
            .any(|s| s.eq_ignore_ascii_case(schema))
    }

    /// Reflect the database. Fails with `[D005]` only when zero tables are
    /// reflectable.
    pub async fn reflect(&self) -> DbResult<RawSchema> {
        let mut relations = self.db.list_relations().await?;
        relations.retain(|(schema, _)| self.schema_allowed(schema));
        relations.sort();
        if self.options.max_tables > 0 && relations.len() > self.options.max_tables {
            relations.truncate(self.options.max_tables);
        }

        let mut raw = RawSchema {
            dialect: self.db.dialect_name().to_string(),
            schemas: Vec::new(),
            tables: Default::default(),
            warnings: Vec::new(),
        };

        let mut schemas: BTreeSet<String> = BTreeSet::new();
        for (schema, table) in relations {
            debug!("reflecting {schema}.{table}");
            match self.reflect_table(&schema, &table).await {
                Ok(raw_table) => {
                    schemas.insert(schema.clone());
                    raw.tables.insert(TableKey::new(&schema, &table), raw_table);
                }
                Err(e) => {
                    warn!("skipping {schema}.{table}: {e}");
                    raw.warnings
                        .push(format!("partial reflection: skipped {schema}.{table} ({e})"));
                }
            }
        }
        raw.schemas = schemas.into_iter().collect();

        if raw.tables.is_empty() && !raw.warnings.is_empty() {
            return Err(DbError::ReflectionFailed(format!(
                "no tables reflectable ({} skipped)",
                raw.warnings.len()
            )));
        }
        Ok(raw)
    }

    async fn reflect_table(&self, schema: &str, table: &str) -> DbResult<RawTable> {
        let columns = self.db.table_columns(schema, table).await?;
        if columns.is_empty() {
            return Err(DbError::ReflectionFailed(format!(
                "{schema}.{table} has no reflectable columns"
            )));
        }
        // Keys and rowcount are best-effort; a table without readable
        // constraints still profiles usefully.
        let pk_cols = self.db.primary_key(schema, table).await.unwrap_or_else(|e| {
            debug!("no PK info for {schema}.{table}: {e}");
            Vec::new()
        });
        let fks = self.db.foreign_keys(schema, table).await.unwrap_or_else(|e| {
            debug!("no FK info for {schema}.{table}: {e}");
            Vec::new()
        });
        let approx_rowcount = self.db.approx_rowcount(schema, table).await.unwrap_or(None);

        Ok(RawTable {
            schema: schema.to_string(),
            name: table.to_string(),
            columns,
            pk_cols,
            fks,
            approx_rowcount,
        })
    }
}

#[cfg(test)]
#[path = "reflection_test.rs"]
mod tests;
