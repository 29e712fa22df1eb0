//! Database trait definition

use crate::error::DbResult;
use crate::value::QueryOutput;
use async_trait::async_trait;
use scout_core::raw::{RawColumn, RawFk};

/// Read-only database abstraction for schemascout
///
/// The service never mutates the target database, so the surface is
/// queries plus the metadata lookups reflection needs. Implementations
/// must be Send + Sync for async operation.
#[async_trait]
pub trait Database: Send + Sync {
    /// Run a SELECT and return up to `max_rows` rows with column
    /// descriptors. Implementations must not fetch unboundedly past the
    /// limit.
    async fn query(&self, sql: &str, max_rows: usize) -> DbResult<QueryOutput>;

    /// Cheap connectivity probe (SELECT 1).
    async fn ping(&self) -> DbResult<()>;

    /// List `(schema, table)` pairs for base tables, sorted.
    async fn list_relations(&self) -> DbResult<Vec<(String, String)>>;

    /// Columns of one table in ordinal order, vendor types as strings.
    async fn table_columns(&self, schema: &str, table: &str) -> DbResult<Vec<RawColumn>>;

    /// Primary key column names of one table.
    async fn primary_key(&self, schema: &str, table: &str) -> DbResult<Vec<String>>;

    /// Outgoing foreign keys of one table.
    async fn foreign_keys(&self, schema: &str, table: &str) -> DbResult<Vec<RawFk>>;

    /// Estimated row count, when the engine tracks one.
    async fn approx_rowcount(&self, schema: &str, table: &str) -> DbResult<Option<u64>>;

    /// Driver dialect identifier for logging and dialect mapping.
    fn dialect_name(&self) -> &'static str;
}
