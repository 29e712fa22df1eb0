//! Raw reflection payloads, prior to profiling.
//!
//! These are the structures the reflection adapter hands to the card
//! builder. They use ordered maps so that serialization (and therefore the
//! reflection fingerprint) is deterministic.

use crate::key::TableKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A reflected column, with the vendor type preserved verbatim as a string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawColumn {
    pub name: String,
    pub vendor_type: String,
    pub nullable: bool,
}

/// A reflected outgoing foreign key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFk {
    pub column: String,
    pub ref_table: TableKey,
    pub ref_column: String,
}

/// A reflected table with its keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTable {
    pub schema: String,
    pub name: String,
    pub columns: Vec<RawColumn>,
    pub pk_cols: Vec<String>,
    pub fks: Vec<RawFk>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approx_rowcount: Option<u64>,
}

/// Complete reflection output for one database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSchema {
    /// Driver dialect name (e.g. `"duckdb"`).
    pub dialect: String,
    pub schemas: Vec<String>,
    pub tables: BTreeMap<TableKey, RawTable>,
    /// Per-table reflection problems that were skipped over.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl RawSchema {
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
