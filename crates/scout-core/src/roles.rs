//! Column roles, table archetypes, and retrieval approaches.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic role assigned to a column by the profiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnRole {
    /// Part of the primary key.
    Key,
    /// Identifier column (FK or id-suffixed name) that is not a PK.
    Id,
    /// Temporal column.
    Date,
    /// Numeric measure.
    Metric,
    /// Low-cardinality categorical value.
    Category,
    /// Free-form text.
    Text,
}

impl ColumnRole {
    /// Priority used when selecting output columns; lower sorts first.
    pub fn select_priority(self) -> u8 {
        match self {
            ColumnRole::Date => 0,
            ColumnRole::Metric => 1,
            ColumnRole::Category => 2,
            ColumnRole::Key => 3,
            ColumnRole::Id => 4,
            ColumnRole::Text => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColumnRole::Key => "key",
            ColumnRole::Id => "id",
            ColumnRole::Date => "date",
            ColumnRole::Metric => "metric",
            ColumnRole::Category => "category",
            ColumnRole::Text => "text",
        }
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dimensional-modeling archetype assigned to a table by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableArchetype {
    Fact,
    Dimension,
    Bridge,
    Reference,
    Operational,
}

impl TableArchetype {
    pub fn as_str(self) -> &'static str {
        match self {
            TableArchetype::Fact => "fact",
            TableArchetype::Dimension => "dimension",
            TableArchetype::Bridge => "bridge",
            TableArchetype::Reference => "reference",
            TableArchetype::Operational => "operational",
        }
    }
}

impl fmt::Display for TableArchetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Retrieval strategy for table discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RetrievalApproach {
    #[serde(rename = "lexical")]
    Lexical,
    #[serde(rename = "emb_table")]
    EmbeddingTable,
    #[serde(rename = "emb_column")]
    EmbeddingColumn,
    #[serde(rename = "combo")]
    #[default]
    Combined,
}

impl RetrievalApproach {
    /// Parse the wire name used by the tool surface.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "lexical" => Some(RetrievalApproach::Lexical),
            "emb_table" => Some(RetrievalApproach::EmbeddingTable),
            "emb_column" => Some(RetrievalApproach::EmbeddingColumn),
            "combo" | "combined" => Some(RetrievalApproach::Combined),
            _ => None,
        }
    }
}

/// How much of a table's sample arrived before the deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SampledState {
    /// The full requested sample was drawn.
    Full,
    /// The sample timed out; whatever arrived was kept.
    Partial,
    /// No sampling was attempted (fast-start) or nothing arrived.
    #[default]
    None,
}
