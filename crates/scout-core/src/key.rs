//! Strongly-typed table key in `schema.table` form.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Fully-qualified table identifier, always `"<schema>.<name>"`.
///
/// The invariant (non-empty schema and name, joined by a single dot) is
/// enforced at construction; everything downstream can treat the key as an
/// opaque ordered string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TableKey(String);

impl TableKey {
    /// Build a key from schema and table name parts.
    ///
    /// # Panics
    ///
    /// Panics if either part is empty. Use [`Self::parse`] for untrusted
    /// input.
    pub fn new(schema: impl AsRef<str>, table: impl AsRef<str>) -> Self {
        let (schema, table) = (schema.as_ref(), table.as_ref());
        assert!(
            !schema.is_empty() && !table.is_empty(),
            "TableKey parts must not be empty"
        );
        Self(format!("{schema}.{table}"))
    }

    /// Parse a `"schema.table"` string, returning `None` when the shape is
    /// wrong. Table names may themselves contain dots; the first dot is the
    /// schema separator.
    pub fn parse(s: &str) -> Option<Self> {
        let (schema, table) = s.split_once('.')?;
        if schema.is_empty() || table.is_empty() {
            return None;
        }
        Some(Self(s.to_string()))
    }

    /// Schema part of the key.
    pub fn schema(&self) -> &str {
        self.0.split_once('.').map(|(s, _)| s).unwrap_or(&self.0)
    }

    /// Table part of the key.
    pub fn table(&self) -> &str {
        self.0.split_once('.').map(|(_, t)| t).unwrap_or(&self.0)
    }

    /// The full `schema.table` string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TableKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for TableKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for TableKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        TableKey::parse(&s)
            .ok_or_else(|| serde::de::Error::custom("TableKey must be '<schema>.<table>'"))
    }
}

#[cfg(test)]
#[path = "key_test.rs"]
mod tests;
