//! Typed cell values returned by the driver layer.

use serde_json::Value;

/// A single cell value, reduced to the types the tool surface can carry.
#[derive(Debug, Clone, PartialEq)]
pub enum DbValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl DbValue {
    /// JSON form used in execution results. Text is truncated by the
    /// guardrail, not here.
    pub fn to_json(&self) -> Value {
        match self {
            DbValue::Null => Value::Null,
            DbValue::Bool(b) => Value::Bool(*b),
            DbValue::Int(n) => Value::from(*n),
            DbValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            DbValue::Text(s) => Value::String(s.clone()),
        }
    }

    /// Display form used by the profiler when inspecting sampled values.
    pub fn display(&self) -> Option<String> {
        match self {
            DbValue::Null => None,
            DbValue::Bool(b) => Some(b.to_string()),
            DbValue::Int(n) => Some(n.to_string()),
            DbValue::Float(f) => Some(f.to_string()),
            DbValue::Text(s) => Some(s.clone()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, DbValue::Null)
    }

    /// Numeric view for range computation.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DbValue::Int(n) => Some(*n as f64),
            DbValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

/// Column descriptor on a query result, vendor type preserved as a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultColumnDesc {
    pub name: String,
    pub vendor_type: String,
}

/// Rows and column descriptors from one query.
#[derive(Debug, Clone, Default)]
pub struct QueryOutput {
    pub columns: Vec<ResultColumnDesc>,
    pub rows: Vec<Vec<DbValue>>,
}

impl QueryOutput {
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }
}
