//! Typed results and error taxonomy for guarded execution.
//!
//! Every failure mode visible to callers is a value in this taxonomy, not
//! an exception: tools always shape one of these structures.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Broad failure class, matching the surface where it is raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Readiness,
    Input,
    Safety,
    Parse,
    Runtime,
    Truncation,
    Coverage,
}

/// Stable machine-readable error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ServiceNotReady,
    InvalidTableKey,
    UnknownDialect,
    NonSelectStatement,
    MultiStatement,
    ParseError,
    UnresolvedIdentifier,
    TypeMismatch,
    DriverError,
    Timeout,
    ResultTruncated,
    AmbiguousIntent,
    NoDateDimension,
    NoMetric,
}

impl ErrorCode {
    pub fn category(self) -> ErrorCategory {
        match self {
            ErrorCode::ServiceNotReady => ErrorCategory::Readiness,
            ErrorCode::InvalidTableKey | ErrorCode::UnknownDialect => ErrorCategory::Input,
            ErrorCode::NonSelectStatement | ErrorCode::MultiStatement => ErrorCategory::Safety,
            ErrorCode::ParseError | ErrorCode::UnresolvedIdentifier => ErrorCategory::Parse,
            ErrorCode::TypeMismatch | ErrorCode::DriverError | ErrorCode::Timeout => {
                ErrorCategory::Runtime
            }
            ErrorCode::ResultTruncated => ErrorCategory::Truncation,
            ErrorCode::AmbiguousIntent | ErrorCode::NoDateDimension | ErrorCode::NoMetric => {
                ErrorCategory::Coverage
            }
        }
    }

    /// Whether the caller can expect a retry with adjusted input to work.
    pub fn recoverable(self) -> bool {
        !matches!(self, ErrorCode::NonSelectStatement | ErrorCode::MultiStatement)
    }
}

/// Structured error payload surfaced to tool callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolError {
    pub category: ErrorCategory,
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<String>,
    pub recoverable: bool,
}

impl ToolError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            category: code.category(),
            code,
            message: message.into(),
            hints: Vec::new(),
            recoverable: code.recoverable(),
        }
    }

    pub fn with_hints(mut self, hints: Vec<String>) -> Self {
        self.hints = hints;
        self
    }
}

/// Advisory next step attached to execution results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NextAction {
    #[default]
    None,
    RefinePlan,
    Paginate,
    InspectTable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecuteStatus {
    Ok,
    Error,
}

/// Column descriptor on an execution result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultColumn {
    pub name: String,
    pub vendor_type: String,
}

/// Result of `execute_query`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteResult {
    /// The normalized SQL actually sent to the driver.
    pub sql: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validation_notes: Vec<String>,
    pub columns: Vec<ResultColumn>,
    /// Rows as JSON objects keyed by column name, already truncated to the
    /// row limit and per-cell character budget.
    pub rows: Vec<serde_json::Map<String, Value>>,
    pub rows_returned: usize,
    pub truncated: bool,
    pub status: ExecuteStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
    pub next_action: NextAction,
}

impl ExecuteResult {
    /// Shape an error result that never reached (or failed inside) the
    /// driver.
    pub fn failure(sql: impl Into<String>, error: ToolError, next_action: NextAction) -> Self {
        Self {
            sql: sql.into(),
            validation_notes: Vec::new(),
            columns: Vec::new(),
            rows: Vec::new(),
            rows_returned: 0,
            truncated: false,
            status: ExecuteStatus::Error,
            error: Some(error),
            next_action,
        }
    }
}

#[cfg(test)]
#[path = "execute_test.rs"]
mod tests;
