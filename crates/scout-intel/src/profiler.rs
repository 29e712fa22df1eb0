//! Column profiling from sampled data.
//!
//! Role inference follows a fixed rule order so rebuilds are reproducible:
//! primary key, identifier, temporal, measure, low-cardinality category,
//! long text, then category as the fallback.

use crate::ner;
use regex::Regex;
use scout_core::card::{ColumnProfile, TableProfile};
use scout_core::roles::ColumnRole;
use scout_core::text::{normalize_identifier, MEASURE_HINT_TOKENS};
use scout_db::{DbValue, SampleResult};
use std::collections::BTreeSet;
use std::sync::OnceLock;

const DATE_TYPE_HINTS: &[&str] = &["date", "datetime", "time", "timestamp"];
const NUMERIC_TYPE_HINTS: &[&str] = &["int", "dec", "num", "float", "double", "real"];
const ID_NAME_SUFFIXES: &[&str] = &["id", "guid", "uuid", "key"];

/// Distinct-ratio floor for treating a numeric column as a measure.
const METRIC_DISTINCT_RATIO: f64 = 0.2;
/// Average string length above which a text-typed column is free text.
const TEXT_AVG_LEN: f64 = 32.0;
/// Values inspected for surface patterns and tags.
const PATTERN_SAMPLE_LIMIT: usize = 30;

struct Patterns {
    email: Regex,
    phone: Regex,
    url: Regex,
    percent: Regex,
}

fn patterns() -> &'static Patterns {
    static CELL: OnceLock<Patterns> = OnceLock::new();
    CELL.get_or_init(|| Patterns {
        email: Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern"),
        phone: Regex::new(r"^\+?\d[\d\-\s]{7,}\d$").expect("phone pattern"),
        url: Regex::new(r"^https?://").expect("url pattern"),
        percent: Regex::new(r"%$").expect("percent pattern"),
    })
}

fn is_numeric_type(vendor_type: &str) -> bool {
    let lower = vendor_type.to_lowercase();
    NUMERIC_TYPE_HINTS.iter().any(|hint| lower.contains(hint))
}

fn is_temporal_type(vendor_type: &str) -> bool {
    let lower = vendor_type.to_lowercase();
    DATE_TYPE_HINTS.iter().any(|hint| lower.contains(hint))
}

fn is_text_type(vendor_type: &str) -> bool {
    let lower = vendor_type.to_lowercase();
    lower.contains("char") || lower.contains("text") || lower.contains("clob") || lower.contains("string")
}

fn has_id_suffix(name: &str) -> bool {
    let collapsed: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    ID_NAME_SUFFIXES
        .iter()
        .any(|suffix| collapsed.ends_with(suffix))
}

fn name_suggests_measure(name: &str) -> bool {
    normalize_identifier(name)
        .split(' ')
        .any(|token| MEASURE_HINT_TOKENS.contains(&token))
}

/// Column profiler, parameterized by the enumeration cap.
pub struct Profiler {
    value_constraint_threshold: usize,
}

impl Profiler {
    pub fn new(value_constraint_threshold: usize) -> Self {
        Self {
            value_constraint_threshold,
        }
    }

    /// Profile every column of a table from its sample, updating roles,
    /// statistics, patterns, and value constraints in place. Derived
    /// per-table counts (metrics, dates) are refreshed as well.
    pub fn profile_table(&self, table: &mut TableProfile, sample: &SampleResult) {
        table.sampled = sample.state;
        table.n_rows_sampled = sample.rows.len();

        // Collect per-column values up front; `column_values` borrows the
        // sample, so the mutation loop over columns works on owned data.
        let per_column: Vec<Vec<DbValue>> = table
            .columns
            .iter()
            .map(|c| {
                sample
                    .column_values(&c.name)
                    .into_iter()
                    .cloned()
                    .collect()
            })
            .collect();

        for (column, values) in table.columns.iter_mut().zip(per_column) {
            self.profile_column(column, &values);
        }

        table.n_metrics = table.columns_with_role(ColumnRole::Metric).count();
        table.n_dates = table.columns_with_role(ColumnRole::Date).count();
    }

    fn profile_column(&self, column: &mut ColumnProfile, values: &[DbValue]) {
        let total = values.len();
        let non_null: Vec<&DbValue> = values.iter().filter(|v| !v.is_null()).collect();

        let distinct_count = {
            let mut seen: BTreeSet<String> = BTreeSet::new();
            for v in &non_null {
                if let Some(s) = v.display() {
                    seen.insert(s);
                }
            }
            seen.len()
        };

        if total > 0 {
            column.null_rate = Some((total - non_null.len()) as f64 / total as f64);
            column.distinct_ratio = Some(distinct_count as f64 / total as f64);
        }

        let avg_len = if non_null.is_empty() {
            0.0
        } else {
            non_null
                .iter()
                .filter_map(|v| v.display())
                .map(|s| s.len() as f64)
                .sum::<f64>()
                / non_null.len() as f64
        };
        column.role = Some(self.infer_role(column, distinct_count, total, avg_len));

        let strings: Vec<String> = non_null
            .iter()
            .take(PATTERN_SAMPLE_LIMIT)
            .filter_map(|v| v.display())
            .collect();
        column.sample_patterns = detect_patterns(&strings);
        column.semantic_tags = ner::tag_values(strings.iter().map(|s| s.as_str()));

        // Value constraints for low-cardinality columns.
        if !non_null.is_empty() && distinct_count <= self.value_constraint_threshold {
            let mut distinct: BTreeSet<String> = BTreeSet::new();
            for v in &non_null {
                if let Some(s) = v.display() {
                    distinct.insert(s);
                }
            }
            column.distinct_values = Some(distinct.into_iter().collect());
        }

        // Ranges for numeric and temporal columns from non-null samples.
        if is_numeric_type(&column.vendor_type) {
            let numbers: Vec<f64> = non_null.iter().filter_map(|v| v.as_f64()).collect();
            if let (Some(min), Some(max)) = (
                numbers.iter().cloned().reduce(f64::min),
                numbers.iter().cloned().reduce(f64::max),
            ) {
                column.value_range = Some((min.to_string(), max.to_string()));
            }
        } else if is_temporal_type(&column.vendor_type) {
            let mut dates: Vec<String> = non_null.iter().filter_map(|v| v.display()).collect();
            dates.sort();
            if let (Some(first), Some(last)) = (dates.first(), dates.last()) {
                column.value_range = Some((first.clone(), last.clone()));
            }
        }
    }

    fn infer_role(
        &self,
        column: &ColumnProfile,
        distinct_count: usize,
        total: usize,
        avg_len: f64,
    ) -> ColumnRole {
        if column.is_pk {
            return ColumnRole::Key;
        }
        if column.is_fk || has_id_suffix(&column.name) {
            return ColumnRole::Id;
        }
        if is_temporal_type(&column.vendor_type) {
            return ColumnRole::Date;
        }
        let distinct_ratio = if total > 0 {
            distinct_count as f64 / total as f64
        } else {
            0.0
        };
        if is_numeric_type(&column.vendor_type)
            && distinct_ratio > METRIC_DISTINCT_RATIO
            && name_suggests_measure(&column.name)
        {
            return ColumnRole::Metric;
        }
        if total > 0 && distinct_count <= self.value_constraint_threshold {
            return ColumnRole::Category;
        }
        if is_text_type(&column.vendor_type) && avg_len > TEXT_AVG_LEN {
            return ColumnRole::Text;
        }
        ColumnRole::Category
    }
}

fn detect_patterns(values: &[String]) -> Vec<String> {
    let pats = patterns();
    let mut found: Vec<String> = Vec::new();
    let mut push_once = |name: &str| {
        if !found.iter().any(|f| f == name) {
            found.push(name.to_string());
        }
    };
    for value in values {
        if pats.email.is_match(value) {
            push_once("email-like");
        } else if pats.url.is_match(value) {
            push_once("url-like");
        } else if pats.phone.is_match(value) {
            push_once("phone-like");
        } else if pats.percent.is_match(value) {
            push_once("percent-like");
        }
    }
    found
}

#[cfg(test)]
#[path = "profiler_test.rs"]
mod tests;
