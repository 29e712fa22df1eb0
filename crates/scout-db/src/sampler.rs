//! Bounded, time-budgeted table sampling.
//!
//! Draws up to a fixed number of rows per table through the driver. On
//! timeout the sampler returns whatever arrived (possibly nothing) and
//! marks the sample partial. Raw rows are handed to the profiler and not
//! retained anywhere else.

use crate::traits::Database;
use crate::value::DbValue;
use log::debug;
use scout_core::roles::SampledState;
use std::time::Duration;
use tokio::time::timeout;

/// A drawn sample for one table.
#[derive(Debug, Default)]
pub struct SampleResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<DbValue>>,
    pub state: SampledState,
}

impl SampleResult {
    /// Values of one column across the sample, by column name.
    pub fn column_values(&self, name: &str) -> Vec<&DbValue> {
        match self.columns.iter().position(|c| c == name) {
            Some(idx) => self.rows.iter().map(|row| &row[idx]).collect(),
            None => Vec::new(),
        }
    }
}

/// Sampler with a per-table row cap and deadline.
pub struct Sampler {
    per_table_rows: usize,
    deadline: Duration,
}

impl Sampler {
    pub fn new(per_table_rows: usize, timeout_secs: u64) -> Self {
        Self {
            per_table_rows,
            deadline: Duration::from_secs(timeout_secs),
        }
    }

    /// Sample one table with explicit column selection. A failed or
    /// timed-out draw degrades to an empty or partial sample rather than
    /// erroring; profiling proceeds on whatever is present.
    pub async fn sample_table(
        &self,
        db: &dyn Database,
        schema: &str,
        table: &str,
        columns: &[String],
    ) -> SampleResult {
        if columns.is_empty() {
            return SampleResult::default();
        }

        let col_list = columns
            .iter()
            .map(|c| quote_ident(c))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT {col_list} FROM {}.{} LIMIT {}",
            quote_ident(schema),
            quote_ident(table),
            self.per_table_rows
        );

        match timeout(self.deadline, db.query(&sql, self.per_table_rows)).await {
            Ok(Ok(output)) => SampleResult {
                columns: columns.to_vec(),
                rows: output.rows,
                state: SampledState::Full,
            },
            Ok(Err(e)) => {
                debug!("sampling failed for {schema}.{table}: {e}");
                SampleResult {
                    columns: columns.to_vec(),
                    rows: Vec::new(),
                    state: SampledState::None,
                }
            }
            Err(_) => {
                debug!(
                    "sampling timed out for {schema}.{table} after {:?}",
                    self.deadline
                );
                SampleResult {
                    columns: columns.to_vec(),
                    rows: Vec::new(),
                    state: SampledState::Partial,
                }
            }
        }
    }

}

/// Double-quote an identifier, escaping embedded quotes.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

#[cfg(test)]
#[path = "sampler_test.rs"]
mod tests;
