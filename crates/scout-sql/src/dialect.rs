//! SQL dialect registry and driver mapping.
//!
//! The accepted set is fixed; the active dialect is derived from the driver
//! name. Oracle has no sqlparser dialect and is parsed with the generic
//! dialect; validation notes record the approximation.

use crate::error::{SqlError, SqlResult};
use sqlparser::dialect::{
    BigQueryDialect, Dialect, GenericDialect, MsSqlDialect, MySqlDialect, PostgreSqlDialect,
    SQLiteDialect, SnowflakeDialect,
};
use std::fmt;

/// Accepted SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlDialect {
    Generic,
    Postgres,
    MySql,
    Sqlite,
    Tsql,
    Oracle,
    Snowflake,
    BigQuery,
}

impl SqlDialect {
    /// Every accepted dialect, in the order used for parse-trial detection.
    pub const ALL: &'static [SqlDialect] = &[
        SqlDialect::Generic,
        SqlDialect::Postgres,
        SqlDialect::MySql,
        SqlDialect::Sqlite,
        SqlDialect::Tsql,
        SqlDialect::Snowflake,
        SqlDialect::BigQuery,
        SqlDialect::Oracle,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SqlDialect::Generic => "generic",
            SqlDialect::Postgres => "postgres",
            SqlDialect::MySql => "mysql",
            SqlDialect::Sqlite => "sqlite",
            SqlDialect::Tsql => "tsql",
            SqlDialect::Oracle => "oracle",
            SqlDialect::Snowflake => "snowflake",
            SqlDialect::BigQuery => "bigquery",
        }
    }

    /// Parse a dialect name from the tool surface.
    pub fn from_name(name: &str) -> SqlResult<Self> {
        match name.to_lowercase().as_str() {
            "generic" | "sql" => Ok(SqlDialect::Generic),
            "postgres" | "postgresql" => Ok(SqlDialect::Postgres),
            "mysql" => Ok(SqlDialect::MySql),
            "sqlite" => Ok(SqlDialect::Sqlite),
            "tsql" | "mssql" | "sqlserver" => Ok(SqlDialect::Tsql),
            "oracle" => Ok(SqlDialect::Oracle),
            "snowflake" => Ok(SqlDialect::Snowflake),
            "bigquery" => Ok(SqlDialect::BigQuery),
            other => Err(SqlError::UnknownDialect {
                name: other.to_string(),
            }),
        }
    }

    /// Map a driver's dialect identifier onto the accepted set. Unknown
    /// drivers (DuckDB included) fall back to generic.
    pub fn from_driver(driver: &str) -> Self {
        Self::from_name(driver).unwrap_or(SqlDialect::Generic)
    }

    /// The sqlparser dialect used to parse this dialect.
    pub fn parser_dialect(self) -> Box<dyn Dialect> {
        match self {
            SqlDialect::Generic | SqlDialect::Oracle => Box::new(GenericDialect {}),
            SqlDialect::Postgres => Box::new(PostgreSqlDialect {}),
            SqlDialect::MySql => Box::new(MySqlDialect {}),
            SqlDialect::Sqlite => Box::new(SQLiteDialect {}),
            SqlDialect::Tsql => Box::new(MsSqlDialect {}),
            SqlDialect::Snowflake => Box::new(SnowflakeDialect {}),
            SqlDialect::BigQuery => Box::new(BigQueryDialect {}),
        }
    }

    /// Whether sqlparser only approximates this dialect.
    pub fn is_approximated(self) -> bool {
        matches!(self, SqlDialect::Oracle)
    }
}

impl fmt::Display for SqlDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "dialect_test.rs"]
mod tests;
