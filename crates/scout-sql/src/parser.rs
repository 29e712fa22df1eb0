//! Cached SQL parsing with dialect support.

use crate::dialect::SqlDialect;
use crate::error::{SqlError, SqlResult};
use lru::LruCache;
use sqlparser::ast::Statement;
use sqlparser::parser::Parser;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

const PARSE_CACHE_CAPACITY: usize = 256;

/// Parser facade with an LRU cache keyed by (sql, dialect).
///
/// Parse results are shared as `Arc<Vec<Statement>>`; callers clone cheaply
/// and never mutate cached trees.
pub struct SqlParser {
    cache: Mutex<LruCache<(String, SqlDialect), Arc<Vec<Statement>>>>,
}

impl Default for SqlParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlParser {
    pub fn new() -> Self {
        let capacity = NonZeroUsize::new(PARSE_CACHE_CAPACITY).expect("nonzero capacity");
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Parse SQL under the given dialect, consulting the cache first.
    pub fn parse(&self, sql: &str, dialect: SqlDialect) -> SqlResult<Arc<Vec<Statement>>> {
        let trimmed = sql.trim();
        if trimmed.is_empty() {
            return Err(SqlError::EmptySql);
        }

        let key = (trimmed.to_string(), dialect);
        if let Ok(mut cache) = self.cache.lock() {
            if let Some(hit) = cache.get(&key) {
                return Ok(Arc::clone(hit));
            }
        }

        let statements = Parser::parse_sql(dialect.parser_dialect().as_ref(), trimmed)
            .map_err(|e| SqlError::ParseError {
                message: e.to_string(),
            })?;
        let shared = Arc::new(statements);

        if let Ok(mut cache) = self.cache.lock() {
            cache.put(key, Arc::clone(&shared));
        }
        Ok(shared)
    }

    /// Parse and require exactly one statement.
    pub fn parse_single(&self, sql: &str, dialect: SqlDialect) -> SqlResult<Statement> {
        let statements = self.parse(sql, dialect)?;
        match statements.as_slice() {
            [only] => Ok(only.clone()),
            [] => Err(SqlError::EmptySql),
            _ => Err(SqlError::MultiStatement),
        }
    }
}

#[cfg(test)]
#[path = "parser_test.rs"]
mod tests;
