//! Environment-driven service configuration.
//!
//! One required variable names the database target; everything else has a
//! default. Unparsable numeric values fall back to their defaults with a
//! warning, and unrelated environment variables are ignored.

use log::warn;
use scout_core::config::ExplorerConfig;
use std::path::PathBuf;
use thiserror::Error;

pub const ENV_DATABASE_URL: &str = "SCOUT_DATABASE_URL";
pub const ENV_ROW_LIMIT: &str = "SCOUT_ROW_LIMIT";
pub const ENV_MAX_CELL_CHARS: &str = "SCOUT_MAX_CELL_CHARS";
pub const ENV_SAMPLE_ROWS: &str = "SCOUT_SAMPLE_ROWS";
pub const ENV_SAMPLE_TIMEOUT_SECS: &str = "SCOUT_SAMPLE_TIMEOUT_SECS";
pub const ENV_EMBEDDINGS: &str = "SCOUT_EMBEDDINGS";
pub const ENV_DEBUG_TOOLS: &str = "SCOUT_DEBUG_TOOLS";
pub const ENV_CARD_CACHE_DIR: &str = "SCOUT_CARD_CACHE_DIR";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// M001: The database target is not configured
    #[error("[M001] {ENV_DATABASE_URL} environment variable not set")]
    MissingDatabaseUrl,
}

/// Resolved service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub database_url: String,
    pub row_limit: usize,
    pub max_cell_chars: usize,
    pub sample_rows: usize,
    pub sample_timeout_secs: u64,
    pub embeddings_enabled: bool,
    pub debug_tools: bool,
    pub card_cache_dir: Option<PathBuf>,
}

fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("ignoring unparsable {name}={raw:?}");
            default
        }),
        Err(_) => default,
    }
}

fn flag(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(raw) => matches!(raw.trim().to_lowercase().as_str(), "1" | "true" | "on" | "yes"),
        Err(_) => default,
    }
}

impl ServiceConfig {
    /// Read configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            std::env::var(ENV_DATABASE_URL).map_err(|_| ConfigError::MissingDatabaseUrl)?;
        Ok(Self {
            database_url,
            row_limit: parse_or(ENV_ROW_LIMIT, 200).max(1),
            max_cell_chars: parse_or(ENV_MAX_CELL_CHARS, 200).max(10),
            sample_rows: parse_or(ENV_SAMPLE_ROWS, 50).max(1),
            sample_timeout_secs: parse_or(ENV_SAMPLE_TIMEOUT_SECS, 15).max(1),
            embeddings_enabled: flag(ENV_EMBEDDINGS, true),
            debug_tools: flag(ENV_DEBUG_TOOLS, false),
            card_cache_dir: std::env::var(ENV_CARD_CACHE_DIR).ok().map(PathBuf::from),
        })
    }

    /// Explorer configuration derived from the service settings.
    pub fn explorer_config(&self) -> ExplorerConfig {
        ExplorerConfig {
            per_table_rows: self.sample_rows,
            sample_timeout_secs: self.sample_timeout_secs,
            embeddings_enabled: self.embeddings_enabled,
            ..ExplorerConfig::default()
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
