//! scout-db - database access layer for schemascout
//!
//! This crate provides the read-only [`Database`] abstraction the rest of
//! the service is written against, a DuckDB backend, the reflection adapter
//! that enumerates schemas/tables/keys through that abstraction, and the
//! bounded row sampler.

pub mod duckdb_backend;
pub mod error;
pub mod reflection;
pub mod sampler;
pub mod traits;
pub mod value;

pub use duckdb_backend::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use reflection::{ReflectionAdapter, ReflectionOptions};
pub use sampler::{SampleResult, Sampler};
pub use traits::Database;
pub use value::{DbValue, QueryOutput, ResultColumnDesc};
