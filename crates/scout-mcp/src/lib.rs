//! scout-mcp - the schemascout service binary's library crate
//!
//! Wires the intelligence, SQL, and database layers behind an MCP tool
//! surface: environment configuration, the lifecycle coordinator with its
//! fast-start and enrich background tasks, the SELECT-only execution
//! guardrail, and the response builders for the discovery tools.

pub mod builders;
pub mod config;
pub mod coordinator;
pub mod guardrail;
pub mod state;
pub mod tools;

pub use config::{ConfigError, ServiceConfig};
pub use coordinator::Coordinator;
pub use guardrail::{run_execute, ExecutionLimits};
pub use tools::ScoutService;
