//! schemascout MCP server entrypoint.

use anyhow::Result;
use clap::Parser;
use log::{error, info};
use rmcp::{transport::stdio, ServiceExt};
use scout_db::DuckDbBackend;
use scout_mcp::guardrail::ExecutionLimits;
use scout_mcp::{Coordinator, ScoutService, ServiceConfig};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

const EXIT_CONFIG_ERROR: u8 = 2;
const EXIT_INIT_ERROR: u8 = 3;

/// schemascout - schema intelligence MCP server for relational databases
#[derive(Parser, Debug)]
#[command(name = "scout-mcp")]
#[command(author, version, about, long_about = None)]
struct Cli {}

#[tokio::main]
async fn main() -> ExitCode {
    let _cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let config = match ServiceConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    match serve(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("fatal: {e:#}");
            ExitCode::from(EXIT_INIT_ERROR)
        }
    }
}

async fn serve(config: ServiceConfig) -> Result<()> {
    let db = Arc::new(DuckDbBackend::new(&config.database_url)?);
    let coordinator = Coordinator::install_global(Coordinator::new(db, &config));
    coordinator.start();

    let limits = ExecutionLimits {
        row_limit: config.row_limit,
        max_cell_chars: config.max_cell_chars,
        timeout: Duration::from_secs(30),
    };
    let service = ScoutService::new(Arc::clone(&coordinator), limits, config.debug_tools);

    info!("scout-mcp serving on stdio");
    let server = service.serve(stdio()).await?;
    server.waiting().await?;

    coordinator.shutdown().await;
    Ok(())
}
