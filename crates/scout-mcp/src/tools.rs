//! MCP tool surface.
//!
//! Every tool returns a typed JSON payload. Failure modes surface as the
//! structured error taxonomy inside the payload, never as transport-level
//! faults; the only waits are a short bounded readiness window.

use crate::builders;
use crate::coordinator::Coordinator;
use crate::guardrail::{run_execute, ExecutionLimits};
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use rmcp::schemars;
use scout_core::config::PlanBudget;
use scout_core::execute::{ErrorCode, ToolError};
use scout_core::roles::{ColumnRole, RetrievalApproach};
use scout_core::TableKey;
use scout_intel::{PlanRequest, Planner};
use scout_sql::{SqlDialect, SqlParser};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// Bounded wait for readiness before a tool gives up.
const READY_WAIT: Duration = Duration::from_secs(2);

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct OverviewParams {
    /// Include the structured subject-area list.
    #[serde(default)]
    pub include_subject_areas: bool,
    /// Cap on returned subject areas.
    #[serde(default = "default_area_limit")]
    pub area_limit: usize,
}

fn default_area_limit() -> usize {
    8
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct BudgetParams {
    pub tables: Option<usize>,
    pub columns_per_table: Option<usize>,
    pub sample_values: Option<usize>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PlanQueryParams {
    /// The caller's information need, in natural language.
    pub request: String,
    /// Free-form constraints to carry into planning assumptions.
    #[serde(default)]
    pub constraints: Option<BTreeMap<String, String>>,
    /// One of brief, standard, full.
    #[serde(default)]
    pub detail_level: Option<String>,
    #[serde(default)]
    pub budget: Option<BudgetParams>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct TableInfoParams {
    /// Table key in `schema.table` form.
    pub table_key: String,
    #[serde(default = "default_true")]
    pub include_samples: bool,
    /// Restrict returned columns to these roles.
    #[serde(default)]
    pub column_role_filter: Option<Vec<String>>,
    #[serde(default = "default_sample_values")]
    pub max_sample_values: usize,
    #[serde(default)]
    pub relationship_limit: Option<usize>,
}

fn default_true() -> bool {
    true
}

fn default_sample_values() -> usize {
    5
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FindTablesParams {
    pub query: String,
    #[serde(default = "default_find_limit")]
    pub limit: usize,
    /// One of lexical, emb_table, emb_column, combo.
    #[serde(default)]
    pub approach: Option<String>,
    #[serde(default = "default_alpha")]
    pub alpha: f64,
}

fn default_find_limit() -> usize {
    10
}

fn default_alpha() -> f64 {
    0.7
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FindColumnsParams {
    pub keyword: String,
    #[serde(default = "default_column_limit")]
    pub limit: usize,
    /// Restrict to one table key.
    #[serde(default)]
    pub by_table: Option<String>,
}

fn default_column_limit() -> usize {
    25
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SubjectAreasParams {
    #[serde(default = "default_area_list_limit")]
    pub limit: usize,
}

fn default_area_list_limit() -> usize {
    12
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ExecuteQueryParams {
    /// A single SELECT statement.
    pub sql: String,
}

/// The schemascout MCP service.
#[derive(Clone)]
pub struct ScoutService {
    coordinator: Arc<Coordinator>,
    parser: Arc<SqlParser>,
    limits: ExecutionLimits,
    debug_tools: bool,
    tool_router: ToolRouter<Self>,
}

fn json_content<T: serde::Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::json(value)?]))
}

fn error_payload(error: ToolError) -> Result<CallToolResult, McpError> {
    json_content(&error)
}

#[tool_router]
impl ScoutService {
    pub fn new(
        coordinator: Arc<Coordinator>,
        limits: ExecutionLimits,
        debug_tools: bool,
    ) -> Self {
        Self {
            coordinator,
            parser: Arc::new(SqlParser::new()),
            limits,
            debug_tools,
            tool_router: Self::tool_router(),
        }
    }

    /// Wait briefly for readiness; on failure produce the typed error.
    async fn ready_or_error(&self) -> Option<ToolError> {
        if self.coordinator.ensure_ready(READY_WAIT).await {
            return None;
        }
        let status = self.coordinator.status();
        Some(ToolError::new(
            ErrorCode::ServiceNotReady,
            format!("schema service is {:?}", status.phase),
        ))
    }

    #[tool(description = "Initialization status of the schema service")]
    async fn get_init_status(&self) -> Result<CallToolResult, McpError> {
        json_content(&self.coordinator.status())
    }

    #[tool(description = "High-level database overview: dialect, schemas, subject areas")]
    async fn get_database_overview(
        &self,
        Parameters(params): Parameters<OverviewParams>,
    ) -> Result<CallToolResult, McpError> {
        if let Some(error) = self.ready_or_error().await {
            return error_payload(error);
        }
        let Some(card) = self.coordinator.card() else {
            return error_payload(ToolError::new(
                ErrorCode::ServiceNotReady,
                "schema card not yet available",
            ));
        };
        json_content(&builders::database_overview(
            &card,
            params.include_subject_areas,
            params.area_limit,
        ))
    }

    #[tool(
        description = "Plan a read-only query for a natural-language intent: relevant tables, join plan, filters, confidence"
    )]
    async fn plan_query_for_intent(
        &self,
        Parameters(params): Parameters<PlanQueryParams>,
    ) -> Result<CallToolResult, McpError> {
        if let Some(error) = self.ready_or_error().await {
            return error_payload(error);
        }
        let Some((card, engine)) = self.coordinator.engine() else {
            return error_payload(ToolError::new(
                ErrorCode::ServiceNotReady,
                "schema card not yet available",
            ));
        };

        let mut budget = PlanBudget::default();
        match params.detail_level.as_deref() {
            Some("brief") => budget.columns_per_table = 3,
            Some("full") => budget.columns_per_table = 12,
            _ => {}
        }
        if let Some(overrides) = &params.budget {
            if let Some(tables) = overrides.tables {
                budget.tables = tables.clamp(1, 32);
            }
            if let Some(columns) = overrides.columns_per_table {
                budget.columns_per_table = columns.clamp(1, 64);
            }
            if let Some(samples) = overrides.sample_values {
                budget.sample_values = samples.clamp(0, 32);
            }
        }

        let mut request = PlanRequest::new(params.request.clone());
        request.budget = budget;
        if let Some(constraints) = params.constraints.clone() {
            request.constraints = constraints;
        }

        let planner = Planner::new(card);
        let plan = planner.plan(&engine, self.coordinator.explorer_config(), &request);
        json_content(&plan)
    }

    #[tool(description = "Detailed information about one table: columns, keys, relationships, common filters")]
    async fn get_table_info(
        &self,
        Parameters(params): Parameters<TableInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        if let Some(error) = self.ready_or_error().await {
            return error_payload(error);
        }
        let Some(card) = self.coordinator.card() else {
            return error_payload(ToolError::new(
                ErrorCode::ServiceNotReady,
                "schema card not yet available",
            ));
        };
        let Some(table_key) = TableKey::parse(&params.table_key) else {
            return error_payload(ToolError::new(
                ErrorCode::InvalidTableKey,
                format!("'{}' is not a '<schema>.<table>' key", params.table_key),
            ));
        };

        let role_filter: Vec<ColumnRole> = params
            .column_role_filter
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter_map(|name| serde_json::from_value(serde_json::json!(name)).ok())
            .collect();

        match builders::table_info(
            &card,
            &table_key,
            params.include_samples,
            &role_filter,
            params.max_sample_values,
            params.relationship_limit,
        ) {
            Some(info) => json_content(&info),
            None => error_payload(ToolError::new(
                ErrorCode::InvalidTableKey,
                format!("table {table_key} not found"),
            )),
        }
    }

    #[tool(description = "Subject areas detected in the database, largest first")]
    async fn get_subject_areas(
        &self,
        Parameters(params): Parameters<SubjectAreasParams>,
    ) -> Result<CallToolResult, McpError> {
        if let Some(error) = self.ready_or_error().await {
            return error_payload(error);
        }
        let Some(card) = self.coordinator.card() else {
            return error_payload(ToolError::new(
                ErrorCode::ServiceNotReady,
                "schema card not yet available",
            ));
        };
        let overview = builders::database_overview(&card, true, params.limit.max(1));
        json_content(&overview.subject_areas)
    }

    #[tool(description = "Debug: rank tables for a query with per-component scores")]
    async fn find_tables(
        &self,
        Parameters(params): Parameters<FindTablesParams>,
    ) -> Result<CallToolResult, McpError> {
        if !self.debug_tools {
            return error_payload(ToolError::new(
                ErrorCode::ServiceNotReady,
                "debug tools are disabled; set SCOUT_DEBUG_TOOLS=1",
            ));
        }
        if let Some(error) = self.ready_or_error().await {
            return error_payload(error);
        }
        let Some((card, engine)) = self.coordinator.engine() else {
            return error_payload(ToolError::new(
                ErrorCode::ServiceNotReady,
                "schema card not yet available",
            ));
        };
        let approach = params
            .approach
            .as_deref()
            .map(RetrievalApproach::from_name)
            .unwrap_or(Some(RetrievalApproach::Combined))
            .unwrap_or_default();
        let hits = engine.retrieve(&params.query, approach, params.limit.max(1), params.alpha);
        json_content(&builders::table_hits(&card, &hits))
    }

    #[tool(description = "Debug: locate columns by keyword, optionally within one table")]
    async fn find_columns(
        &self,
        Parameters(params): Parameters<FindColumnsParams>,
    ) -> Result<CallToolResult, McpError> {
        if !self.debug_tools {
            return error_payload(ToolError::new(
                ErrorCode::ServiceNotReady,
                "debug tools are disabled; set SCOUT_DEBUG_TOOLS=1",
            ));
        }
        if let Some(error) = self.ready_or_error().await {
            return error_payload(error);
        }
        let Some((card, engine)) = self.coordinator.engine() else {
            return error_payload(ToolError::new(
                ErrorCode::ServiceNotReady,
                "schema card not yet available",
            ));
        };
        let by_table = match &params.by_table {
            Some(raw) => match TableKey::parse(raw) {
                Some(key) => Some(key),
                None => {
                    return error_payload(ToolError::new(
                        ErrorCode::InvalidTableKey,
                        format!("'{raw}' is not a '<schema>.<table>' key"),
                    ))
                }
            },
            None => None,
        };
        let hits = builders::column_hits(
            &card,
            &engine,
            &params.keyword,
            params.limit.max(1),
            by_table.as_ref(),
        );
        json_content(&hits)
    }

    #[tool(description = "Execute a single SELECT with row and cell budgets; never mutates")]
    async fn execute_query(
        &self,
        Parameters(params): Parameters<ExecuteQueryParams>,
    ) -> Result<CallToolResult, McpError> {
        if let Some(error) = self.ready_or_error().await {
            return error_payload(error);
        }
        let card = self.coordinator.card();
        let dialect = SqlDialect::from_driver(self.coordinator.db().dialect_name());
        let result = run_execute(
            &params.sql,
            self.coordinator.db().as_ref(),
            &self.parser,
            dialect,
            self.limits,
            card.as_deref(),
        )
        .await;
        json_content(&result)
    }
}

#[tool_handler]
impl ServerHandler for ScoutService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "schemascout exposes schema intelligence over a relational database: \
                 discover tables and subject areas, plan read-only queries for an intent, \
                 inspect tables, and execute guarded SELECTs."
                    .to_string(),
            ),
            ..Default::default()
        }
    }
}
