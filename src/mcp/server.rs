use std::path::{Path, PathBuf};

use anyhow::Result;
use rmcp::{
    ErrorData as McpError, ServerHandler, ServiceExt,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use serde::Serialize;

use super::types::{
    CheckSqlIdsParams, ConfigDto, GetConfigParams, Pagination, ScanSqlIdsParams,
    ScanSqlIdsResult,
};
use crate::{
    cli::{CommonArgs, commands::helper::build_scanner},
    config::{CONFIG_FILE_NAME, load_config},
    diagnostics::DiagnosticDto,
    output::{CheckOutcome, IdentifierDto},
};

const DEFAULT_LIMIT: usize = 100;
const MAX_LIMIT: usize = 1000;

#[derive(Clone)]
pub struct SqlidMcpServer {
    tool_router: ToolRouter<Self>,
}

impl Default for SqlidMcpServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl SqlidMcpServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }

    /// List SQL statement ids used by service classes
    #[tool(
        description = "Scan a source tree for SQL statement ids passed as string literals to query-execution calls in service classes. Returns a sorted, paginated list of identifiers with occurrence counts and, optionally, referencing files."
    )]
    pub async fn scan_sql_ids(
        &self,
        params: Parameters<ScanSqlIdsParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let root = Path::new(&params.project_root_path);
        let limit = params
            .limit
            .map(|v| v as usize)
            .unwrap_or(DEFAULT_LIMIT)
            .min(MAX_LIMIT);
        let offset = params.offset.map(|v| v as usize).unwrap_or(0);

        let (scanner, config) = build_scanner(root, &CommonArgs::default())
            .map_err(|e| McpError::internal_error(format!("Failed to initialize: {:#}", e), None))?;
        let scanner = scanner.with_backrefs(params.backrefs.unwrap_or(config.backrefs));

        let outcome = scanner
            .scan(root)
            .map_err(|e| McpError::internal_error(format!("Scan failed: {}", e), None))?;

        let all_items = IdentifierDto::from_results(&outcome.results);
        let total_count = all_items.len();
        let items: Vec<IdentifierDto> = all_items.into_iter().skip(offset).take(limit).collect();
        let has_more = offset + items.len() < total_count;

        let result = ScanSqlIdsResult {
            total_count,
            files_scanned: outcome.files_scanned,
            candidate_files: outcome.candidate_files,
            items,
            pagination: Pagination {
                offset,
                limit,
                has_more,
            },
            warnings: outcome.diagnostics.iter().map(DiagnosticDto::from).collect(),
        };

        json_result(&result)
    }

    /// Compare used ids with the defined statements
    #[tool(
        description = "Scan a source tree and compare the SQL statement ids it uses with the statements defined in MyBatis mapper XML files (or a plain id list). Returns undefined identifiers with their call sites, and defined statements nothing uses."
    )]
    pub async fn check_sql_ids(
        &self,
        params: Parameters<CheckSqlIdsParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let root = Path::new(&params.project_root_path);

        let (scanner, config) = build_scanner(root, &CommonArgs::default())
            .map_err(|e| McpError::internal_error(format!("Failed to initialize: {:#}", e), None))?;

        let Some(defined) = params.defined_path.or(config.defined_path) else {
            return Err(McpError::invalid_params(
                format!(
                    "No inventory given: pass definedPath or set it in {}",
                    CONFIG_FILE_NAME
                ),
                None,
            ));
        };
        let inventory = resolve(root, &defined);

        let outcome = CheckOutcome::run(&scanner.with_backrefs(true), root, &inventory)
            .map_err(|e| McpError::internal_error(format!("Check failed: {}", e), None))?;

        json_result(&outcome.to_dto())
    }

    /// Get the current sqlid configuration
    #[tool(description = "Get the effective sqlid configuration and whether it came from a .sqlidrc.json file.")]
    pub async fn get_config(
        &self,
        params: Parameters<GetConfigParams>,
    ) -> Result<CallToolResult, McpError> {
        let path = Path::new(&params.0.project_root_path);

        let result = load_config(path)
            .map_err(|e| McpError::internal_error(format!("Failed to load config: {:#}", e), None))?;

        json_result(&ConfigDto {
            from_file: result.from_file,
            config: result.config,
        })
    }
}

fn resolve(root: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json_str = serde_json::to_string_pretty(value).map_err(|e| {
        McpError::internal_error(format!("JSON serialization failed: {}", e), None)
    })?;

    Ok(CallToolResult::success(vec![Content::text(json_str)]))
}

#[tool_handler]
impl ServerHandler for SqlidMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "sqlid MCP audits which SQL statement ids a service layer uses.\n\n\
                 Available tools:\n\
                 1. get_config - Get the effective scan configuration\n\
                 2. scan_sql_ids - List statement ids used by service classes (paginated)\n\
                 3. check_sql_ids - Find used ids with no mapper definition, and unused definitions\n\n\
                 Matches are textual: calls inside comments or string literals are reported too,\n\
                 and calls whose id is not a string literal are not seen."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

/// Entry point for MCP server
pub fn run_server() -> Result<()> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(async {
            let service = SqlidMcpServer::new();
            let server = service.serve(rmcp::transport::stdio()).await?;
            server.waiting().await?;
            Ok(())
        })
}
