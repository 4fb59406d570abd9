use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{config::Config, diagnostics::DiagnosticDto, output::IdentifierDto};

// ============================================================
// Parameters
// ============================================================

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScanSqlIdsParams {
    /// Absolute path of the source tree to scan
    pub project_root_path: String,
    /// Include the files and lines referencing each identifier
    #[serde(default)]
    pub backrefs: Option<bool>,
    /// Number of identifiers to skip (default 0)
    #[serde(default)]
    pub offset: Option<u32>,
    /// Maximum identifiers to return (default 100, max 1000)
    #[serde(default)]
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckSqlIdsParams {
    /// Absolute path of the source tree to scan
    pub project_root_path: String,
    /// Mapper directory, mapper XML file, or plain id list. Relative paths
    /// resolve against the project root. Falls back to `definedPath` in the
    /// config file.
    #[serde(default)]
    pub defined_path: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetConfigParams {
    /// Absolute path of the project root
    pub project_root_path: String,
}

// ============================================================
// Results
// ============================================================

#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub offset: usize,
    pub limit: usize,
    pub has_more: bool,
}

/// Result of scan_sql_ids
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSqlIdsResult {
    pub total_count: usize,
    pub files_scanned: usize,
    pub candidate_files: usize,
    pub items: Vec<IdentifierDto>,
    pub pagination: Pagination,
    pub warnings: Vec<DiagnosticDto>,
}

/// Result of get_config
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDto {
    /// True if config was loaded from a file, false if using defaults
    pub from_file: bool,
    pub config: Config,
}
