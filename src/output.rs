//! Serializable reports shared by the CLI `--format json` output and the MCP
//! tools.

use std::path::Path;

use serde::Serialize;

use crate::{
    core::{
        InventoryLoad, Reference, ResultSet, ScanOutcome, Scanner, SqlStatement, StatementKind,
        UsageReport, VerifyStatus, display_path, load_inventory,
    },
    diagnostics::DiagnosticDto,
    error::Result,
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifierDto {
    pub id: String,
    pub occurrences: usize,
    /// Referencing files; present only when backreferences are tracked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<Vec<Reference>>,
}

impl IdentifierDto {
    pub fn from_results(results: &ResultSet) -> Vec<Self> {
        results
            .iter()
            .map(|(id, usage)| {
                let (files, references) = if results.tracks_backrefs() {
                    (
                        Some(usage.files().into_iter().map(str::to_string).collect()),
                        Some(usage.references.clone()),
                    )
                } else {
                    (None, None)
                };
                Self {
                    id: id.to_string(),
                    occurrences: usage.occurrences,
                    files,
                    references,
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReportDto {
    pub root: String,
    pub count: usize,
    pub files_scanned: usize,
    pub candidate_files: usize,
    pub identifiers: Vec<IdentifierDto>,
    pub warnings: Vec<DiagnosticDto>,
}

impl From<&ScanOutcome> for ScanReportDto {
    fn from(outcome: &ScanOutcome) -> Self {
        Self {
            root: outcome.root.display().to_string(),
            count: outcome.results.len(),
            files_scanned: outcome.files_scanned,
            candidate_files: outcome.candidate_files,
            identifiers: IdentifierDto::from_results(&outcome.results),
            warnings: outcome.diagnostics.iter().map(DiagnosticDto::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UndefinedDto {
    pub identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub status: VerifyStatus,
    pub references: Vec<Reference>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnusedDto {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<StatementKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl UnusedDto {
    fn new(id: &str, statement: Option<&SqlStatement>) -> Self {
        Self {
            id: id.to_string(),
            kind: statement.and_then(|s| s.kind),
            source: statement.and_then(|s| s.source.clone()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckSummaryDto {
    pub used: usize,
    pub defined: usize,
    pub undefined: usize,
    pub unused: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReportDto {
    pub root: String,
    pub inventory: String,
    pub summary: CheckSummaryDto,
    pub undefined: Vec<UndefinedDto>,
    pub unused: Vec<UnusedDto>,
    /// Scan warnings followed by inventory warnings.
    pub warnings: Vec<DiagnosticDto>,
}

/// Everything a `check` run produced.
#[derive(Debug)]
pub struct CheckOutcome {
    pub scan: ScanOutcome,
    pub inventory: InventoryLoad,
    pub inventory_path: String,
    pub report: UsageReport,
}

impl CheckOutcome {
    /// Scan `root`, load the inventory at `inventory`, and compare the two.
    pub fn run(scanner: &Scanner, root: &Path, inventory: &Path) -> Result<Self> {
        let scan = scanner.scan(root)?;
        let load = load_inventory(inventory)?;
        let report = UsageReport::build(&scan.results, &load.inventory);
        let inventory_path = display_path(&scan.root, inventory);

        Ok(Self {
            scan,
            inventory: load,
            inventory_path,
            report,
        })
    }

    pub fn undefined(&self) -> Vec<UndefinedDto> {
        self.report
            .undefined()
            .map(|v| UndefinedDto {
                identifier: v.identifier.clone(),
                namespace: v.namespace.clone(),
                status: v.status,
                references: self
                    .scan
                    .results
                    .get(&v.identifier)
                    .map(|usage| usage.references.clone())
                    .unwrap_or_default(),
            })
            .collect()
    }

    pub fn unused(&self) -> Vec<UnusedDto> {
        self.report
            .unused
            .iter()
            .map(|id| UnusedDto::new(id, self.inventory.inventory.get(id)))
            .collect()
    }

    pub fn warnings(&self) -> Vec<DiagnosticDto> {
        self.scan
            .diagnostics
            .iter()
            .chain(&self.inventory.diagnostics)
            .map(DiagnosticDto::from)
            .collect()
    }

    pub fn summary(&self) -> CheckSummaryDto {
        CheckSummaryDto {
            used: self.scan.results.len(),
            defined: self.inventory.inventory.len(),
            undefined: self.report.undefined_count(),
            unused: self.report.unused.len(),
        }
    }

    pub fn to_dto(&self) -> CheckReportDto {
        CheckReportDto {
            root: self.scan.root.display().to_string(),
            inventory: self.inventory_path.clone(),
            summary: self.summary(),
            undefined: self.undefined(),
            unused: self.unused(),
            warnings: self.warnings(),
        }
    }
}
