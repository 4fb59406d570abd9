//! Non-fatal diagnostics collected during a scan.
//!
//! A scan never aborts because one file or one directory misbehaves. Each such
//! failure becomes a [`Diagnostic`] that travels with the successful result:
//! - `FileRead`: a candidate file could not be read (I/O, encoding, timeout)
//! - `SubtreeAccess`: a directory could not be listed, or a symlink loop
//! - `MapperParse`: a mapper definition file could not be parsed

use std::fmt;

use enum_dispatch::enum_dispatch;
use serde::Serialize;

/// Kind identifier for each diagnostic type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    FileRead,
    SubtreeAccess,
    MapperParse,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::FileRead => write!(f, "file-read"),
            DiagnosticKind::SubtreeAccess => write!(f, "subtree-access"),
            DiagnosticKind::MapperParse => write!(f, "mapper-parse"),
        }
    }
}

/// Trait shared by every diagnostic, used by the reporters.
#[enum_dispatch]
pub trait Report {
    /// Path the diagnostic refers to (relative to the scan root when possible).
    fn path(&self) -> &str;

    /// Human-readable reason.
    fn message(&self) -> String;

    fn kind(&self) -> DiagnosticKind;
}

/// A candidate file could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReadWarning {
    pub path: String,
    pub error: String,
}

/// A directory could not be listed; its contents were skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtreeAccessWarning {
    pub path: String,
    pub error: String,
}

/// A mapper file could not be parsed; its statements were skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapperParseWarning {
    pub path: String,
    pub error: String,
}

impl Report for FileReadWarning {
    fn path(&self) -> &str {
        &self.path
    }

    fn message(&self) -> String {
        format!("cannot read file: {}", self.error)
    }

    fn kind(&self) -> DiagnosticKind {
        DiagnosticKind::FileRead
    }
}

impl Report for SubtreeAccessWarning {
    fn path(&self) -> &str {
        &self.path
    }

    fn message(&self) -> String {
        format!("skipped subtree: {}", self.error)
    }

    fn kind(&self) -> DiagnosticKind {
        DiagnosticKind::SubtreeAccess
    }
}

impl Report for MapperParseWarning {
    fn path(&self) -> &str {
        &self.path
    }

    fn message(&self) -> String {
        format!("cannot parse mapper: {}", self.error)
    }

    fn kind(&self) -> DiagnosticKind {
        DiagnosticKind::MapperParse
    }
}

#[enum_dispatch(Report)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    FileRead(FileReadWarning),
    SubtreeAccess(SubtreeAccessWarning),
    MapperParse(MapperParseWarning),
}

impl Diagnostic {
    /// Ordering used for stable output: by path, then kind.
    pub fn sort_key(&self) -> (&str, DiagnosticKind) {
        (self.path(), self.kind())
    }
}

/// Serializable view of a diagnostic for JSON output.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticDto {
    pub kind: DiagnosticKind,
    pub path: String,
    pub message: String,
}

impl From<&Diagnostic> for DiagnosticDto {
    fn from(d: &Diagnostic) -> Self {
        Self {
            kind: d.kind(),
            path: d.path().to_string(),
            message: d.message(),
        }
    }
}

/// Sort diagnostics in place so repeated runs print them identically.
pub fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
}
