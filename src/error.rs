//! Fatal error types.
//!
//! Only configuration-time and root-path problems surface as `SqlidError`.
//! Per-file and per-subtree failures are recoverable and are reported as
//! [`Diagnostic`](crate::diagnostics::Diagnostic) values instead.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqlidError {
    /// The scan root does not exist or is not a directory.
    #[error("Root path not found or not a directory: {}", path.display())]
    PathNotFound { path: PathBuf },

    /// A configured pattern (regex or glob) failed to compile.
    #[error("Invalid pattern in '{field}': \"{pattern}\": {message}")]
    PatternCompile {
        field: &'static str,
        pattern: String,
        message: String,
    },

    /// The defined-identifier inventory path does not exist.
    #[error("Inventory not found: {}", path.display())]
    InventoryNotFound { path: PathBuf },

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SqlidError {
    pub fn pattern(
        field: &'static str,
        pattern: impl Into<String>,
        message: impl ToString,
    ) -> Self {
        Self::PatternCompile {
            field,
            pattern: pattern.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T, E = SqlidError> = std::result::Result<T, E>;
