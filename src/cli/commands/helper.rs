use std::path::Path;

use anyhow::{Context, Result};

use super::super::args::CommonArgs;
use crate::{
    config::{Config, ConfigLoadResult, load_config},
    core::Scanner,
    error::SqlidError,
};

/// Resolve the effective configuration for `root` and compile a scanner.
///
/// Priority is CLI flags, then the config file, then defaults. Every pattern
/// is compiled here, so a bad one fails before any file is read.
pub fn build_scanner(root: &Path, common: &CommonArgs) -> Result<(Scanner, Config)> {
    if !root.is_dir() {
        return Err(SqlidError::PathNotFound {
            path: root.to_path_buf(),
        }
        .into());
    }

    let ConfigLoadResult {
        mut config,
        from_file,
    } = load_config(root)?;
    tracing::debug!(from_file, "configuration loaded");

    common.apply(&mut config);
    let scanner = Scanner::from_config(&config).context("Invalid configuration")?;

    Ok((scanner, config))
}
