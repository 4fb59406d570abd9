use anyhow::{Result, bail};

use super::{
    super::args::CheckCommand, CheckSummary, CommandKind, CommandResult, CommandSummary,
    helper::build_scanner,
};
use crate::{config::CONFIG_FILE_NAME, output::CheckOutcome};

pub fn check(cmd: CheckCommand) -> Result<CommandResult> {
    let (scanner, config) = build_scanner(&cmd.root, &cmd.common)?;

    let inventory = match (&cmd.defined, &config.defined_path) {
        (Some(path), _) => path.clone(),
        (None, Some(path)) => cmd.root.join(path),
        (None, None) => bail!(
            "No inventory given: pass --defined or set \"definedPath\" in {}",
            CONFIG_FILE_NAME
        ),
    };

    // Locations are always shown for undefined identifiers.
    let scanner = scanner.with_backrefs(true);
    let outcome = CheckOutcome::run(&scanner, &cmd.root, &inventory)?;

    let error_count = outcome.report.undefined_count();
    let warning_count = outcome.report.unused.len()
        + outcome.scan.diagnostics.len()
        + outcome.inventory.diagnostics.len();

    Ok(CommandResult {
        kind: CommandKind::Check,
        summary: CommandSummary::Check(CheckSummary {
            outcome,
            format: cmd.format,
        }),
        error_count,
        warning_count,
        exit_on_errors: true,
    })
}
