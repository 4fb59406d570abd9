use anyhow::Result;

use super::{
    super::args::ScanCommand, CommandKind, CommandResult, CommandSummary, ScanSummary,
    helper::build_scanner,
};

pub fn scan(cmd: ScanCommand) -> Result<CommandResult> {
    let (scanner, config) = build_scanner(&cmd.root, &cmd.common)?;
    let scanner = scanner.with_backrefs(cmd.backrefs || config.backrefs);

    let outcome = scanner.scan(&cmd.root)?;
    let warning_count = outcome.diagnostics.len();

    Ok(CommandResult {
        kind: CommandKind::Scan,
        summary: CommandSummary::Scan(ScanSummary {
            outcome,
            format: cmd.format,
        }),
        error_count: 0,
        warning_count,
        exit_on_errors: false,
    })
}
