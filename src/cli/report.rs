//! Report formatting and printing utilities.
//!
//! Identifier lists and reports go to stdout; diagnostics go to stderr so a
//! plain `scan` can be piped without filtering.

use std::io::{self, Write};

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use super::{
    args::{CheckFormat, ScanFormat},
    commands::{CheckSummary, CommandResult, CommandSummary, InitSummary, ScanSummary},
};
use crate::{
    config::CONFIG_FILE_NAME,
    core::ResultSet,
    diagnostics::{Diagnostic, Report},
    output::{CheckOutcome, ScanReportDto, UnusedDto},
};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Maximum number of extra call sites to display per undefined identifier.
const MAX_USAGES_DISPLAY: usize = 3;

pub fn print(result: &CommandResult) -> Result<()> {
    match &result.summary {
        CommandSummary::Scan(summary) => print_scan(summary),
        CommandSummary::Check(summary) => print_check(summary),
        CommandSummary::Init(summary) => {
            print_init(summary);
            Ok(())
        }
    }
}

fn print_scan(summary: &ScanSummary) -> Result<()> {
    print_diagnostics_to(&summary.outcome.diagnostics, &mut io::stderr().lock());

    let mut out = io::stdout().lock();
    match summary.format {
        ScanFormat::Plain => print_identifiers_to(&summary.outcome.results, &mut out),
        ScanFormat::Json => write_json(&ScanReportDto::from(&summary.outcome), &mut out)?,
    }
    Ok(())
}

fn print_check(summary: &CheckSummary) -> Result<()> {
    let outcome = &summary.outcome;
    {
        let mut err = io::stderr().lock();
        print_diagnostics_to(&outcome.scan.diagnostics, &mut err);
        print_diagnostics_to(&outcome.inventory.diagnostics, &mut err);
    }

    let mut out = io::stdout().lock();
    match summary.format {
        CheckFormat::Text => report_check_to(outcome, &mut out),
        CheckFormat::Json => write_json(&outcome.to_dto(), &mut out)?,
    }
    Ok(())
}

fn write_json<T: Serialize, W: Write>(value: &T, writer: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    Ok(())
}

/// One identifier per line, sorted.
pub fn print_identifiers_to<W: Write>(results: &ResultSet, writer: &mut W) {
    let _ = write!(writer, "{}", results.render_plain());
}

/// Print recoverable diagnostics in cargo-style format.
pub fn print_diagnostics_to<W: Write>(diagnostics: &[Diagnostic], writer: &mut W) {
    for d in diagnostics {
        let _ = writeln!(
            writer,
            "{} {}  {}",
            "warning:".bold().yellow(),
            d.message(),
            d.kind().to_string().dimmed().cyan()
        );
        let _ = writeln!(writer, "  {} {}", "-->".blue(), d.path());
    }
}

/// Print undefined identifiers as errors and unused statements as a warning
/// list, followed by a summary line.
pub fn report_check_to<W: Write>(outcome: &CheckOutcome, writer: &mut W) {
    let undefined = outcome.undefined();
    for item in &undefined {
        let _ = writeln!(
            writer,
            "{}: \"{}\"  {}",
            "error".bold().red(),
            item.identifier,
            item.status.to_string().dimmed().cyan()
        );

        if let Some(first) = item.references.first() {
            let _ = writeln!(writer, "  {} {}:{}", "-->".blue(), first.file, first.line);
        }
        if let Some(namespace) = &item.namespace {
            let _ = writeln!(
                writer,
                "  {} {} {}",
                "=".blue(),
                "namespace:".bold(),
                namespace
            );
        }

        let rest = item.references.iter().skip(1);
        let total = item.references.len().saturating_sub(1);
        for (i, r) in rest.take(MAX_USAGES_DISPLAY).enumerate() {
            let remaining = total.saturating_sub(MAX_USAGES_DISPLAY);
            let suffix = if i == MAX_USAGES_DISPLAY - 1 && remaining > 0 {
                format!(" (and {} more)", remaining)
            } else {
                String::new()
            };
            let _ = writeln!(
                writer,
                "  {} {} {}:{}{}",
                "=".blue(),
                "used:".bold(),
                r.file,
                r.line,
                suffix
            );
        }
        let _ = writeln!(writer);
    }

    let unused = outcome.unused();
    print_unused_to(&unused, writer);

    let errors = undefined.len();
    let warnings = unused.len() + outcome.scan.diagnostics.len() + outcome.inventory.diagnostics.len();
    if errors + warnings > 0 {
        print_summary_to(errors, warnings, writer);
    } else {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!(
                "Checked {} {} against {} {} - no issues found",
                outcome.scan.results.len(),
                plural(outcome.scan.results.len(), "identifier", "identifiers"),
                outcome.inventory.inventory.len(),
                plural(outcome.inventory.inventory.len(), "statement", "statements"),
            )
            .green()
        );
    }
}

fn print_unused_to<W: Write>(unused: &[UnusedDto], writer: &mut W) {
    if unused.is_empty() {
        return;
    }

    let _ = writeln!(
        writer,
        "{} {} unused {}",
        "warning:".bold().yellow(),
        unused.len(),
        plural(unused.len(), "statement", "statements")
    );

    let id_width = unused
        .iter()
        .map(|u| UnicodeWidthStr::width(u.id.as_str()))
        .max()
        .unwrap_or(0);

    for u in unused {
        match &u.source {
            Some(source) => {
                let padding = id_width - UnicodeWidthStr::width(u.id.as_str());
                let _ = writeln!(
                    writer,
                    "  {}{:padding$}  {}",
                    u.id,
                    "",
                    source.dimmed(),
                    padding = padding
                );
            }
            None => {
                let _ = writeln!(writer, "  {}", u.id);
            }
        }
    }
}

fn print_summary_to<W: Write>(errors: usize, warnings: usize, writer: &mut W) {
    let _ = writeln!(
        writer,
        "\n{} {} problems ({} {}, {} {})",
        FAILURE_MARK.red(),
        errors + warnings,
        errors,
        plural(errors, "error", "errors").red(),
        warnings,
        plural(warnings, "warning", "warnings").yellow()
    );
}

fn print_init(summary: &InitSummary) {
    if summary.created {
        println!(
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    }
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 { one } else { many }
}
