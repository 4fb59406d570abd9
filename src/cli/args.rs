//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `scan`: List the SQL statement ids used by service classes
//! - `check`: Compare used ids with the statements defined in mapper files
//! - `init`: Initialize sqlid configuration file
//! - `serve`: Start MCP server for AI integration

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};

use crate::config::Config;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Scan(cmd)) => cmd.common.verbose,
            Some(Command::Check(cmd)) => cmd.common.verbose,
            Some(Command::Init) | Some(Command::Serve) | None => false,
        }
    }
}

/// Overrides shared by the scanning commands. Each one beats the config file.
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Only scan files whose name ends with this suffix [default: Service.java]
    #[arg(long, value_name = "SUFFIX")]
    pub suffix: Option<String>,

    /// Regex marking a file as a service class [default: @Service]
    #[arg(long, value_name = "REGEX")]
    pub marker: Option<String>,

    /// Receiver of query-execution calls, matched literally [default: sqlSession]
    #[arg(long, value_name = "NAME")]
    pub receiver: Option<String>,

    /// Full call-site regex with a named group `id`; overrides --receiver
    #[arg(long, value_name = "REGEX")]
    pub call_pattern: Option<String>,

    /// Path or glob to skip; can be repeated
    #[arg(long = "ignore", value_name = "PATTERN")]
    pub ignores: Vec<String>,

    /// Follow symbolic links while walking
    #[arg(long)]
    pub follow_links: bool,

    /// Worker threads (0 = one per CPU core)
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Per-file read timeout in milliseconds (0 disables it)
    #[arg(long, value_name = "MS")]
    pub read_timeout_ms: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl CommonArgs {
    /// Apply the flags that were given on top of `config`.
    pub fn apply(&self, config: &mut Config) {
        if let Some(suffix) = &self.suffix {
            config.file_suffix = suffix.clone();
        }
        if let Some(marker) = &self.marker {
            config.class_marker = marker.clone();
        }
        if let Some(receiver) = &self.receiver {
            config.receiver = receiver.clone();
            // An explicit receiver replaces a configured full pattern.
            if self.call_pattern.is_none() {
                config.call_pattern = None;
            }
        }
        if let Some(pattern) = &self.call_pattern {
            config.call_pattern = Some(pattern.clone());
        }
        config.ignores.extend(self.ignores.iter().cloned());
        if self.follow_links {
            config.follow_links = true;
        }
        if let Some(jobs) = self.jobs {
            config.jobs = jobs;
        }
        if let Some(ms) = self.read_timeout_ms {
            config.read_timeout_ms = (ms > 0).then_some(ms);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScanFormat {
    /// One identifier per line
    Plain,
    /// Structured report
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CheckFormat {
    /// Cargo-style diagnostics
    Text,
    /// Structured report
    Json,
}

#[derive(Debug, Args)]
pub struct ScanCommand {
    /// Root directory of the source tree
    pub root: PathBuf,

    #[arg(long, value_enum, default_value_t = ScanFormat::Plain)]
    pub format: ScanFormat,

    /// Record which files reference each identifier (shown in JSON output)
    #[arg(long)]
    pub backrefs: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Root directory of the source tree
    pub root: PathBuf,

    /// Mapper directory, mapper XML file, or plain id list (overrides definedPath)
    #[arg(long, value_name = "PATH")]
    pub defined: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = CheckFormat::Text)]
    pub format: CheckFormat,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List SQL statement ids used by service classes
    Scan(ScanCommand),
    /// Report used ids that are not defined, and definitions nothing uses
    Check(CheckCommand),
    /// Initialize a new .sqlidrc.json configuration file
    Init,
    /// Start MCP server for AI coding agents
    Serve,
}
