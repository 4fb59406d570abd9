use super::super::{
    args::{CheckFormat, ScanFormat},
    exit_status::ExitStatus,
};
use crate::{core::ScanOutcome, output::CheckOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Scan,
    Check,
    Init,
}

#[derive(Debug)]
pub enum CommandSummary {
    Scan(ScanSummary),
    Check(CheckSummary),
    Init(InitSummary),
}

#[derive(Debug)]
pub struct ScanSummary {
    pub outcome: ScanOutcome,
    pub format: ScanFormat,
}

#[derive(Debug)]
pub struct CheckSummary {
    pub outcome: CheckOutcome,
    pub format: CheckFormat,
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
}

/// Result of running sqlid commands
#[derive(Debug)]
pub struct CommandResult {
    pub kind: CommandKind,
    pub summary: CommandSummary,
    pub error_count: usize,
    pub warning_count: usize,
    /// If true, exit code 1 should be returned when error_count > 0.
    pub exit_on_errors: bool,
}

impl CommandResult {
    pub fn exit_status(&self) -> ExitStatus {
        if self.exit_on_errors && self.error_count > 0 {
            ExitStatus::Failure
        } else {
            ExitStatus::Success
        }
    }
}
