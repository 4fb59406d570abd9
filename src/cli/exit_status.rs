use std::process::ExitCode;

/// Process exit status.
///
/// - `Success` (0): the command ran; a scan that finds nothing, or only
///   recoverable warnings, still succeeds
/// - `Failure` (1): `check` found identifiers with no definition
/// - `Error` (2): fatal error (missing root, bad pattern, unreadable config)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
