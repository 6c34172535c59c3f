//! Exit codes for the cputier CLI.
//!
//! Exit code ranges:
//! - 0-1: Operational outcomes (parse outcome from code, not output)
//! - 10-19: User/environment errors (recoverable by user action)
//! - 20-29: Internal errors (bugs, should be reported)

use ct_common::{Error, ErrorCategory};

/// Exit codes for cputier operations.
///
/// These codes are a stable contract for scripts and loaders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Clean = 0,

    /// `check`: the requested feature is absent
    FeatureAbsent = 1,

    /// Invalid arguments or malformed override mask
    ArgsError = 10,

    /// Capability word could not be read on this platform
    CapabilityError = 11,

    /// Internal error (bug - please report)
    InternalError = 20,

    /// I/O error (e.g. stdout closed)
    IoError = 21,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the code name as a string constant (for JSON output).
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK",
            ExitCode::FeatureAbsent => "OK_ABSENT",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::CapabilityError => "ERR_CAPABILITY",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        match err.category() {
            ErrorCategory::Input => ExitCode::ArgsError,
            ErrorCategory::Platform => ExitCode::CapabilityError,
            ErrorCategory::Io => match err {
                Error::Io(_) => ExitCode::IoError,
                _ => ExitCode::InternalError,
            },
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}
