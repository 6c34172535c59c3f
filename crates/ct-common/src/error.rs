//! Error types for cputier.
//!
//! The capability queries themselves never fail: an unreadable mask
//! degrades to the empty mask. Errors only arise at the edges, when parsing
//! user-supplied masks, feature or tier names, or writing output.
//!
//! Errors serialize to structured JSON for machine consumers:
//! ```json
//! {
//!   "code": 10,
//!   "category": "input",
//!   "message": "invalid capability mask: \"0xzz\": invalid digit found in string",
//!   "recoverable": true
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for cputier operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Malformed masks, feature names or tier names.
    Input,
    /// File I/O and serialization errors.
    Io,
    /// Platform compatibility errors.
    Platform,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Input => write!(f, "input"),
            ErrorCategory::Io => write!(f, "io"),
            ErrorCategory::Platform => write!(f, "platform"),
        }
    }
}

/// Unified error type for cputier.
#[derive(Error, Debug)]
pub enum Error {
    // Input errors (10-19)
    #[error("invalid capability mask: {0}")]
    InvalidMask(String),

    #[error("unknown tier: {0} (expected armv9, dotprod or baseline)")]
    UnknownTier(String),

    #[error("unknown feature: {0} (expected dotprod, sve2 or i8mm)")]
    UnknownFeature(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Platform errors (70-79)
    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),
}

impl Error {
    /// Returns the stable error code for this error type.
    ///
    /// - 10-19: Input errors
    /// - 60-69: I/O errors
    /// - 70-79: Platform errors
    pub fn code(&self) -> u32 {
        match self {
            Error::InvalidMask(_) => 10,
            Error::UnknownTier(_) => 11,
            Error::UnknownFeature(_) => 12,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
            Error::UnsupportedPlatform(_) => 70,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::InvalidMask(_) | Error::UnknownTier(_) | Error::UnknownFeature(_) => {
                ErrorCategory::Input
            }
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
            Error::UnsupportedPlatform(_) => ErrorCategory::Platform,
        }
    }

    /// Whether the caller can fix the problem and retry.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::InvalidMask(_) | Error::UnknownTier(_) | Error::UnknownFeature(_) => true,
            Error::Io(_) => true,
            Error::Json(_) => false,
            Error::UnsupportedPlatform(_) => false,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::InvalidMask(_) => {
                "Pass the mask as 0x-prefixed hex (e.g. 0x100000), 0b-prefixed binary, or decimal."
            }
            Error::UnknownTier(_) => "Run 'cputier tiers' to list valid tier names.",
            Error::UnknownFeature(_) => "Valid features are: dotprod, sve2, i8mm.",
            Error::Io(_) => "Check that stdout is writable and retry.",
            Error::Json(_) => "Internal serialization failure. Please report it as a bug.",
            Error::UnsupportedPlatform(_) => {
                "Capability bits are only read on aarch64 Linux and Android; pass --hwcap2 to simulate."
            }
        }
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Whether the error is potentially recoverable.
    pub recoverable: bool,

    /// Remediation hint.
    pub remediation: String,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
            remediation: err.remediation().to_string(),
        }
    }
}

impl StructuredError {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }

    /// Serialize to pretty JSON string.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| self.to_json())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_grouped_by_category() {
        let input = [
            Error::InvalidMask("x".into()),
            Error::UnknownTier("x".into()),
            Error::UnknownFeature("x".into()),
        ];
        for err in &input {
            assert_eq!(err.category(), ErrorCategory::Input);
            assert!((10..20).contains(&err.code()));
            assert!(err.is_recoverable());
        }

        let io = Error::from(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"));
        assert_eq!(io.category(), ErrorCategory::Io);
        assert_eq!(io.code(), 60);

        let platform = Error::UnsupportedPlatform("x86_64".into());
        assert_eq!(platform.category(), ErrorCategory::Platform);
        assert!(!platform.is_recoverable());
    }

    #[test]
    fn test_structured_error_json() {
        let err = Error::UnknownTier("armv8".into());
        let structured = StructuredError::from(&err);
        let json: serde_json::Value = serde_json::from_str(&structured.to_json()).unwrap();
        assert_eq!(json["code"], 11);
        assert_eq!(json["category"], "input");
        assert_eq!(json["recoverable"], true);
        assert!(json["message"].as_str().unwrap().contains("armv8"));
    }

    #[test]
    fn test_category_display() {
        assert_eq!(ErrorCategory::Input.to_string(), "input");
        assert_eq!(ErrorCategory::Platform.to_string(), "platform");
    }
}
