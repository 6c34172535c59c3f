//! Logging configuration.
//!
//! Supports configuration via:
//! - Environment variables (`CT_LOG`, `RUST_LOG`, `CT_LOG_FORMAT`)
//! - CLI flags (`-v`, `-q`)

use serde::{Deserialize, Serialize};

/// Log targets owned by this workspace.
const TARGETS: [&str; 3] = ["cputier", "ct_core", "ct_ffi"];

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable console format (default).
    #[default]
    Human,
    /// Machine-parseable JSON lines.
    Jsonl,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "console" | "pretty" => Ok(LogFormat::Human),
            "jsonl" | "json" => Ok(LogFormat::Jsonl),
            _ => Err(format!("unknown log format: {}", s)),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Human => write!(f, "human"),
            LogFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}

/// Log level filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    /// Per-query diagnostics (default).
    #[default]
    Info,
    Warn,
    Error,
    /// Completely silent.
    Off,
}

impl LogLevel {
    /// Map `-v` / `-q` counts to a level.
    ///
    /// Returns `None` when neither flag was given so the environment decides.
    pub fn from_verbosity(verbose: u8, quiet: bool) -> Option<Self> {
        if quiet {
            return Some(LogLevel::Error);
        }
        match verbose {
            0 => None,
            1 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "off" | "none" | "quiet" => Ok(LogLevel::Off),
            _ => Err(format!("unknown log level: {}", s)),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
            LogLevel::Off => write!(f, "off"),
        }
    }
}

impl From<LogLevel> for tracing_subscriber::filter::LevelFilter {
    fn from(level: LogLevel) -> Self {
        use tracing_subscriber::filter::LevelFilter;
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Off => LevelFilter::OFF,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogConfig {
    /// Output format.
    pub format: LogFormat,
    /// Minimum log level for this workspace's targets.
    pub level: LogLevel,
    /// Full `RUST_LOG` directive. Only kept when neither the CLI nor `CT_LOG`
    /// chose a level.
    pub env_filter: Option<String>,
}

impl LogConfig {
    /// Create config from environment and CLI overrides.
    pub fn from_env(cli_level: Option<LogLevel>, cli_format: Option<LogFormat>) -> Self {
        let ct_log = std::env::var("CT_LOG").ok();
        let rust_log = std::env::var("RUST_LOG").ok();
        let ct_log_format = std::env::var("CT_LOG_FORMAT").ok();

        Self::resolve(
            ct_log.as_deref(),
            rust_log.as_deref(),
            ct_log_format.as_deref(),
            cli_level,
            cli_format,
        )
    }

    /// Precedence: CLI, then `CT_LOG`, then `RUST_LOG` as a full filter,
    /// then the default. Unparseable `CT_LOG` and `CT_LOG_FORMAT` values are
    /// ignored.
    fn resolve(
        ct_log: Option<&str>,
        rust_log: Option<&str>,
        ct_log_format: Option<&str>,
        cli_level: Option<LogLevel>,
        cli_format: Option<LogFormat>,
    ) -> Self {
        let mut config = LogConfig::default();

        let level = cli_level.or_else(|| ct_log.and_then(|v| v.parse::<LogLevel>().ok()));
        match level {
            Some(level) => config.level = level,
            None => {
                config.env_filter = rust_log
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(str::to_string);
            }
        }

        config.format = cli_format
            .or_else(|| ct_log_format.and_then(|v| v.parse::<LogFormat>().ok()))
            .unwrap_or_default();

        config
    }

    /// `EnvFilter` directive enabling this workspace's targets at `level`.
    pub fn filter_directive(&self) -> String {
        TARGETS
            .iter()
            .map(|target| format!("{}={}", target, self.level))
            .collect::<Vec<_>>()
            .join(",")
    }
}
