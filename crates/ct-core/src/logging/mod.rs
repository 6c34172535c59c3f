//! Structured logging for cputier.
//!
//! Provides dual-mode logging:
//! - Human-readable console output for interactive use
//! - Machine-parseable JSONL for hosts that scrape stderr
//!
//! stdout is reserved for command payloads; all log output goes to stderr.
//! Query events use the `cputier::hwcap` and `cputier::classify` targets.

pub mod config;

pub use config::{LogConfig, LogFormat, LogLevel};

use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber.
///
/// Returns `false` if a subscriber was already installed, which is expected
/// when a host loads the library more than once.
pub fn init_logging(config: &LogConfig) -> bool {
    let filter = build_filter(config);

    match config.format {
        LogFormat::Human => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_ansi(std::io::stderr().is_terminal()),
            )
            .try_init()
            .is_ok(),
        LogFormat::Jsonl => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(false),
            )
            .try_init()
            .is_ok(),
    }
}

/// `RUST_LOG` replaces the per-target directive only when it survived
/// [`LogConfig`] resolution; a malformed one is ignored.
fn build_filter(config: &LogConfig) -> EnvFilter {
    config
        .env_filter
        .as_deref()
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(config.filter_directive()))
}

/// Initialize logging from the environment alone.
pub fn init_default_logging() -> bool {
    init_logging(&LogConfig::from_env(None, None))
}
