//! cputier core library
//!
//! This library provides the core functionality for capability-tier
//! classification:
//! - Reading the `AT_HWCAP2` capability word from the OS (or a substitute)
//! - Feature queries and tier classification
//! - Feature reports for diagnostics
//! - Logging setup and exit codes for the CLI
//!
//! The binary entry point is in `main.rs`.

pub mod classify;
pub mod config;
pub mod exit_codes;
pub mod hwcap;
pub mod logging;
pub mod report;

pub use classify::{classify_tier, has_feature, CpuFeatures};
pub use hwcap::{read_capabilities, CapabilitySource, MaskOrigin, MaskReading};
pub use report::FeatureReport;
