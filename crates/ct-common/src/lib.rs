//! cputier common types and errors.
//!
//! This crate provides the vocabulary shared by the reader, the classifier
//! and the host bindings:
//! - Capability masks and the recognized feature flags
//! - The closed, ordered set of performance tiers
//! - Common error types
//! - Output formats

pub mod error;
pub mod feature;
pub mod output;
pub mod tier;

pub use error::{Error, ErrorCategory, Result, StructuredError};
pub use feature::{CapabilityMask, FeatureFlag};
pub use output::OutputFormat;
pub use tier::Tier;

/// Version of the JSON payloads emitted by the CLI.
pub const SCHEMA_VERSION: &str = "1.0.0";
