//! Source selection.
//!
//! Supports configuration via:
//! - Environment variable (`CPUTIER_HWCAP2`)
//! - CLI flag (`--hwcap2`), which takes precedence

use crate::hwcap::{AuxvSource, CapabilitySource, FixedSource};
use ct_common::{CapabilityMask, Result};

/// Environment variable holding a synthetic `AT_HWCAP2` word.
pub const HWCAP2_ENV: &str = "CPUTIER_HWCAP2";

/// Which capability source to query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceConfig {
    /// Report this mask instead of reading the OS.
    pub hwcap2_override: Option<CapabilityMask>,
}

impl SourceConfig {
    /// Resolve from a CLI override, else from the environment.
    ///
    /// The environment is not consulted when the flag is given. A malformed
    /// environment value is an error rather than a silent fallback to the
    /// real CPU.
    pub fn from_env(cli_override: Option<CapabilityMask>) -> Result<Self> {
        Self::resolve(cli_override, std::env::var(HWCAP2_ENV).ok().as_deref())
    }

    fn resolve(cli_override: Option<CapabilityMask>, env_value: Option<&str>) -> Result<Self> {
        if cli_override.is_some() {
            return Ok(SourceConfig {
                hwcap2_override: cli_override,
            });
        }

        let hwcap2_override = match env_value.map(str::trim) {
            Some(val) if !val.is_empty() => Some(val.parse()?),
            _ => None,
        };
        Ok(SourceConfig { hwcap2_override })
    }

    /// Build the configured source.
    pub fn build(&self) -> Box<dyn CapabilitySource> {
        match self.hwcap2_override {
            Some(mask) => Box::new(FixedSource::new(mask)),
            None => Box::new(AuxvSource::new()),
        }
    }
}
