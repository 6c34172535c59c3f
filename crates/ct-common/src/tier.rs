//! Performance tiers.
//!
//! Tiers are a closed, totally ordered set. The derived `Ord` follows
//! capability level: `Baseline < DotProd < Armv9`.

use crate::error::Error;
use crate::feature::FeatureFlag;
use serde::{Deserialize, Serialize};

/// Named performance tier an external loader selects artifacts by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// armv8-a; runs on every arm64 device.
    #[default]
    Baseline,
    /// armv8.2-a+dotprod.
    DotProd,
    /// armv9-a with SVE2.
    Armv9,
}

impl Tier {
    /// All tiers, highest capability first.
    pub const ALL: [Tier; 3] = [Tier::Armv9, Tier::DotProd, Tier::Baseline];

    /// Stable identifier handed to hosts.
    pub const fn as_str(self) -> &'static str {
        match self {
            Tier::Armv9 => "armv9",
            Tier::DotProd => "dotprod",
            Tier::Baseline => "baseline",
        }
    }

    /// Target architecture string the tier's artifacts are built for.
    pub const fn description(self) -> &'static str {
        match self {
            Tier::Armv9 => "armv9-a with SVE2",
            Tier::DotProd => "armv8.2-a+dotprod",
            Tier::Baseline => "armv8-a",
        }
    }

    /// The feature flag whose presence selects this tier, if any.
    pub const fn required_feature(self) -> Option<FeatureFlag> {
        match self {
            Tier::Armv9 => Some(FeatureFlag::Sve2),
            Tier::DotProd => Some(FeatureFlag::DotProd),
            Tier::Baseline => None,
        }
    }

    /// Tiers a loader may accept when this tier is the best match, best first.
    ///
    /// Always ends with [`Tier::Baseline`].
    pub fn fallback_chain(self) -> &'static [Tier] {
        match self {
            Tier::Armv9 => &[Tier::Armv9, Tier::DotProd, Tier::Baseline],
            Tier::DotProd => &[Tier::DotProd, Tier::Baseline],
            Tier::Baseline => &[Tier::Baseline],
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Tier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "armv9" => Ok(Tier::Armv9),
            "dotprod" => Ok(Tier::DotProd),
            "baseline" => Ok(Tier::Baseline),
            _ => Err(Error::UnknownTier(s.to_string())),
        }
    }
}
