//! Feature reports.
//!
//! A [`FeatureReport`] is a snapshot of every recognized feature and the
//! resulting tier, all derived from a single mask read so the fields can
//! never disagree with each other.

use crate::classify::{classify_tier, has_feature};
use crate::hwcap::{MaskOrigin, MaskReading};
use ct_common::{CapabilityMask, FeatureFlag, Tier};
use serde::{Deserialize, Serialize};

/// Snapshot of the CPU's capability bits and tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureReport {
    /// Name of the source the mask was read from.
    pub source: String,

    /// How the mask was obtained.
    pub origin: MaskOrigin,

    /// False when the OS query was unavailable and the mask defaulted to 0.
    pub source_available: bool,

    /// Raw `AT_HWCAP2` word.
    pub hwcap2: CapabilityMask,

    /// `hwcap2` formatted as hex.
    pub hwcap2_hex: String,

    /// ASIMD dot product.
    pub dotprod: bool,

    /// SVE2 / ARMv9.
    pub armv9: bool,

    /// Int8 matrix multiply.
    pub i8mm: bool,

    /// Best tier for this mask.
    pub tier: Tier,

    /// Architecture string of the selected tier.
    pub tier_description: String,

    /// Tiers a loader may accept, best first.
    pub candidates: Vec<Tier>,

    /// RFC 3339 timestamp of the read.
    pub detected_at: String,
}

impl FeatureReport {
    /// Build a report from one reading.
    pub fn from_reading(source: &str, reading: MaskReading) -> Self {
        let mask = reading.mask;
        let tier = classify_tier(mask);

        FeatureReport {
            source: source.to_string(),
            origin: reading.origin,
            source_available: reading.is_available(),
            hwcap2: mask,
            hwcap2_hex: format!("{:#010x}", mask.raw()),
            dotprod: has_feature(mask, FeatureFlag::DotProd),
            armv9: has_feature(mask, FeatureFlag::Sve2),
            i8mm: has_feature(mask, FeatureFlag::I8mm),
            tier,
            tier_description: tier.description().to_string(),
            candidates: tier.fallback_chain().to_vec(),
            detected_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Presence of a single feature.
    pub fn has(&self, flag: FeatureFlag) -> bool {
        match flag {
            FeatureFlag::DotProd => self.dotprod,
            FeatureFlag::Sve2 => self.armv9,
            FeatureFlag::I8mm => self.i8mm,
        }
    }

    /// One-line summary.
    pub fn summary(&self) -> String {
        format!(
            "Tier: {} | DotProd: {} | ARMv9 (SVE2): {} | I8MM: {} | HWCAP2: {} ({})",
            self.tier,
            yes_no(self.dotprod),
            yes_no(self.armv9),
            yes_no(self.i8mm),
            self.hwcap2_hex,
            self.origin
        )
    }

    /// Markdown rendering for humans.
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("# CPU Features\n\n");
        out.push_str(&format!(
            "Best tier: **{}** ({})\n\n",
            self.tier, self.tier_description
        ));
        out.push_str("| Feature | Present |\n");
        out.push_str("|---------|---------|\n");
        for flag in FeatureFlag::ALL {
            out.push_str(&format!(
                "| {} | {} |\n",
                flag.description(),
                yes_no(self.has(flag))
            ));
        }
        out.push('\n');

        let chain: Vec<&str> = self.candidates.iter().map(|t| t.as_str()).collect();
        out.push_str(&format!("Candidates: {}\n", chain.join(" -> ")));
        out.push_str(&format!(
            "HWCAP2: {} (source: {}, {})\n",
            self.hwcap2_hex, self.source, self.origin
        ));
        if !self.source_available {
            out.push_str("\nThe capability word could not be read; reporting baseline.\n");
        }
        out
    }
}

fn yes_no(b: bool) -> &'static str {
    if b {
        "yes"
    } else {
        "no"
    }
}
