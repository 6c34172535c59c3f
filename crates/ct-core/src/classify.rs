//! Feature queries and tier classification.
//!
//! [`has_feature`] and [`classify_tier`] are pure functions over a mask.
//! [`CpuFeatures`] binds them to a [`CapabilitySource`] and re-reads the
//! source on every call; it never caches a mask or a tier.

use crate::hwcap::{AuxvSource, CapabilitySource, MaskReading};
use crate::report::FeatureReport;
use ct_common::{CapabilityMask, FeatureFlag, Tier};
use tracing::info;

/// Whether `flag` is set in `mask`.
pub fn has_feature(mask: CapabilityMask, flag: FeatureFlag) -> bool {
    mask.contains(flag)
}

/// Map a mask to the highest tier it qualifies for.
///
/// SVE2 implies ARMv9, which is a superset of dot product, so it is checked
/// first. The first match wins; a mask with no recognized bit is `Baseline`.
pub fn classify_tier(mask: CapabilityMask) -> Tier {
    if has_feature(mask, FeatureFlag::Sve2) {
        Tier::Armv9
    } else if has_feature(mask, FeatureFlag::DotProd) {
        Tier::DotProd
    } else {
        Tier::Baseline
    }
}

/// Capability queries against a single source.
///
/// Each method performs one fresh read and emits one diagnostic event.
#[derive(Debug, Clone)]
pub struct CpuFeatures<S = AuxvSource> {
    source: S,
}

impl CpuFeatures<AuxvSource> {
    /// Query the running CPU.
    pub fn new() -> Self {
        CpuFeatures {
            source: AuxvSource::new(),
        }
    }
}

impl Default for CpuFeatures<AuxvSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: CapabilitySource> CpuFeatures<S> {
    pub fn with_source(source: S) -> Self {
        CpuFeatures { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Read the current mask with provenance.
    pub fn reading(&self) -> MaskReading {
        self.source.read()
    }

    /// Whether `flag` is present right now.
    pub fn has(&self, flag: FeatureFlag) -> bool {
        let mask = crate::hwcap::read_capabilities(&self.source);
        let present = has_feature(mask, flag);
        info!(
            target: "cputier::classify",
            hwcap2 = %mask,
            feature = %flag,
            present,
            "HWCAP2: {}, {}: {}",
            mask,
            flag.description(),
            present as u8
        );
        present
    }

    /// Dot product instructions (armv8.2-a+dotprod).
    pub fn has_dot_prod(&self) -> bool {
        self.has(FeatureFlag::DotProd)
    }

    /// ARMv9 features, detected through SVE2.
    pub fn has_armv9(&self) -> bool {
        self.has(FeatureFlag::Sve2)
    }

    /// Int8 matrix multiply.
    pub fn has_i8mm(&self) -> bool {
        self.has(FeatureFlag::I8mm)
    }

    /// The best tier for this CPU.
    pub fn best_tier(&self) -> Tier {
        let mask = crate::hwcap::read_capabilities(&self.source);
        let tier = classify_tier(mask);
        info!(
            target: "cputier::classify",
            hwcap2 = %mask,
            tier = %tier,
            "Selected CPU tier: {} (HWCAP2: {})",
            tier,
            mask
        );
        tier
    }

    /// Everything known about the CPU, taken from one read.
    pub fn report(&self) -> FeatureReport {
        let reading = self.source.read();
        let report = FeatureReport::from_reading(self.source.name(), reading);
        info!(
            target: "cputier::classify",
            hwcap2 = %reading.mask,
            origin = %reading.origin,
            tier = %report.tier,
            "{}",
            report.summary()
        );
        report
    }
}
