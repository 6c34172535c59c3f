use super::{CapabilitySource, MaskReading};
use ct_common::CapabilityMask;

/// Source that always reports the same caller-supplied mask.
///
/// Used for `--hwcap2` / `CPUTIER_HWCAP2` and for tests that must not depend
/// on the host CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedSource {
    mask: CapabilityMask,
}

impl FixedSource {
    pub fn new(mask: CapabilityMask) -> Self {
        FixedSource { mask }
    }
}

impl CapabilitySource for FixedSource {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn read(&self) -> MaskReading {
        MaskReading::overridden(self.mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hwcap::MaskOrigin;

    #[test]
    fn test_fixed_source_reports_override() {
        let source = FixedSource::new(CapabilityMask::from_raw(2));
        let reading = source.read();
        assert_eq!(reading.mask.raw(), 2);
        assert_eq!(reading.origin, MaskOrigin::Override);
        assert!(reading.is_available());
    }

    #[test]
    fn test_fixed_empty_mask_is_still_available() {
        let reading = FixedSource::new(CapabilityMask::EMPTY).read();
        assert!(reading.mask.is_empty());
        assert!(reading.is_available());
    }
}
