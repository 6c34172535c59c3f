//! Capability masks and the feature flags recognized inside them.
//!
//! A [`CapabilityMask`] is the raw `AT_HWCAP2` word handed out by the kernel.
//! The set of [`FeatureFlag`]s that carry meaning for tier selection is fixed
//! at build time; every other bit is carried along but never interpreted.

use crate::error::Error;
use serde::{Deserialize, Serialize};

/// Raw hardware-capability bitmask as read from the auxiliary vector.
///
/// The value is immutable once read. Readers produce a fresh mask on every
/// query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilityMask(u64);

impl CapabilityMask {
    /// The all-zero mask: no extended features detected.
    pub const EMPTY: CapabilityMask = CapabilityMask(0);

    /// Wrap a raw bitmask.
    pub const fn from_raw(raw: u64) -> Self {
        CapabilityMask(raw)
    }

    /// The raw bitmask.
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Whether no bit is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Bitwise intersection test against a single feature flag.
    pub const fn contains(self, flag: FeatureFlag) -> bool {
        self.0 & flag.bit() != 0
    }

    /// Return a copy of this mask with `flag` set.
    pub const fn with(self, flag: FeatureFlag) -> Self {
        CapabilityMask(self.0 | flag.bit())
    }
}

impl From<u64> for CapabilityMask {
    fn from(raw: u64) -> Self {
        CapabilityMask(raw)
    }
}

impl std::fmt::Display for CapabilityMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl std::fmt::LowerHex for CapabilityMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::LowerHex::fmt(&self.0, f)
    }
}

impl std::str::FromStr for CapabilityMask {
    type Err = Error;

    /// Parse `0x`-prefixed hex, `0b`-prefixed binary, or plain decimal.
    /// Underscores are accepted as separators between digits only.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = |reason: String| Error::InvalidMask(format!("{:?}: {}", trimmed, reason));

        let (digits, radix) = match trimmed.get(..2).map(|p| p.to_ascii_lowercase()) {
            Some(p) if p == "0x" => (&trimmed[2..], 16),
            Some(p) if p == "0b" => (&trimmed[2..], 2),
            _ => (trimmed, 10),
        };

        // from_str_radix tolerates a leading sign.
        if !digits.starts_with(|c: char| c.is_digit(radix)) {
            return Err(invalid("expected a digit".to_string()));
        }

        let cleaned: String = digits.chars().filter(|c| *c != '_').collect();
        u64::from_str_radix(&cleaned, radix)
            .map(CapabilityMask)
            .map_err(|e| invalid(e.to_string()))
    }
}

/// A named bit position within the `AT_HWCAP2` word.
///
/// Bit positions follow `arch/arm64/include/uapi/asm/hwcap.h` for SVE2 and
/// I8MM. The dot-product bit is read from the same word at position 20.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureFlag {
    /// ASIMD dot product (armv8.2-a+dotprod).
    DotProd,
    /// SVE2, the marker for the ARMv9 architecture.
    Sve2,
    /// Int8 matrix multiply.
    I8mm,
}

impl FeatureFlag {
    /// Every recognized flag.
    pub const ALL: [FeatureFlag; 3] = [FeatureFlag::DotProd, FeatureFlag::Sve2, FeatureFlag::I8mm];

    /// Mask with only this flag's bit set.
    pub const fn bit(self) -> u64 {
        match self {
            FeatureFlag::DotProd => 1 << 20,
            FeatureFlag::Sve2 => 1 << 1,
            FeatureFlag::I8mm => 1 << 13,
        }
    }

    /// Stable lowercase identifier.
    pub const fn as_str(self) -> &'static str {
        match self {
            FeatureFlag::DotProd => "dotprod",
            FeatureFlag::Sve2 => "sve2",
            FeatureFlag::I8mm => "i8mm",
        }
    }

    /// Human-readable description.
    pub const fn description(self) -> &'static str {
        match self {
            FeatureFlag::DotProd => "ASIMD dot product",
            FeatureFlag::Sve2 => "SVE2 (ARMv9)",
            FeatureFlag::I8mm => "Int8 matrix multiply",
        }
    }
}

impl std::fmt::Display for FeatureFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FeatureFlag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dotprod" | "dot-prod" | "asimddp" => Ok(FeatureFlag::DotProd),
            "sve2" | "armv9" => Ok(FeatureFlag::Sve2),
            "i8mm" => Ok(FeatureFlag::I8mm),
            _ => Err(Error::UnknownFeature(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_bits_match_hwcap2_layout() {
        assert_eq!(FeatureFlag::Sve2.bit(), 0x0000_0002);
        assert_eq!(FeatureFlag::I8mm.bit(), 0x0000_2000);
        assert_eq!(FeatureFlag::DotProd.bit(), 0x0010_0000);
    }

    #[test]
    fn test_flag_bits_are_disjoint() {
        let combined = FeatureFlag::ALL.iter().fold(0u64, |acc, f| {
            assert_eq!(acc & f.bit(), 0, "{} overlaps", f);
            acc | f.bit()
        });
        assert_eq!(combined.count_ones(), 3);
    }

    #[test]
    fn test_mask_contains() {
        let mask = CapabilityMask::from_raw(0x0010_0002);
        assert!(mask.contains(FeatureFlag::DotProd));
        assert!(mask.contains(FeatureFlag::Sve2));
        assert!(!mask.contains(FeatureFlag::I8mm));
        assert!(!CapabilityMask::EMPTY.contains(FeatureFlag::DotProd));
    }

    #[test]
    fn test_mask_with() {
        let mask = CapabilityMask::EMPTY
            .with(FeatureFlag::I8mm)
            .with(FeatureFlag::DotProd);
        assert_eq!(mask.raw(), 0x0010_2000);
        assert!(!mask.contains(FeatureFlag::Sve2));
    }

    #[test]
    fn test_mask_parse() {
        assert_eq!("0x2".parse::<CapabilityMask>().unwrap().raw(), 2);
        assert_eq!("0X0010_0000".parse::<CapabilityMask>().unwrap().raw(), 0x0010_0000);
        assert_eq!("8192".parse::<CapabilityMask>().unwrap().raw(), 8192);
        assert_eq!("0b10".parse::<CapabilityMask>().unwrap().raw(), 2);
        assert_eq!(" 0 ".parse::<CapabilityMask>().unwrap(), CapabilityMask::EMPTY);
    }

    #[test]
    fn test_mask_parse_rejects_garbage() {
        for bad in [
            "",
            "0x",
            "sve2",
            "-1",
            "+5",
            "0x+2",
            "0b-1",
            "0_x2",
            "_12",
            "0xzz",
            "0x1_0000_0000_0000_0000",
        ] {
            let err = bad.parse::<CapabilityMask>().unwrap_err();
            assert!(matches!(err, Error::InvalidMask(_)), "{bad:?} -> {err}");
        }
    }

    #[test]
    fn test_mask_display_is_hex() {
        assert_eq!(CapabilityMask::from_raw(0x0010_0000).to_string(), "0x100000");
        assert_eq!(CapabilityMask::EMPTY.to_string(), "0x0");
        assert_eq!(format!("{:08x}", CapabilityMask::from_raw(2)), "00000002");
    }

    #[test]
    fn test_mask_serde_transparent() {
        let json = serde_json::to_string(&CapabilityMask::from_raw(2)).unwrap();
        assert_eq!(json, "2");
        let back: CapabilityMask = serde_json::from_str("8192").unwrap();
        assert!(back.contains(FeatureFlag::I8mm));
    }

    #[test]
    fn test_feature_parse_aliases() {
        assert_eq!("DotProd".parse::<FeatureFlag>().unwrap(), FeatureFlag::DotProd);
        assert_eq!("asimddp".parse::<FeatureFlag>().unwrap(), FeatureFlag::DotProd);
        assert_eq!("armv9".parse::<FeatureFlag>().unwrap(), FeatureFlag::Sve2);
        assert_eq!("i8mm".parse::<FeatureFlag>().unwrap(), FeatureFlag::I8mm);
        assert!(matches!(
            "neon".parse::<FeatureFlag>(),
            Err(Error::UnknownFeature(_))
        ));
    }

    #[test]
    fn test_feature_serialization() {
        assert_eq!(serde_json::to_string(&FeatureFlag::DotProd).unwrap(), "\"dotprod\"");
        assert_eq!(serde_json::to_string(&FeatureFlag::Sve2).unwrap(), "\"sve2\"");
    }
}
