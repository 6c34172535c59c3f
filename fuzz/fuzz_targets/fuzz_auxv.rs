//! Fuzz target for auxiliary vector parsing.
//!
//! Tests that `parse_auxv` handles arbitrary bytes without panicking and that
//! whatever it finds classifies to a tier.

#![no_main]

use ct_common::CapabilityMask;
use ct_core::classify_tier;
use ct_core::hwcap::{parse_auxv, AT_HWCAP2};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Some(raw) = parse_auxv(data, AT_HWCAP2) {
        let _ = classify_tier(CapabilityMask::from_raw(raw));
    }
});
