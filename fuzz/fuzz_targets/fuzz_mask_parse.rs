//! Fuzz target for capability mask parsing.
//!
//! Accepted masks must render back to a string that parses to the same value.

#![no_main]

use ct_common::CapabilityMask;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    if let Ok(mask) = data.parse::<CapabilityMask>() {
        let again: CapabilityMask = mask.to_string().parse().expect("display output parses");
        assert_eq!(mask, again);
    }
});
