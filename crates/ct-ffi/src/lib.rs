//! Host entry points for cputier.
//!
//! Builds `libcputier` as a cdylib exposing the four capability queries:
//! - Plain C ABI (`cputier_*`) for any host that can call C
//! - JNI symbols for `dev.cputier.CpuFeatures` (feature `jni`)
//!
//! Every call reads `AT_HWCAP2` afresh and logs one diagnostic event. No
//! call can fail: an unreadable capability word reports the baseline tier.
//! Hosts that want the events on stderr call [`cputier_init_logging`] once.

#[cfg(feature = "jni")]
pub mod java;

use ct_common::Tier;
use ct_core::CpuFeatures;
use std::ffi::{c_char, CStr};

/// NUL-terminated tier identifier with static lifetime.
pub fn tier_cstr(tier: Tier) -> &'static CStr {
    match tier {
        Tier::Armv9 => c"armv9",
        Tier::DotProd => c"dotprod",
        Tier::Baseline => c"baseline",
    }
}

/// Whether the CPU supports dot product instructions (armv8.2-a+dotprod).
#[no_mangle]
pub extern "C" fn cputier_has_dot_prod() -> bool {
    CpuFeatures::new().has_dot_prod()
}

/// Whether the CPU supports ARMv9 features (SVE2).
#[no_mangle]
pub extern "C" fn cputier_has_armv9() -> bool {
    CpuFeatures::new().has_armv9()
}

/// Whether the CPU supports int8 matrix multiply.
#[no_mangle]
pub extern "C" fn cputier_has_i8mm() -> bool {
    CpuFeatures::new().has_i8mm()
}

/// Best tier for this CPU: "armv9", "dotprod" or "baseline".
///
/// The returned pointer refers to static storage; the caller must not free
/// it.
#[no_mangle]
pub extern "C" fn cputier_best_tier() -> *const c_char {
    tier_cstr(CpuFeatures::new().best_tier()).as_ptr()
}

/// Raw `AT_HWCAP2` word, 0 when unavailable.
#[no_mangle]
pub extern "C" fn cputier_hwcap2() -> u64 {
    ct_core::read_capabilities(&ct_core::hwcap::AuxvSource::new()).raw()
}

/// Install the stderr subscriber configured by `CT_LOG` / `CT_LOG_FORMAT`.
///
/// Returns false if a subscriber is already installed.
#[no_mangle]
pub extern "C" fn cputier_init_logging() -> bool {
    ct_core::logging::init_default_logging()
}
