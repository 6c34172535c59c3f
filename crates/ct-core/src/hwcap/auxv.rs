//! Auxiliary-vector backed sources.
//!
//! [`AuxvSource`] asks libc's `getauxval(AT_HWCAP2)`. The bits are only
//! meaningful on aarch64, so on every other architecture it reports
//! [`MaskOrigin::Unavailable`](super::MaskOrigin::Unavailable).
//! [`ProcAuxvSource`] parses `/proc/self/auxv` directly and is what
//! `AuxvSource` consults to tell a zero word from a missing entry.

use super::{CapabilitySource, MaskReading};
use std::path::PathBuf;
use tracing::{debug, trace};

/// ELF auxiliary vector entry type for the second hardware-capability word.
pub const AT_HWCAP2: u64 = 26;

/// Terminator entry of the auxiliary vector.
const AT_NULL: u64 = 0;

/// Location of the current process's auxiliary vector on Linux and Android.
pub const DEFAULT_AUXV_PATH: &str = "/proc/self/auxv";

/// Look up `key` in a raw auxiliary vector.
///
/// The buffer is a sequence of `(type, value)` pairs of native word size, in
/// native byte order, terminated by `AT_NULL`. Trailing partial entries are
/// ignored. Returns `None` when the key is absent.
pub fn parse_auxv(bytes: &[u8], key: u64) -> Option<u64> {
    const WORD: usize = std::mem::size_of::<usize>();

    for entry in bytes.chunks_exact(2 * WORD) {
        let (a_type, a_val) = entry.split_at(WORD);
        let a_type = usize::from_ne_bytes(a_type.try_into().ok()?) as u64;
        let a_val = usize::from_ne_bytes(a_val.try_into().ok()?) as u64;

        if a_type == AT_NULL {
            break;
        }
        if a_type == key {
            return Some(a_val);
        }
    }
    None
}

/// Reads `AT_HWCAP2` from an auxiliary-vector file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcAuxvSource {
    path: PathBuf,
}

impl ProcAuxvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ProcAuxvSource { path: path.into() }
    }
}

impl Default for ProcAuxvSource {
    fn default() -> Self {
        ProcAuxvSource::new(DEFAULT_AUXV_PATH)
    }
}

impl CapabilitySource for ProcAuxvSource {
    fn name(&self) -> &'static str {
        "procfs"
    }

    fn read(&self) -> MaskReading {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(
                    target: "cputier::hwcap",
                    path = %self.path.display(),
                    error = %e,
                    "auxiliary vector not readable"
                );
                return MaskReading::unavailable();
            }
        };

        match parse_auxv(&bytes, AT_HWCAP2) {
            Some(raw) => MaskReading::os(raw),
            None => {
                debug!(
                    target: "cputier::hwcap",
                    path = %self.path.display(),
                    "AT_HWCAP2 entry missing"
                );
                MaskReading::unavailable()
            }
        }
    }
}

/// Reads `AT_HWCAP2` through `getauxval`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuxvSource;

impl AuxvSource {
    pub fn new() -> Self {
        AuxvSource
    }
}

impl CapabilitySource for AuxvSource {
    fn name(&self) -> &'static str {
        "auxv"
    }

    fn read(&self) -> MaskReading {
        read_hwcap2()
    }
}

#[cfg(all(target_arch = "aarch64", any(target_os = "linux", target_os = "android")))]
fn read_hwcap2() -> MaskReading {
    // SAFETY: errno is thread-local and getauxval only reads the process's
    // auxiliary vector.
    let raw = unsafe {
        clear_errno();
        libc::getauxval(AT_HWCAP2 as libc::c_ulong)
    } as u64;
    trace!(target: "cputier::hwcap", hwcap2 = raw, "getauxval(AT_HWCAP2)");

    if raw != 0 {
        return MaskReading::os(raw);
    }

    let errno = std::io::Error::last_os_error().raw_os_error();
    zero_word_reading(errno, &ProcAuxvSource::default())
}

#[cfg(all(target_arch = "aarch64", target_os = "linux"))]
unsafe fn clear_errno() {
    *libc::__errno_location() = 0;
}

#[cfg(all(target_arch = "aarch64", target_os = "android"))]
unsafe fn clear_errno() {
    *libc::__errno() = 0;
}

/// Interpret a zero `getauxval` result.
///
/// glibc (2.19+) and bionic set `ENOENT` when the entry is missing, so any
/// other errno means the word really is zero. On `ENOENT` the auxiliary
/// vector is re-read from `procfs` to confirm.
#[cfg_attr(
    not(all(target_arch = "aarch64", any(target_os = "linux", target_os = "android"))),
    allow(dead_code)
)]
fn zero_word_reading(errno: Option<i32>, procfs: &ProcAuxvSource) -> MaskReading {
    if errno != Some(libc::ENOENT) {
        return MaskReading::os(0);
    }
    procfs.read()
}

#[cfg(not(all(target_arch = "aarch64", any(target_os = "linux", target_os = "android"))))]
fn read_hwcap2() -> MaskReading {
    trace!(
        target: "cputier::hwcap",
        arch = std::env::consts::ARCH,
        os = std::env::consts::OS,
        "AT_HWCAP2 is not an arm64 capability word on this target"
    );
    MaskReading::unavailable()
}
