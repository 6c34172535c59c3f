//! Hardware-capability readers.
//!
//! The kernel publishes CPU feature bits in the ELF auxiliary vector. Every
//! read goes through the [`CapabilitySource`] trait so callers (and tests)
//! can substitute a synthetic mask for the process-wide OS state.
//!
//! Readers never fail. When the OS query is unavailable the reading carries
//! the empty mask and [`MaskOrigin::Unavailable`], which classifies exactly
//! like a CPU without extended features.

mod auxv;
mod fixed;

pub use auxv::{parse_auxv, AuxvSource, ProcAuxvSource, AT_HWCAP2, DEFAULT_AUXV_PATH};
pub use fixed::FixedSource;

use ct_common::CapabilityMask;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Where a capability mask came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskOrigin {
    /// Read from the running kernel.
    Os,
    /// Supplied by the caller instead of the OS.
    Override,
    /// The OS query was not available; the mask is empty.
    Unavailable,
}

impl std::fmt::Display for MaskOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MaskOrigin::Os => write!(f, "os"),
            MaskOrigin::Override => write!(f, "override"),
            MaskOrigin::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// A single capability read together with its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskReading {
    pub mask: CapabilityMask,
    pub origin: MaskOrigin,
}

impl MaskReading {
    /// A mask read from the kernel.
    pub fn os(raw: u64) -> Self {
        MaskReading {
            mask: CapabilityMask::from_raw(raw),
            origin: MaskOrigin::Os,
        }
    }

    /// A caller-supplied mask.
    pub fn overridden(mask: CapabilityMask) -> Self {
        MaskReading {
            mask,
            origin: MaskOrigin::Override,
        }
    }

    /// The empty mask, because nothing could be read.
    pub fn unavailable() -> Self {
        MaskReading {
            mask: CapabilityMask::EMPTY,
            origin: MaskOrigin::Unavailable,
        }
    }

    /// Whether the mask reflects a real or injected reading.
    pub fn is_available(&self) -> bool {
        self.origin != MaskOrigin::Unavailable
    }
}

/// Provider of the `AT_HWCAP2` capability word.
///
/// Implementations must be cheap to call repeatedly and must not cache:
/// every `read` observes the source afresh.
pub trait CapabilitySource: Send + Sync {
    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Read the current mask.
    fn read(&self) -> MaskReading;
}

impl<T: CapabilitySource + ?Sized> CapabilitySource for &T {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn read(&self) -> MaskReading {
        (**self).read()
    }
}

impl<T: CapabilitySource + ?Sized> CapabilitySource for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn read(&self) -> MaskReading {
        (**self).read()
    }
}

/// Read the capability mask from `source`, discarding provenance.
///
/// An unavailable source yields [`CapabilityMask::EMPTY`].
pub fn read_capabilities<S: CapabilitySource + ?Sized>(source: &S) -> CapabilityMask {
    let reading = source.read();
    debug!(
        target: "cputier::hwcap",
        source = source.name(),
        origin = %reading.origin,
        hwcap2 = %reading.mask,
        "capability mask read"
    );
    reading.mask
}
