//! Landlock ABI version probing
//!
//! The kernel reports the highest Landlock ABI it understands. Each version
//! is a strict superset of the previous one, so feature checks are simple
//! comparisons against the probed value.

use std::fmt;

use crate::sys::Kernel;

/// A Landlock ABI generation as reported by the running kernel.
///
/// `Abi(0)` means Landlock is absent or disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Abi(u32);

impl Abi {
    /// Landlock is not available.
    pub const UNSUPPORTED: Abi = Abi(0);
    /// First ABI (Linux 5.13).
    pub const V1: Abi = Abi(1);
    /// Adds `LANDLOCK_ACCESS_FS_REFER` (Linux 5.19).
    pub const V2: Abi = Abi(2);

    pub const fn new(version: u32) -> Self {
        Abi(version)
    }

    pub const fn version(self) -> u32 {
        self.0
    }

    pub const fn is_supported(self) -> bool {
        self.0 > 0
    }

    /// Whether rules may grant linking or renaming across directories.
    pub const fn supports_refer(self) -> bool {
        self.0 >= Self::V2.0
    }
}

impl fmt::Display for Abi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Check whether Landlock is usable on this kernel.
///
/// Probes every time it is called.
pub fn enabled<K: Kernel + ?Sized>(kernel: &K) -> bool {
    kernel.abi_version().is_supported()
}
