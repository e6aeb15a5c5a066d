//! sandbox-landlock: Unprivileged filesystem sandboxing via Landlock LSM (Linux 5.13+)
//!
//! Landlock lets an unprivileged process whitelist path hierarchies for a
//! fixed set of filesystem operations and then irrevocably confine itself.
//!
//! ```ignore
//! use sandbox_landlock::{AccessFs, Ruleset, Syscalls};
//!
//! let kernel = Syscalls;
//! if sandbox_landlock::enabled(&kernel) {
//!     let mut ruleset = Ruleset::create(&kernel)?;
//!     ruleset.allow("/usr", AccessFs::read_only())?;
//!     ruleset.commit()?;
//! }
//! ```

mod abi;
mod access;
mod ruleset;
mod sys;

#[cfg(any(test, feature = "test-util"))]
pub mod fake;

pub use abi::{Abi, enabled};
pub use access::AccessFs;
pub use ruleset::Ruleset;
pub use sys::{Kernel, Syscalls};
