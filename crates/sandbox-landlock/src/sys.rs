//! Kernel boundary for Landlock
//!
//! [`Kernel`] is the narrow set of calls the ruleset needs. [`Syscalls`]
//! issues the real system calls; tests substitute a recording fake.

use std::io;
use std::os::fd::{AsRawFd, BorrowedFd, FromRawFd, OwnedFd, RawFd};

use log::debug;

use crate::abi::Abi;
use crate::access::AccessFs;

// Landlock ABI constants
const LANDLOCK_CREATE_RULESET_VERSION: u32 = 1 << 0;
const LANDLOCK_RULE_PATH_BENEATH: u32 = 1;

// Kernel structures for landlock syscalls
#[repr(C)]
struct LandlockRulesetAttr {
    handled_access_fs: u64,
}

// The kernel declares this struct packed; there is no trailing padding.
#[repr(C, packed)]
struct LandlockPathBeneathAttr {
    allowed_access: u64,
    parent_fd: i32,
}

/// Operations the kernel exposes for building and enforcing a ruleset.
pub trait Kernel {
    /// Highest supported ABI, or [`Abi::UNSUPPORTED`].
    fn abi_version(&self) -> Abi;

    /// `landlock_create_ruleset(2)` with the given handled-access mask.
    fn create_ruleset(&self, handled: AccessFs) -> io::Result<OwnedFd>;

    /// `landlock_add_rule(2)` with a `LANDLOCK_RULE_PATH_BENEATH` body.
    fn add_path_beneath_rule(
        &self,
        ruleset: BorrowedFd<'_>,
        parent: BorrowedFd<'_>,
        allowed: AccessFs,
    ) -> io::Result<()>;

    /// `prctl(PR_SET_NO_NEW_PRIVS, 1)`.
    fn set_no_new_privs(&self) -> io::Result<()>;

    /// `landlock_restrict_self(2)`.
    fn restrict_self(&self, ruleset: BorrowedFd<'_>) -> io::Result<()>;
}

/// The running kernel, reached through raw system calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct Syscalls;

impl Kernel for Syscalls {
    fn abi_version(&self) -> Abi {
        // With the VERSION flag and no attributes the return value is the
        // ABI number, not a file descriptor.
        let ret = unsafe {
            libc::syscall(
                libc::SYS_landlock_create_ruleset,
                std::ptr::null::<libc::c_void>(),
                0usize,
                LANDLOCK_CREATE_RULESET_VERSION,
            )
        };
        if ret < 0 {
            debug!(
                "landlock ABI probe failed: {}",
                io::Error::last_os_error()
            );
            return Abi::UNSUPPORTED;
        }
        Abi::new(u32::try_from(ret).unwrap_or(0))
    }

    fn create_ruleset(&self, handled: AccessFs) -> io::Result<OwnedFd> {
        let attr = LandlockRulesetAttr {
            handled_access_fs: handled.bits(),
        };

        let ret = unsafe {
            libc::syscall(
                libc::SYS_landlock_create_ruleset,
                &attr as *const LandlockRulesetAttr,
                std::mem::size_of::<LandlockRulesetAttr>(),
                0u32,
            )
        };
        if ret < 0 {
            return Err(io::Error::last_os_error());
        }

        // SAFETY: on success the kernel returns a fresh descriptor we now own.
        Ok(unsafe { OwnedFd::from_raw_fd(ret as RawFd) })
    }

    fn add_path_beneath_rule(
        &self,
        ruleset: BorrowedFd<'_>,
        parent: BorrowedFd<'_>,
        allowed: AccessFs,
    ) -> io::Result<()> {
        let attr = LandlockPathBeneathAttr {
            allowed_access: allowed.bits(),
            parent_fd: parent.as_raw_fd(),
        };

        let ret = unsafe {
            libc::syscall(
                libc::SYS_landlock_add_rule,
                ruleset.as_raw_fd(),
                LANDLOCK_RULE_PATH_BENEATH,
                &attr as *const LandlockPathBeneathAttr,
                0u32,
            )
        };
        if ret < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    fn set_no_new_privs(&self) -> io::Result<()> {
        nix::sys::prctl::set_no_new_privs().map_err(io::Error::from)
    }

    fn restrict_self(&self, ruleset: BorrowedFd<'_>) -> io::Result<()> {
        let ret = unsafe {
            libc::syscall(libc::SYS_landlock_restrict_self, ruleset.as_raw_fd(), 0u32)
        };
        if ret < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_beneath_attr_is_packed() {
        assert_eq!(std::mem::size_of::<LandlockPathBeneathAttr>(), 12);
        assert_eq!(std::mem::size_of::<LandlockRulesetAttr>(), 8);
    }

    #[test]
    fn abi_probe_does_not_panic() {
        let _ = Syscalls.abi_version();
    }

    #[test]
    fn ruleset_creation_matches_probe() {
        let abi = Syscalls.abi_version();
        let created = Syscalls.create_ruleset(AccessFs::handled(abi));
        if abi.is_supported() {
            assert!(created.is_ok(), "create failed: {:?}", created.err());
        } else {
            assert!(created.is_err());
        }
    }
}
