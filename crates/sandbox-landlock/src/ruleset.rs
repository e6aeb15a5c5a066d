//! Landlock ruleset construction and enforcement
//!
//! A [`Ruleset`] owns the kernel ruleset descriptor. Rules are added one path
//! at a time and [`Ruleset::commit`] binds the result to the calling process.
//! WARNING: committing is irreversible for the process and all descendants.

use std::fs::OpenOptions;
use std::io;
use std::os::fd::{AsFd, OwnedFd};
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;

use log::debug;
use sandbox_core::{Result, SandboxError};

use crate::access::AccessFs;
use crate::sys::Kernel;

/// A Landlock ruleset under construction.
///
/// Dropping it without calling [`commit`](Ruleset::commit) closes the
/// descriptor and leaves the process unconfined.
#[derive(Debug)]
pub struct Ruleset<'k, K: Kernel + ?Sized> {
    kernel: &'k K,
    fd: OwnedFd,
    rules: usize,
}

impl<'k, K: Kernel + ?Sized> Ruleset<'k, K> {
    /// Create a ruleset handling every access right the kernel supports.
    pub fn create(kernel: &'k K) -> Result<Self> {
        let abi = kernel.abi_version();
        let handled = AccessFs::handled(abi);

        let fd = kernel
            .create_ruleset(handled)
            .map_err(SandboxError::PolicyCreation)?;
        debug!("created landlock ruleset (abi {}, handled {})", abi, handled);

        Ok(Self {
            kernel,
            fd,
            rules: 0,
        })
    }

    /// Grant `access` on `path` and everything beneath it.
    ///
    /// Paths that do not exist are skipped.
    pub fn allow(&mut self, path: impl AsRef<Path>, access: AccessFs) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(
                "skipping access {} to {}: does not exist",
                access,
                path.display()
            );
            return Ok(());
        }

        let rule_error = |source: io::Error| SandboxError::RuleApplication {
            path: path.to_path_buf(),
            access: access.bits(),
            source,
        };

        let parent = open_path(path).map_err(rule_error)?;
        self.kernel
            .add_path_beneath_rule(self.fd.as_fd(), parent.as_fd(), access)
            .map_err(rule_error)?;

        self.rules += 1;
        debug!("allowing access to {}: {}", path.display(), access);
        Ok(())
    }

    /// Number of rules the kernel accepted so far.
    pub fn rule_count(&self) -> usize {
        self.rules
    }

    /// Lock out privilege escalation, then restrict the calling process.
    pub fn commit(self) -> Result<()> {
        self.kernel
            .set_no_new_privs()
            .map_err(SandboxError::PrivilegeLock)?;
        self.kernel
            .restrict_self(self.fd.as_fd())
            .map_err(SandboxError::PolicyApplication)?;

        debug!("landlock ruleset enforced with {} rules", self.rules);
        Ok(())
    }
}

fn open_path(path: &Path) -> io::Result<OwnedFd> {
    let file = OpenOptions::new()
        .read(true)
        .custom_flags(libc::O_PATH | libc::O_CLOEXEC)
        .open(path)?;
    Ok(file.into())
}
