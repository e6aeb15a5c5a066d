//! Recording stand-in for the kernel boundary
//!
//! Used by tests to observe which Landlock calls a policy makes without
//! confining the test process.

use std::cell::RefCell;
use std::fs::File;
use std::io;
use std::os::fd::{AsRawFd, BorrowedFd, OwnedFd};
use std::path::PathBuf;

use crate::abi::Abi;
use crate::access::AccessFs;
use crate::sys::Kernel;

/// One observed call into the kernel boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KernelCall {
    Probe,
    CreateRuleset { handled: AccessFs },
    AddRule { path: PathBuf, access: AccessFs },
    NoNewPrivs,
    RestrictSelf,
}

/// A call that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeStep {
    CreateRuleset,
    AddRule,
    NoNewPrivs,
    RestrictSelf,
}

/// Kernel double reporting a fixed ABI and recording every call.
#[derive(Debug, Default)]
pub struct FakeKernel {
    abi: Abi,
    failure: Option<(FakeStep, i32)>,
    calls: RefCell<Vec<KernelCall>>,
}

impl FakeKernel {
    pub fn new(abi: u32) -> Self {
        Self {
            abi: Abi::new(abi),
            ..Default::default()
        }
    }

    /// A kernel without Landlock.
    pub fn disabled() -> Self {
        Self::new(0)
    }

    /// Make `step` fail with `errno`.
    pub fn failing_at(mut self, step: FakeStep, errno: i32) -> Self {
        self.failure = Some((step, errno));
        self
    }

    pub fn calls(&self) -> Vec<KernelCall> {
        self.calls.borrow().clone()
    }

    /// Every rule passed to the kernel, in order.
    pub fn rules(&self) -> Vec<(PathBuf, AccessFs)> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                KernelCall::AddRule { path, access } => Some((path.clone(), *access)),
                _ => None,
            })
            .collect()
    }

    /// Number of recorded calls matching `pred`.
    pub fn count(&self, pred: impl Fn(&KernelCall) -> bool) -> usize {
        self.calls.borrow().iter().filter(|call| pred(call)).count()
    }

    fn record(&self, call: KernelCall) {
        self.calls.borrow_mut().push(call);
    }

    fn outcome(&self, step: FakeStep) -> io::Result<()> {
        match self.failure {
            Some((failing, errno)) if failing == step => Err(io::Error::from_raw_os_error(errno)),
            _ => Ok(()),
        }
    }
}

impl Kernel for FakeKernel {
    fn abi_version(&self) -> Abi {
        self.record(KernelCall::Probe);
        self.abi
    }

    fn create_ruleset(&self, handled: AccessFs) -> io::Result<OwnedFd> {
        self.record(KernelCall::CreateRuleset { handled });
        self.outcome(FakeStep::CreateRuleset)?;
        Ok(File::open("/dev/null")?.into())
    }

    fn add_path_beneath_rule(
        &self,
        _ruleset: BorrowedFd<'_>,
        parent: BorrowedFd<'_>,
        allowed: AccessFs,
    ) -> io::Result<()> {
        let path = std::fs::read_link(format!("/proc/self/fd/{}", parent.as_raw_fd()))?;
        self.record(KernelCall::AddRule {
            path,
            access: allowed,
        });
        self.outcome(FakeStep::AddRule)
    }

    fn set_no_new_privs(&self) -> io::Result<()> {
        self.record(KernelCall::NoNewPrivs);
        self.outcome(FakeStep::NoNewPrivs)
    }

    fn restrict_self(&self, _ruleset: BorrowedFd<'_>) -> io::Result<()> {
        self.record(KernelCall::RestrictSelf);
        self.outcome(FakeStep::RestrictSelf)
    }
}
