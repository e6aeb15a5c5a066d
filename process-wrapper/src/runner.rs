use log::{debug, info};
use sandbox_core::{Result, SandboxError};
use sandbox_landlock::{Kernel, Ruleset};
use std::convert::Infallible;

use crate::cli::ParsedArguments;
use crate::launcher::Launcher;
use crate::policy::{self, Baseline};

/// Confine the process per `args` and hand off to the target program.
///
/// On success the process image is replaced, so this only ever returns an
/// error. Without Landlock support the program runs unconfined.
pub fn run<K, L>(
    args: &ParsedArguments,
    baseline: &Baseline,
    kernel: &K,
    launcher: &L,
) -> Result<Infallible>
where
    K: Kernel + ?Sized,
    L: Launcher + ?Sized,
{
    if sandbox_landlock::enabled(kernel) {
        confine(args, baseline, kernel)?;
    } else {
        info!(
            "landlock is not supported by this kernel, running {} unconfined",
            args.command_line()
        );
    }
    Err(handoff(args, launcher))
}

fn confine<K: Kernel + ?Sized>(args: &ParsedArguments, baseline: &Baseline, kernel: &K) -> Result<()> {
    let abi = kernel.abi_version();
    let mut ruleset = Ruleset::create(kernel)?;
    for grant in policy::plan(baseline, args, abi) {
        ruleset.allow(&grant.path, grant.access)?;
    }
    ruleset.commit()
}

fn handoff<L: Launcher + ?Sized>(args: &ParsedArguments, launcher: &L) -> SandboxError {
    let command = args.command_line();
    debug!("executing: {}", command);
    let source = launcher.exec(&args.command);
    SandboxError::Exec { command, source }
}
