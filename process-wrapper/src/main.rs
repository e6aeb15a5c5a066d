//! Sandbox process wrapper - run a program with Landlock-restricted filesystem access

mod cli;
mod launcher;
mod logging;
mod policy;
mod runner;

use cli::ParsedArguments;
use console::style;
use launcher::Execvp;
use policy::Baseline;
use sandbox_core::SandboxError;
use sandbox_landlock::Syscalls;

fn main() {
    let args = match ParsedArguments::from_args(std::env::args_os()) {
        Ok(args) => args,
        Err(e) => fail(&e),
    };

    logging::init_logger(args.debug);

    let err = match runner::run(&args, &Baseline::system(), &Syscalls, &Execvp) {
        Ok(never) => match never {},
        Err(e) => e,
    };
    fail(&err)
}

fn fail(err: &SandboxError) -> ! {
    eprintln!("{} {}", style("error:").red().bold(), err);
    if err.is_usage() {
        eprintln!(
            "Try {} for more information",
            style("process-wrapper --help").cyan()
        );
    }
    std::process::exit(err.exit_code());
}
