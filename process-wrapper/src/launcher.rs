use std::ffi::OsString;
use std::io;
use std::os::unix::process::CommandExt;
use std::process::Command;

/// Replaces the current process with the target program.
pub trait Launcher {
    /// Exec `command[0]` with the full vector as its argv.
    ///
    /// Returns only if the handoff failed.
    fn exec(&self, command: &[OsString]) -> io::Error;
}

/// `execvp(3)` semantics: a bare program name is resolved through `PATH`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Execvp;

impl Launcher for Execvp {
    fn exec(&self, command: &[OsString]) -> io::Error {
        let Some((program, args)) = command.split_first() else {
            return io::Error::new(io::ErrorKind::InvalidInput, "no program to execute");
        };
        Command::new(program).args(args).exec()
    }
}
