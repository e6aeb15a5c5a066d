use clap::builder::{FalseyValueParser, TypedValueParser};
use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{Arg, Command, Parser};
use sandbox_core::{Result, SandboxError};
use std::ffi::{OsStr, OsString};
use std::os::unix::ffi::OsStrExt;
use std::path::PathBuf;

/// The wrapper's command line once parsed: four path buckets, the debug
/// switch and the target command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArguments {
    pub ro_paths: Vec<PathBuf>,
    pub rw_paths: Vec<PathBuf>,
    pub ro_dirs: Vec<PathBuf>,
    pub rw_dirs: Vec<PathBuf>,
    pub debug: bool,
    pub command: Vec<OsString>,
}

#[derive(Parser, Debug)]
#[command(name = "process-wrapper")]
#[command(about = "A sandbox process wrapper: run a program with filesystem access limited to the given paths", long_about = None)]
#[command(after_help = "NOTE: All path flags refer to a path and *all* paths below it - rules are applied recursively.
Each list can also be supplied through the environment when the flag is absent.

EXAMPLES:
    process-wrapper --ro_dirs a:b:c --rw_paths=/tmp:/usr/tmp -- ./my_program <args>
    LANDLOCK_SANDBOX_RO_PATHS=/etc process-wrapper -- cat /etc/hostname
")]
struct Cli {
    /// A colon delimited list of readonly directories and files
    #[arg(
        long = "ro_paths",
        value_name = "PATHS",
        value_parser = PathListParser,
        allow_hyphen_values = true,
        env = "LANDLOCK_SANDBOX_RO_PATHS"
    )]
    ro_paths: Vec<PathList>,

    /// A colon delimited list of readwrite directories and files
    #[arg(
        long = "rw_paths",
        value_name = "PATHS",
        value_parser = PathListParser,
        allow_hyphen_values = true,
        env = "LANDLOCK_SANDBOX_RW_PATHS"
    )]
    rw_paths: Vec<PathList>,

    /// A colon delimited list of readonly directory trees
    #[arg(
        long = "ro_dirs",
        value_name = "DIRS",
        value_parser = PathListParser,
        allow_hyphen_values = true,
        env = "LANDLOCK_SANDBOX_RO_DIRS"
    )]
    ro_dirs: Vec<PathList>,

    /// A colon delimited list of readwrite directory trees
    #[arg(
        long = "rw_dirs",
        value_name = "DIRS",
        value_parser = PathListParser,
        allow_hyphen_values = true,
        env = "LANDLOCK_SANDBOX_RW_DIRS"
    )]
    rw_dirs: Vec<PathList>,

    /// Log every grant and the final exec to stderr
    #[arg(
        long,
        env = "LANDLOCK_SANDBOX_DEBUG",
        value_parser = FalseyValueParser::new(),
        overrides_with = "debug"
    )]
    debug: bool,

    /// Program to run and its arguments, after a mandatory --
    #[arg(last = true, required = true, value_name = "COMMAND")]
    command: Vec<OsString>,
}

impl From<Cli> for ParsedArguments {
    fn from(cli: Cli) -> Self {
        Self {
            ro_paths: flatten(cli.ro_paths),
            rw_paths: flatten(cli.rw_paths),
            ro_dirs: flatten(cli.ro_dirs),
            rw_dirs: flatten(cli.rw_dirs),
            debug: cli.debug,
            command: cli.command,
        }
    }
}

fn flatten(lists: Vec<PathList>) -> Vec<PathBuf> {
    lists.into_iter().flat_map(|list| list.0).collect()
}

/// The paths named by one flag value.
///
/// Empty segments (`/a::/b`, `/a:`) are kept as empty paths; the ruleset
/// skips them like any other path that does not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PathList(Vec<PathBuf>);

/// Splits a flag value on `:`. Only a wholly empty value is rejected.
#[derive(Debug, Clone, Copy)]
struct PathListParser;

impl TypedValueParser for PathListParser {
    type Value = PathList;

    fn parse_ref(
        &self,
        cmd: &Command,
        arg: Option<&Arg>,
        value: &OsStr,
    ) -> std::result::Result<PathList, clap::Error> {
        if value.is_empty() {
            let mut err = clap::Error::new(ErrorKind::InvalidValue).with_cmd(cmd);
            if let Some(arg) = arg {
                err.insert(ContextKind::InvalidArg, ContextValue::String(arg.to_string()));
            }
            err.insert(ContextKind::InvalidValue, ContextValue::String(String::new()));
            return Err(err);
        }

        let paths = value
            .as_bytes()
            .split(|&byte| byte == b':')
            .map(|segment| PathBuf::from(OsStr::from_bytes(segment)))
            .collect();
        Ok(PathList(paths))
    }
}

impl ParsedArguments {
    /// Parse the full argument vector, program name included.
    ///
    /// `--help` prints usage and exits the process with status 0.
    pub fn from_args<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match Cli::try_parse_from(args) {
            Ok(cli) => Ok(cli.into()),
            Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                err.exit()
            }
            Err(err) => Err(classify(&err)),
        }
    }

    /// The target command as a single printable string.
    pub fn command_line(&self) -> String {
        self.command
            .iter()
            .map(|arg| arg.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn classify(err: &clap::Error) -> SandboxError {
    let offending = err
        .get(ContextKind::InvalidArg)
        .map(ToString::to_string)
        .unwrap_or_else(|| summary(err));

    match err.kind() {
        ErrorKind::MissingRequiredArgument => SandboxError::MissingSeparator,
        ErrorKind::InvalidValue | ErrorKind::NoEquals => SandboxError::MissingValue(offending),
        _ => SandboxError::InvalidArgument(offending),
    }
}

fn summary(err: &clap::Error) -> String {
    let rendered = err.render().to_string();
    rendered
        .lines()
        .next()
        .unwrap_or_default()
        .trim_start_matches("error: ")
        .to_string()
}
