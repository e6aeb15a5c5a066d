//! Error types for sandbox operations

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for sandbox operations
pub type Result<T> = std::result::Result<T, SandboxError>;

/// Errors that can occur while parsing the command line, building the
/// Landlock policy, or handing off to the target program.
#[derive(Error, Debug)]
pub enum SandboxError {
    #[error("invalid argument: \"{0}\"")]
    InvalidArgument(String),

    #[error("missing value for: \"{0}\"")]
    MissingValue(String),

    #[error("invalid arguments, there must be a -- between sandbox args and the actual program")]
    MissingSeparator,

    #[error("failed to create landlock ruleset: {0}")]
    PolicyCreation(#[source] io::Error),

    #[error("failed to update ruleset: path={}, access={access:#x}: {source}", .path.display())]
    RuleApplication {
        path: PathBuf,
        access: u64,
        #[source]
        source: io::Error,
    },

    #[error("failed to restrict process to new privileges: {0}")]
    PrivilegeLock(#[source] io::Error),

    #[error("failed to apply ruleset: {0}")]
    PolicyApplication(#[source] io::Error),

    #[error("failed to exec \"{command}\": {source}")]
    Exec {
        command: String,
        #[source]
        source: io::Error,
    },
}

impl SandboxError {
    /// Process exit code reported when this error ends the wrapper.
    pub fn exit_code(&self) -> i32 {
        1
    }

    /// True for errors caused by user input on the command line.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            SandboxError::InvalidArgument(_)
                | SandboxError::MissingValue(_)
                | SandboxError::MissingSeparator
        )
    }

    /// Underlying errno for errors that came back from the kernel.
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            SandboxError::PolicyCreation(e)
            | SandboxError::PrivilegeLock(e)
            | SandboxError::PolicyApplication(e)
            | SandboxError::RuleApplication { source: e, .. }
            | SandboxError::Exec { source: e, .. } => e.raw_os_error(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EACCES: i32 = 13;

    #[test]
    fn test_error_display() {
        let err = SandboxError::MissingSeparator;
        assert!(err.to_string().contains("there must be a --"));
    }

    #[test]
    fn test_invalid_argument_names_token() {
        let err = SandboxError::InvalidArgument("--ro_files".to_string());
        assert_eq!(err.to_string(), "invalid argument: \"--ro_files\"");
    }

    #[test]
    fn test_rule_error_carries_path_and_mask() {
        let err = SandboxError::RuleApplication {
            path: PathBuf::from("/srv/data"),
            access: 0b101,
            source: io::Error::from_raw_os_error(EACCES),
        };
        let msg = err.to_string();
        assert!(msg.contains("path=/srv/data"));
        assert!(msg.contains("access=0x5"));
        assert_eq!(err.raw_os_error(), Some(EACCES));
    }

    #[test]
    fn test_usage_classification() {
        assert!(SandboxError::MissingValue("--rw_dirs".into()).is_usage());
        assert!(!SandboxError::PolicyApplication(io::Error::other("x")).is_usage());
    }

    #[test]
    fn test_every_error_exits_with_one() {
        let errors = [
            SandboxError::MissingSeparator,
            SandboxError::PrivilegeLock(io::Error::from_raw_os_error(1)),
            SandboxError::Exec {
                command: "nope".into(),
                source: io::Error::from(io::ErrorKind::NotFound),
            },
        ];
        for err in errors {
            assert_eq!(err.exit_code(), 1);
        }
    }

    #[test]
    fn test_parse_errors_have_no_errno() {
        assert_eq!(SandboxError::MissingSeparator.raw_os_error(), None);
    }
}
