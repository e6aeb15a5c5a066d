//! sandbox-core: shared error types for the landlock process wrapper
//!
//! Every crate in the workspace reports failures through [`SandboxError`],
//! covering command-line parsing, ruleset construction, self-restriction and
//! the final exec handoff.

pub mod error;

pub use error::{Result, SandboxError};
