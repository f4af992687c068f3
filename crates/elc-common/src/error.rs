//! Unified error types for the elc workspace.
//!
//! Configuration-time variants (`ConfigParse`, `UndefinedVariable`,
//! `UnknownService`, ...) are raised before any external process runs;
//! `ExternalCommandFailed` carries the exit code of the failing process.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum ElcError {
    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A declaration file is malformed.
    #[error("failed to parse {path}: {message}")]
    ConfigParse {
        /// File that failed to parse.
        path: PathBuf,
        /// Parser diagnostic.
        message: String,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// An interpolation referenced a name with no value and no default.
    #[error("undefined variable: {name}")]
    UndefinedVariable {
        /// The unresolved variable name.
        name: String,
    },

    /// A variable expression is syntactically malformed.
    #[error("invalid expression {expression:?}: {message}")]
    InvalidExpression {
        /// The raw expression text.
        expression: String,
        /// What went wrong.
        message: String,
    },

    /// A service extends a template that is not declared.
    #[error("unknown template: {name}")]
    UnknownTemplate {
        /// Template name referenced by `extends`.
        name: String,
    },

    /// A service or alias name was not found.
    #[error("unknown service: {name}")]
    UnknownService {
        /// Requested service or alias name.
        name: String,
    },

    /// A workspace is not present in the home registry.
    #[error("unknown workspace: {name}")]
    UnknownWorkspace {
        /// Requested workspace name.
        name: String,
    },

    /// The dependency graph contains a cycle under the active mode.
    #[error("dependency cycle detected: {}", .cycle.join(" -> "))]
    DependencyCycle {
        /// Services forming the cycle, first element repeated at the end.
        cycle: Vec<String>,
    },

    /// An external process exited with a non-zero status.
    #[error("command `{command}` failed with exit code {code}")]
    ExternalCommandFailed {
        /// The command line that was executed.
        command: String,
        /// Exit code reported by the process.
        code: i32,
    },
}

impl ElcError {
    /// Exit code the CLI should terminate with for this error.
    ///
    /// External failures propagate the child's code; everything else is `1`.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::ExternalCommandFailed { code, .. } if *code != 0 => *code,
            _ => 1,
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, ElcError>;
