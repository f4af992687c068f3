//! The external-system collaborator.
//!
//! Filesystem access, process execution, and console output are funnelled
//! through the [`System`] trait. Production code uses [`HostSystem`]; tests
//! substitute a recording implementation.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use elc_common::error::{ElcError, Result};
use elc_compose::vars::VarMap;

/// Output of a process run with captured stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedOutput {
    /// Exit code returned by the process.
    pub code: i32,
    /// Standard output, decoded lossily.
    pub stdout: String,
}

/// Platform seam for everything elc does outside of pure resolution.
///
/// A single instance is threaded through one invocation; implementations
/// need not be shareable across threads.
pub trait System {
    /// Reads a whole file.
    ///
    /// # Errors
    ///
    /// Returns [`ElcError::Io`] if the file cannot be read.
    fn read_file(&self, path: &Path) -> Result<Vec<u8>>;

    /// Replaces the contents of a file.
    ///
    /// # Errors
    ///
    /// Returns [`ElcError::Io`] if the file cannot be written.
    fn write_file(&self, path: &Path, contents: &[u8]) -> Result<()>;

    /// Returns `true` if `path` exists.
    fn file_exists(&self, path: &Path) -> bool;

    /// The process working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ElcError::Io`] if the directory cannot be determined.
    fn current_dir(&self) -> Result<PathBuf>;

    /// The user's home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory is known.
    fn home_dir(&self) -> Result<PathBuf>;

    /// Runs `argv` with `env` added to the environment, capturing stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned. A non-zero exit is
    /// reported through [`CapturedOutput::code`], not as an error.
    fn run_captured(&self, argv: &[String], env: &VarMap) -> Result<CapturedOutput>;

    /// Runs `argv` attached to the caller's standard streams.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned.
    fn run_interactive(&self, argv: &[String], env: &VarMap) -> Result<i32>;

    /// Returns `true` if standard output is attached to a terminal.
    fn is_terminal(&self) -> bool;

    /// Writes one line to standard output.
    fn println(&self, line: &str);
}

/// [`System`] backed by the real host.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostSystem;

impl HostSystem {
    /// Creates the host collaborator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn command(argv: &[String], env: &VarMap) -> Result<Command> {
        let (program, args) = argv.split_first().ok_or_else(|| ElcError::Config {
            message: "cannot run an empty command".into(),
        })?;
        let mut cmd = Command::new(program);
        let _ = cmd.args(args).envs(env.iter());
        Ok(cmd)
    }
}

fn spawn_error(argv: &[String], source: std::io::Error) -> ElcError {
    ElcError::Io {
        path: PathBuf::from(argv.first().map_or("", String::as_str)),
        source,
    }
}

impl System for HostSystem {
    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        std::fs::read(path).map_err(|source| ElcError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> Result<()> {
        std::fs::write(path, contents).map_err(|source| ElcError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    fn file_exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn current_dir(&self) -> Result<PathBuf> {
        std::env::current_dir().map_err(|source| ElcError::Io {
            path: PathBuf::from("."),
            source,
        })
    }

    fn home_dir(&self) -> Result<PathBuf> {
        dirs::home_dir().ok_or_else(|| ElcError::Config {
            message: "cannot determine the home directory".into(),
        })
    }

    fn run_captured(&self, argv: &[String], env: &VarMap) -> Result<CapturedOutput> {
        tracing::debug!(cmd = ?argv, "running captured");
        let output = Self::command(argv, env)?
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| spawn_error(argv, e))?;
        Ok(CapturedOutput {
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }

    fn run_interactive(&self, argv: &[String], env: &VarMap) -> Result<i32> {
        tracing::debug!(cmd = ?argv, "running interactive");
        let status = Self::command(argv, env)?
            .status()
            .map_err(|e| spawn_error(argv, e))?;
        Ok(status.code().unwrap_or(-1))
    }

    fn is_terminal(&self) -> bool {
        std::io::stdout().is_terminal()
    }

    #[allow(clippy::print_stdout)]
    fn println(&self, line: &str) {
        println!("{line}");
    }
}
