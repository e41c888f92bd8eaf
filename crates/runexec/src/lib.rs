//! External process execution for the studio's Build and Run actions.
//!
//! [`ProcessSupervisor`] owns at most one job per [`JobSlot`] and streams the
//! job's merged output back to the UI thread without blocking it, while
//! [`RunExecutor`] runs a command to completion for headless flows. Both take a
//! serialisable [`JobSpec`]; [`CompileRequest`] and [`RunRequest`] build the
//! specs for the compiler and the produced binary.

mod executor;
mod stream;
mod supervisor;
mod toolchain;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use executor::RunExecutor;
pub use supervisor::{JobOutcome, JobSink, JobSlot, JobState, ProcessSupervisor, Waker};
pub use toolchain::{
    detect_compilers, CompileRequest, RunRequest, DEFAULT_COMPILER, KNOWN_COMPILERS,
    MARKER_HEADER, MARKER_LINK_FLAGS,
};

/// Errors that may surface while preparing or executing a command.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("'{program}' was not found on the search path")]
    ToolMissing { program: String },
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to start output reader: {0}")]
    Reader(std::io::Error),
    #[error("failed to poll process status: {0}")]
    Poll(std::io::Error),
}

/// Serializable command specification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSpec {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

impl JobSpec {
    /// Creates a new command pointing at the given program.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            env: BTreeMap::new(),
        }
    }

    /// Adds multiple arguments at once.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Registers an environment variable override.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Sets the working directory.
    pub fn with_working_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(path.into());
        self
    }

    /// Command line as shown in the terminal pane.
    pub fn display_command(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Locates the program on `PATH`, or relative to the working directory when
    /// it contains a path separator.
    pub fn resolve_program(&self) -> Result<PathBuf, RunError> {
        let cwd = match &self.working_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        };
        which::which_in(&self.program, std::env::var_os("PATH"), Path::new(&cwd)).map_err(|err| {
            tracing::debug!(program = %self.program, error = %err, "program lookup failed");
            RunError::ToolMissing {
                program: self.program.clone(),
            }
        })
    }

    pub(crate) fn command(&self, resolved: &Path) -> std::process::Command {
        let mut command = std::process::Command::new(resolved);
        command.args(&self.args);
        for (key, value) in &self.env {
            command.env(key, value);
        }
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }
        command
    }
}
