//! Interpreter process management (startup/IO).

use std::path::PathBuf;

use tokio::process::{Child, ChildStderr, ChildStdin, ChildStdout};

use crate::execution::RunnerError;

pub mod node;

pub struct ProcessHandle {
    pub child: Child,
    pub stdin: ChildStdin,
    pub stdout: ChildStdout,
    pub stderr: ChildStderr,
}

/// Resolve an interpreter name on `PATH`, or check an explicit path.
pub fn resolve_program(program: &str) -> Result<PathBuf, RunnerError> {
    which::which(program).map_err(|source| RunnerError::InterpreterNotFound {
        program: program.to_string(),
        source,
    })
}
