//! Node.js interpreter bootstrap and I/O glue.

use std::{path::Path, process::Stdio};

use tokio::process::{Child, Command};

use super::ProcessHandle;
use crate::execution::RunnerError;

/// Script evaluated by `node -e`. Speaks the protocol in
/// [`crate::execution::protocol`].
pub const BOOTSTRAP: &str = include_str!("bootstrap.js");

pub fn start_node(program: &Path, bootstrap: &str) -> Result<ProcessHandle, RunnerError> {
    let mut cmd = Command::new(program);
    cmd.arg("-e")
        .arg(bootstrap)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child: Child = cmd.spawn().map_err(RunnerError::Spawn)?;
    let stdin = child
        .stdin
        .take()
        .ok_or_else(|| RunnerError::Handshake("no stdin".into()))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| RunnerError::Handshake("no stdout".into()))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| RunnerError::Handshake("no stderr".into()))?;

    tracing::debug!(program = %program.display(), pid = ?child.id(), "interpreter spawned");

    Ok(ProcessHandle {
        child,
        stdin,
        stdout,
        stderr,
    })
}
