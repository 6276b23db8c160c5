//! Execution engine: output model, runner facade and error types.
//!
//! Source text is evaluated by a long-lived interpreter process (see
//! [`crate::process`]). The code runs with the full privilege of that
//! process: filesystem, network and `require` are all reachable. Only feed
//! it trusted input.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::config::Config;

pub mod protocol;
pub mod session;

use session::Session;

/// Console channel a line was captured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Log,
    Error,
    Warn,
    Info,
}

impl Channel {
    /// Label prepended to the captured text when rendered.
    pub fn label(self) -> &'static str {
        match self {
            Channel::Log => "",
            Channel::Error => "Error: ",
            Channel::Warn => "Warning: ",
            Channel::Info => "Info: ",
        }
    }
}

/// One captured console call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputLine {
    pub channel: Channel,
    pub text: String,
}

impl OutputLine {
    pub fn new(channel: Channel, text: impl Into<String>) -> Self {
        Self { channel, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(Channel::Error, text)
    }
}

impl fmt::Display for OutputLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.channel.label(), self.text)
    }
}

/// Everything one run produced, in emission order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExecutionResult {
    /// False when the program threw, timed out or took the interpreter down.
    pub success: bool,
    pub lines: Vec<OutputLine>,
    pub elapsed_ms: u64,
}

impl ExecutionResult {
    /// Message of the failure that ended the run, if any.
    ///
    /// A failed run always ends with the error line it was given, so this is
    /// the text of the last line.
    pub fn failure(&self) -> Option<&str> {
        if self.success {
            return None;
        }
        self.lines.last().map(|l| l.text.as_str())
    }

    pub fn into_strings(self) -> Vec<String> {
        self.lines.into_iter().map(|l| l.to_string()).collect()
    }
}

/// Host-side failures. Errors raised by the evaluated program are never
/// reported through this type; they end up in [`ExecutionResult::lines`].
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("interpreter `{program}` not found: {source}")]
    InterpreterNotFound {
        program: String,
        #[source]
        source: which::Error,
    },
    #[error("failed to start interpreter: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("interpreter handshake failed: {0}")]
    Handshake(String),
    #[error("interpreter I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),
}

/// How the interpreter is started and how long a run may take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerSettings {
    /// Program name looked up on `PATH`, or a path to it.
    pub program: String,
    /// `None` lets a run take as long as it wants.
    pub timeout: Option<Duration>,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self { program: "node".to_string(), timeout: None }
    }
}

impl RunnerSettings {
    pub fn from_config(cfg: &Config) -> Self {
        let program = cfg
            .get("CODEPAD_NODE")
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| "node".to_string());
        let timeout = cfg
            .get("CODEPAD_TIMEOUT")
            .and_then(|v| v.trim().parse::<f64>().ok())
            .and_then(seconds_to_timeout);
        Self { program, timeout }
    }

    /// CLI flags win over config. A timeout of `0` disables it.
    pub fn with_cli_overrides(mut self, program: Option<String>, timeout_secs: Option<f64>) -> Self {
        if let Some(program) = program {
            self.program = program;
        }
        if let Some(secs) = timeout_secs {
            self.timeout = seconds_to_timeout(secs);
        }
        self
    }
}

fn seconds_to_timeout(secs: f64) -> Option<Duration> {
    if secs.is_finite() && secs > 0.0 {
        Some(Duration::from_secs_f64(secs))
    } else {
        None
    }
}

/// Entry point for running source text.
///
/// Calls are serialized: while one run is in flight, others wait their
/// turn in arrival order.
pub struct CodeRunner {
    session: Mutex<Session>,
}

impl CodeRunner {
    pub fn new(settings: RunnerSettings) -> Self {
        Self { session: Mutex::new(Session::new(settings)) }
    }

    /// Run `source` and return the rendered output lines.
    ///
    /// Never fails: host-side problems come back as a single `Error:` line.
    pub async fn execute(&self, source: &str) -> Vec<String> {
        match self.run(source).await {
            Ok(result) => result.into_strings(),
            Err(err) => {
                tracing::warn!(error = %err, "run could not start");
                vec![OutputLine::error(err.to_string()).to_string()]
            }
        }
    }

    pub async fn run(&self, source: &str) -> Result<ExecutionResult, RunnerError> {
        self.session.lock().await.run(source).await
    }

    /// Stop the interpreter. Globals defined so far are dropped with it.
    pub async fn reset(&self) {
        self.session.lock().await.shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_per_channel() {
        assert_eq!(OutputLine::new(Channel::Log, "plain").to_string(), "plain");
        assert_eq!(OutputLine::new(Channel::Error, "bad").to_string(), "Error: bad");
        assert_eq!(OutputLine::new(Channel::Warn, "careful").to_string(), "Warning: careful");
        assert_eq!(OutputLine::new(Channel::Info, "fyi").to_string(), "Info: fyi");
    }

    #[test]
    fn test_failure_is_last_line_of_failed_run() {
        let result = ExecutionResult {
            success: false,
            lines: vec![
                OutputLine::new(Channel::Log, "before"),
                OutputLine::error("boom"),
            ],
            elapsed_ms: 3,
        };
        assert_eq!(result.failure(), Some("boom"));
        assert_eq!(result.into_strings(), vec!["before", "Error: boom"]);
    }

    #[test]
    fn test_console_error_does_not_mark_failure() {
        let result = ExecutionResult {
            success: true,
            lines: vec![OutputLine::error("logged, not thrown")],
            elapsed_ms: 0,
        };
        assert_eq!(result.failure(), None);
    }

    #[test]
    fn test_cli_timeout_zero_disables() {
        let settings = RunnerSettings {
            program: "node".into(),
            timeout: Some(Duration::from_secs(5)),
        }
        .with_cli_overrides(Some("/opt/node/bin/node".into()), Some(0.0));
        assert_eq!(settings.program, "/opt/node/bin/node");
        assert_eq!(settings.timeout, None);
    }

    #[test]
    fn test_cli_timeout_fractional_seconds() {
        let settings = RunnerSettings::default().with_cli_overrides(None, Some(1.5));
        assert_eq!(settings.program, "node");
        assert_eq!(settings.timeout, Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_channel_wire_names() {
        let channel: Channel = serde_json::from_str("\"warn\"").unwrap();
        assert_eq!(channel, Channel::Warn);
        assert_eq!(serde_json::to_string(&Channel::Info).unwrap(), "\"info\"");
    }
}
