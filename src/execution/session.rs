//! A live interpreter process and the runs sent to it.

use std::time::{Duration, Instant};

use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines},
    process::{Child, ChildStdin, ChildStdout},
    task::JoinHandle,
};

use super::{
    protocol::{parse_event, Event, Request},
    ExecutionResult, OutputLine, RunnerError, RunnerSettings,
};
use crate::process::{node, resolve_program};

/// How long a fresh interpreter gets to announce itself.
pub const STARTUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Running interpreter. Dropping it kills the child.
struct Interpreter {
    child: Child,
    stdin: ChildStdin,
    events: Lines<BufReader<ChildStdout>>,
    stderr_task: JoinHandle<()>,
}

impl Drop for Interpreter {
    fn drop(&mut self) {
        self.stderr_task.abort();
    }
}

impl Interpreter {
    async fn spawn(settings: &RunnerSettings) -> Result<Self, RunnerError> {
        let program = resolve_program(&settings.program)?;
        let handle = node::start_node(&program, node::BOOTSTRAP)?;

        let mut stderr = BufReader::new(handle.stderr).lines();
        let stderr_task = tokio::spawn(async move {
            while let Ok(Some(line)) = stderr.next_line().await {
                tracing::debug!(target: "codepad::interpreter", "{}", line);
            }
        });

        let mut interpreter = Self {
            child: handle.child,
            stdin: handle.stdin,
            events: BufReader::new(handle.stdout).lines(),
            stderr_task,
        };

        match tokio::time::timeout(STARTUP_TIMEOUT, interpreter.wait_ready()).await {
            Ok(Ok(version)) => {
                tracing::info!(%version, program = %program.display(), "interpreter ready");
                Ok(interpreter)
            }
            Ok(Err(err)) => Err(err),
            Err(_) => Err(RunnerError::Handshake(format!(
                "no ready signal within {:?}",
                STARTUP_TIMEOUT
            ))),
        }
    }

    async fn wait_ready(&mut self) -> Result<String, RunnerError> {
        while let Some(line) = self.events.next_line().await? {
            match parse_event(&line) {
                Ok(Event::Ready { version }) => return Ok(version),
                Ok(other) => tracing::warn!(?other, "event before ready signal"),
                Err(_) => tracing::warn!(%line, "stray interpreter output"),
            }
        }
        Err(RunnerError::Handshake("interpreter exited during startup".into()))
    }

    fn is_alive(&mut self) -> bool {
        match self.child.try_wait() {
            Ok(None) => true,
            Ok(Some(status)) => {
                tracing::warn!(%status, "interpreter exited between runs");
                false
            }
            Err(err) => {
                tracing::warn!(error = %err, "interpreter state unknown");
                false
            }
        }
    }
}

/// How a run ended from the interpreter's point of view.
enum Outcome {
    Done { error: Option<String> },
    Exited,
    /// Output that is not a protocol event; the stream can no longer be trusted.
    Corrupt,
}

/// Holds the interpreter for the span of one run.
///
/// Unless disarmed, dropping the guard discards the interpreter: a run
/// that was cut short may still be executing or may emit output later.
struct InFlight<'a> {
    slot: &'a mut Option<Interpreter>,
    armed: bool,
}

impl<'a> InFlight<'a> {
    fn arm(slot: &'a mut Option<Interpreter>) -> Self {
        Self { slot, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }

    /// Send one request and collect its lines until the matching `done`.
    async fn exchange(
        &mut self,
        id: u64,
        source: &str,
        lines: &mut Vec<OutputLine>,
    ) -> Result<Outcome, RunnerError> {
        let Some(interpreter) = self.slot.as_mut() else {
            return Ok(Outcome::Exited);
        };

        let request = Request { id, code: source }.encode()?;
        if let Err(err) = interpreter.stdin.write_all(request.as_bytes()).await {
            tracing::warn!(error = %err, "failed to send request");
            return Ok(Outcome::Exited);
        }
        if let Err(err) = interpreter.stdin.flush().await {
            tracing::warn!(error = %err, "failed to flush request");
            return Ok(Outcome::Exited);
        }

        while let Some(line) = interpreter.events.next_line().await? {
            match parse_event(&line) {
                Ok(Event::Line { id: got, channel, text }) if got == id => {
                    lines.push(OutputLine { channel, text });
                }
                Ok(Event::Done { id: got, error }) if got == id => {
                    return Ok(Outcome::Done { error });
                }
                Ok(other) => tracing::debug!(?other, run = id, "ignoring event from another run"),
                Err(err) => {
                    tracing::warn!(%line, error = %err, run = id, "unreadable interpreter output");
                    return Ok(Outcome::Corrupt);
                }
            }
        }
        Ok(Outcome::Exited)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed && self.slot.take().is_some() {
            tracing::debug!("interpreter discarded after interrupted run");
        }
    }
}

/// Interpreter session: started lazily, restarted after a disrupted run.
pub struct Session {
    settings: RunnerSettings,
    interpreter: Option<Interpreter>,
    next_id: u64,
}

impl Session {
    pub fn new(settings: RunnerSettings) -> Self {
        Self { settings, interpreter: None, next_id: 1 }
    }

    async fn ensure_started(&mut self) -> Result<(), RunnerError> {
        if let Some(interpreter) = self.interpreter.as_mut() {
            if interpreter.is_alive() {
                return Ok(());
            }
            self.interpreter = None;
        }
        self.interpreter = Some(Interpreter::spawn(&self.settings).await?);
        Ok(())
    }

    pub async fn run(&mut self, source: &str) -> Result<ExecutionResult, RunnerError> {
        self.ensure_started().await?;

        let id = self.next_id;
        self.next_id += 1;
        let started = Instant::now();
        let mut lines = Vec::new();

        tracing::debug!(run = id, bytes = source.len(), "run started");

        let mut flight = InFlight::arm(&mut self.interpreter);
        let limit = self.settings.timeout;
        let exchanged = match limit {
            Some(limit) => tokio::time::timeout(limit, flight.exchange(id, source, &mut lines))
                .await
                .ok(),
            None => Some(flight.exchange(id, source, &mut lines).await),
        };

        let Some(outcome) = exchanged else {
            let limit = limit.unwrap_or_default();
            tracing::warn!(run = id, ?limit, "run timed out; stopping interpreter");
            lines.push(OutputLine::error(format!("execution timed out after {:?}", limit)));
            return Ok(finish(id, false, lines, started));
        };

        match outcome? {
            Outcome::Done { error: None } => {
                flight.disarm();
                Ok(finish(id, true, lines, started))
            }
            Outcome::Done { error: Some(message) } => {
                flight.disarm();
                lines.push(OutputLine::error(message));
                Ok(finish(id, false, lines, started))
            }
            Outcome::Exited => {
                tracing::warn!(run = id, "interpreter exited mid-run");
                lines.push(OutputLine::error("interpreter exited before the run finished"));
                Ok(finish(id, false, lines, started))
            }
            Outcome::Corrupt => {
                lines.push(OutputLine::error("interpreter sent unreadable output; session restarted"));
                Ok(finish(id, false, lines, started))
            }
        }
    }

    /// Close the interpreter's stdin and wait for it to exit.
    pub async fn shutdown(&mut self) {
        let Some(mut interpreter) = self.interpreter.take() else {
            return;
        };
        let _ = interpreter.stdin.shutdown().await;
        match tokio::time::timeout(Duration::from_secs(2), interpreter.child.wait()).await {
            Ok(Ok(status)) => tracing::debug!(%status, "interpreter stopped"),
            _ => {
                let _ = interpreter.child.start_kill();
                tracing::debug!("interpreter killed");
            }
        }
    }
}

fn finish(id: u64, success: bool, lines: Vec<OutputLine>, started: Instant) -> ExecutionResult {
    let elapsed_ms = started.elapsed().as_millis() as u64;
    tracing::debug!(run = id, success, lines = lines.len(), elapsed_ms, "run finished");
    ExecutionResult { success, lines, elapsed_ms }
}
