//! One-shot handler: run a program once and print what it logged.

use anyhow::Result;

use crate::{
    execution::{CodeRunner, RunnerSettings},
    printer::{ConsolePrinter, JsonPrinter},
};

/// Returns whether the run succeeded.
pub async fn run(source: &str, settings: RunnerSettings, printer: &ConsolePrinter, json: bool) -> Result<bool> {
    let runner = CodeRunner::new(settings);
    let result = runner.run(source).await?;
    runner.reset().await;
    if let Some(message) = result.failure() {
        tracing::info!(error = message, elapsed_ms = result.elapsed_ms, "run failed");
    }

    if json {
        JsonPrinter.print(&result)?;
    } else {
        printer.print(&result)?;
    }
    Ok(result.success)
}
