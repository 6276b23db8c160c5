//! Line-editing REPL on top of one interpreter session.

use std::path::Path;

use anyhow::{anyhow, Result};
use rustyline::error::ReadlineError;

use crate::{
    execution::{CodeRunner, RunnerSettings},
    printer::ConsolePrinter,
    utils::{read_source, Language},
};

const HELP: &str = "\
.help          show this help
.exit          leave the session
.reset         restart the interpreter (drops globals)
.load <file>   run a JavaScript file
End a line with \\ to continue the entry on the next line.";

/// What a complete REPL entry asks for.
#[derive(Debug, PartialEq, Eq)]
pub enum Command<'a> {
    Help,
    Exit,
    Reset,
    Load(&'a str),
    Unknown(&'a str),
    Run(&'a str),
}

pub fn parse_command(entry: &str) -> Command<'_> {
    let trimmed = entry.trim();
    if !trimmed.starts_with('.') || trimmed.contains('\n') {
        return Command::Run(entry);
    }
    let (name, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (trimmed, ""),
    };
    match name {
        ".help" => Command::Help,
        ".exit" | ".quit" => Command::Exit,
        ".reset" | ".clear" => Command::Reset,
        ".load" if !arg.is_empty() => Command::Load(arg),
        _ => Command::Unknown(name),
    }
}

/// Add one typed line to a pending entry. Returns true when the entry is complete.
pub fn push_line(pending: &mut String, line: &str) -> bool {
    if !pending.is_empty() {
        pending.push('\n');
    }
    match line.strip_suffix('\\') {
        Some(head) => {
            pending.push_str(head);
            false
        }
        None => {
            pending.push_str(line);
            true
        }
    }
}

pub async fn run(settings: RunnerSettings, printer: &ConsolePrinter, history: &Path) -> Result<()> {
    let runner = CodeRunner::new(settings);
    let mut rl = rustyline::DefaultEditor::new()
        .map_err(|e| anyhow!("Failed to create line editor: {}", e))?;
    if rl.load_history(history).is_err() {
        tracing::debug!(path = %history.display(), "no REPL history loaded");
    }

    eprintln!("codepad {} (type .help for commands)", env!("CARGO_PKG_VERSION"));

    let mut pending = String::new();
    loop {
        let prompt = if pending.is_empty() { "> " } else { "... " };
        match rl.readline(prompt) {
            Ok(line) => {
                if !push_line(&mut pending, &line) {
                    continue;
                }
                let entry = std::mem::take(&mut pending);
                if entry.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(entry.as_str());

                match parse_command(&entry) {
                    Command::Help => eprintln!("{}", HELP),
                    Command::Exit => break,
                    Command::Reset => {
                        runner.reset().await;
                        eprintln!("Interpreter restarted.");
                    }
                    Command::Load(file) => match read_source(file, Language::JavaScript) {
                        Ok(source) => run_entry(&runner, printer, &source).await,
                        Err(e) => eprintln!("{}", e),
                    },
                    Command::Unknown(name) => eprintln!("Unknown command {} (try .help)", name),
                    Command::Run(source) => run_entry(&runner, printer, source).await,
                }
            }
            Err(ReadlineError::Interrupted) => {
                if pending.is_empty() {
                    break;
                }
                pending.clear();
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Error: {}", e);
                break;
            }
        }
    }

    if let Some(parent) = history.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Err(e) = rl.save_history(history) {
        tracing::warn!(error = %e, path = %history.display(), "failed to save REPL history");
    }
    runner.reset().await;
    Ok(())
}

async fn run_entry(runner: &CodeRunner, printer: &ConsolePrinter, source: &str) {
    match runner.run(source).await {
        Ok(result) => {
            if let Err(e) = printer.print(&result) {
                tracing::warn!(error = %e, "failed to print output");
            }
        }
        Err(e) => eprintln!("Error: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command(".help"), Command::Help);
        assert_eq!(parse_command("  .exit "), Command::Exit);
        assert_eq!(parse_command(".reset"), Command::Reset);
        assert_eq!(parse_command(".load  demo.js "), Command::Load("demo.js"));
        assert_eq!(parse_command(".load"), Command::Unknown(".load"));
        assert_eq!(parse_command(".nope"), Command::Unknown(".nope"));
        assert_eq!(parse_command("console.log(1)"), Command::Run("console.log(1)"));
    }

    #[test]
    fn test_multiline_entry_starting_with_dot_is_code() {
        let entry = ".5 + 1;\nconsole.log('x')";
        assert_eq!(parse_command(entry), Command::Run(entry));
    }

    #[test]
    fn test_continuation_lines() {
        let mut pending = String::new();
        assert!(!push_line(&mut pending, "function f() {\\"));
        assert!(!push_line(&mut pending, "  return 1;\\"));
        assert!(push_line(&mut pending, "}"));
        assert_eq!(pending, "function f() {\n  return 1;\n}");
    }
}
