use std::io::{self, Read};
use std::process::ExitCode;

use anyhow::{Context, Result};
use codepad::{
    cli,
    config::Config,
    execution::RunnerSettings,
    handlers, observability,
    printer::ConsolePrinter,
    utils::{read_source, Language},
};
use is_terminal::IsTerminal;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = cli::Cli::parse();

    // Load config
    let cfg = Config::load();
    observability::init_tracing(&cfg, args.verbose);
    tracing::debug!(path = %cfg.config_path.display(), "config loaded");

    let settings = RunnerSettings::from_config(&cfg).with_cli_overrides(args.node.clone(), args.timeout);
    let color = !args.no_color && cfg.get_bool("CODEPAD_COLOR") && io::stdout().is_terminal();
    let printer = ConsolePrinter { color };

    // Preview never runs code
    if let Some(html) = &args.html {
        handlers::preview::run(&cfg, html, args.css.as_deref(), args.out.as_deref())?;
        return Ok(ExitCode::SUCCESS);
    }

    let stdin_is_tty = io::stdin().is_terminal();
    let source = if let Some(code) = args.eval.clone() {
        code
    } else if let Some(file) = &args.file {
        read_source(file, Language::JavaScript)?
    } else if !args.repl && !stdin_is_tty {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).context("failed to read stdin")?;
        buf
    } else {
        handlers::repl::run(settings, &printer, &cfg.history_path()).await?;
        return Ok(ExitCode::SUCCESS);
    };

    let ok = handlers::run::run(&source, settings, &printer, args.json).await?;
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::from(1) })
}
