//! Tracing initialization.
//!
//! Logs go to stderr; stdout only carries program output.

use tracing_subscriber::{prelude::*, EnvFilter};

use crate::config::Config;

/// Filter directive for a `-v` count, falling back to `CODEPAD_LOG_LEVEL`.
pub fn level_for(cfg: &Config, verbose: u8) -> String {
    match verbose {
        0 => cfg
            .get("CODEPAD_LOG_LEVEL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "codepad=warn".to_string()),
        1 => "codepad=info".to_string(),
        2 => "codepad=debug".to_string(),
        _ => "codepad=trace".to_string(),
    }
}

/// Initialize tracing. Call once at process startup; `RUST_LOG` wins.
pub fn init_tracing(cfg: &Config, verbose: u8) {
    let level = level_for(cfg, verbose);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));

    let _ = if cfg.get_bool("CODEPAD_LOG_JSON") {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .try_init()
    };
}
