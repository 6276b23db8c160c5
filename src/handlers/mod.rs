//! CLI entry points.

pub mod preview;
pub mod repl;
pub mod run;
