//! Run JavaScript in a Node.js session and capture what it logs.
//!
//! ```no_run
//! # async fn demo() {
//! use codepad::execution::{CodeRunner, RunnerSettings};
//!
//! let runner = CodeRunner::new(RunnerSettings::default());
//! let lines = runner.execute("console.log('a'); console.warn('b')").await;
//! assert_eq!(lines, vec!["a", "Warning: b"]);
//! # }
//! ```
//!
//! Evaluated code is not sandboxed. It runs with everything the interpreter
//! process can reach and has no time or memory limit unless
//! [`execution::RunnerSettings::timeout`] is set.

pub mod cli;
pub mod config;
pub mod execution;
pub mod handlers;
pub mod observability;
pub mod preview;
pub mod printer;
pub mod process;
pub mod utils;
