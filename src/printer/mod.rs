//! Printers: console output lines and JSON results.

use std::io::{self, Write};

use anyhow::Result;
use owo_colors::OwoColorize;

use crate::execution::{Channel, ExecutionResult, OutputLine};

pub struct ConsolePrinter {
    pub color: bool,
}

impl ConsolePrinter {
    pub fn render(&self, line: &OutputLine) -> String {
        let text = line.to_string();
        if !self.color {
            return text;
        }
        match line.channel {
            Channel::Log => text,
            Channel::Error => format!("{}", text.red()),
            Channel::Warn => format!("{}", text.yellow()),
            Channel::Info => format!("{}", text.cyan()),
        }
    }

    pub fn print(&self, result: &ExecutionResult) -> Result<()> {
        let mut out = io::stdout().lock();
        for line in &result.lines {
            writeln!(out, "{}", self.render(line))?;
        }
        out.flush()?;
        Ok(())
    }
}

pub struct JsonPrinter;

impl JsonPrinter {
    pub fn print(&self, result: &ExecutionResult) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(result)?);
        Ok(())
    }
}
