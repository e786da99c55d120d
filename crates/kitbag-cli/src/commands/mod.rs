//! CLI command implementations

pub mod date;
pub mod hash;
pub mod keys;
pub mod s3;

use crate::OutputFormat;
use anyhow::Result;
use kitbag_logger::Logger;
use serde::Serialize;
use std::sync::Arc;

/// Context passed to all commands
pub struct CommandContext {
    pub logger: Arc<Logger>,
    pub output_format: OutputFormat,
    pub verbose: bool,
    pub quiet: bool,
}

impl CommandContext {
    pub fn is_json(&self) -> bool {
        matches!(self.output_format, OutputFormat::Json)
    }

    /// Print info message if not quiet
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("{}", msg);
        }
    }

    /// Print verbose message if verbose mode
    pub fn debug(&self, msg: &str) {
        if self.verbose {
            eprintln!("[DEBUG] {}", msg);
        }
    }

    pub fn print_json<T: Serialize>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}
