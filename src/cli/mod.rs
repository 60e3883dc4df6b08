//! CLI module for the pillar CI tools.
//!
//! This module provides the command-line interface used by CI workflows.

mod commands;
mod output;

pub use commands::{Cli, Commands, OutputFormat, ReportArgs};
pub use output::OutputFormatter;
