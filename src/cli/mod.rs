//! CLI module for formbind
//!
//! Provides command-line interface for:
//! - serve: Run the demo HTTP server
//! - describe: Print the demo records' field descriptors

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{describe, load_config, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
