//! CLI argument definitions using clap
//!
//! Commands:
//! - formbind serve [--config <path>] [--port <port>]
//! - formbind describe

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// formbind - declarative request decoding and validation demo
#[derive(Parser, Debug)]
#[command(name = "formbind")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the demo HTTP server
    Serve {
        /// Path to JSON configuration file; defaults apply when omitted
        #[arg(long)]
        config: Option<PathBuf>,

        /// Port override
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print the field descriptors of the demo records as JSON
    Describe,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["formbind", "serve", "--config", "demo.json", "--port", "9000"])
            .unwrap();
        match cli.command {
            Command::Serve { config, port } => {
                assert_eq!(config, Some(PathBuf::from("demo.json")));
                assert_eq!(port, Some(9000));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_describe() {
        let cli = Cli::try_parse_from(["formbind", "describe"]).unwrap();
        assert!(matches!(cli.command, Command::Describe));
    }
}
