//! CLI command implementations

use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::http_server::{demo_schemas, HttpServer, ServerConfig};

use super::args::Command;
use super::errors::{CliError, CliResult};

/// Load the server configuration from a JSON file
pub fn load_config(path: &Path) -> CliResult<ServerConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

    let config: ServerConfig = serde_json::from_str(&content)
        .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

    if config.host.is_empty() {
        return Err(CliError::config_error("host must not be empty"));
    }

    Ok(config)
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    init_tracing();
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, port } => serve(config.as_deref(), port),
        Command::Describe => describe(&mut std::io::stdout()),
    }
}

/// `RUST_LOG` wins; otherwise info for this crate and HTTP traces
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("formbind=info,tower_http=info"));
    // A subscriber may already be installed when embedded.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Start the demo HTTP server
pub fn serve(config_path: Option<&Path>, port: Option<u16>) -> CliResult<()> {
    let mut config = match config_path {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(port) = port {
        config.port = port;
    }

    // Fail before listening if a demo record is misconfigured
    demo_schemas()?;

    info!(
        addr = %config.socket_addr(),
        multipart_memory = config.bind.multipart_memory,
        spill_dir = %config.bind.spill_dir().display(),
        "starting server"
    );
    let server = HttpServer::with_config(config);

    // Start the async runtime and run the server
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::serve_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::serve_failed(format!("HTTP server failed: {}", e)))
    })?;

    Ok(())
}

/// Write the demo records' field descriptors as pretty JSON
pub fn describe<W: Write>(out: &mut W) -> CliResult<()> {
    let schemas = demo_schemas()?;
    serde_json::to_writer_pretty(&mut *out, &schemas)?;
    writeln!(out)?;
    Ok(())
}
