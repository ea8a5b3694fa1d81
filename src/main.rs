//! MCP Server Entry Point
//!
//! Initializes logging, loads configuration, and serves one session over the
//! configured transport until the peer leaves or a termination signal arrives.

use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use sample_tools_mcp_server::core::{
    Config, LoggingConfig, McpServer, SessionEnd, TransportService, shutdown_signal,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from environment
    let config = Config::from_env();

    // Initialize logging
    init_logging(&config.logging);

    config.validate()?;

    info!("Starting {} v{}", config.server.name, config.server.version);

    // Create the MCP server
    let server = McpServer::with_standard_tools(config.clone())?;

    info!("Server initialized with {} tools", server.list_tools().len());

    // Create and run the transport service
    let transport = TransportService::new(config.transport);
    let end = transport.run(server, shutdown_signal()).await?;

    info!("Server shutting down");

    if end == SessionEnd::Shutdown {
        // A blocked stdin read would otherwise keep the runtime alive.
        std::process::exit(0);
    }

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Logs go to stderr; stdout is reserved for protocol frames.
fn init_logging(logging: &LoggingConfig) {
    let level = match logging.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);

    if logging.with_timestamps {
        builder.init();
    } else {
        builder.without_time().init();
    }
}
