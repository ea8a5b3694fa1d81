//! Sample Tools MCP Server Library
//!
//! A Model Context Protocol (MCP) server exposing a small catalog of sample
//! tools (`calculate`, `generate_uuid`, `reverse_string`, `current_time`)
//! over newline-delimited JSON-RPC.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, JSON-RPC types, the protocol
//!   handler and the transport layer (message channel and session lifecycle)
//! - **domains**: business logic organized by bounded contexts
//!   - **tools**: tool registry, dispatcher and tool definitions
//!
//! # Example
//!
//! ```rust,no_run
//! use sample_tools_mcp_server::core::{Config, McpServer, TransportService, shutdown_signal};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::with_standard_tools(config.clone())?;
//!     TransportService::new(config.transport)
//!         .run(server, shutdown_signal())
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
