//! Core module containing shared infrastructure components.
//!
//! Configuration, error handling, the JSON-RPC message types, the MCP
//! protocol handler and the transport layer.

pub mod config;
pub mod error;
pub mod protocol;
pub mod server;
pub mod transport;

pub use config::{Config, LoggingConfig};
pub use error::{Error, Result};
pub use server::McpServer;
pub use transport::{SessionEnd, TransportConfig, TransportService, shutdown_signal};
