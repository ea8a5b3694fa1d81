//! Transport layer for the MCP server.
//!
//! This module provides different transport implementations:
//! - **STDIO**: Standard input/output (default for MCP) - feature: `stdio`
//! - **TCP**: Raw TCP socket, single peer - feature: `tcp`
//!
//! Both carry newline-delimited JSON-RPC frames over a [`MessageChannel`]
//! and hand the session to a [`LifecycleManager`], which owns the
//! connect / serve / shut down sequence.
//!
//! # Feature Flags
//!
//! - `stdio` (default): STDIO transport - minimal dependencies
//! - `tcp`: TCP transport - adds tokio/net

mod channel;
mod config;
mod error;
mod lifecycle;
mod service;

#[cfg(feature = "tcp")]
pub mod tcp;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use channel::{ChannelEvent, MessageChannel};
pub use config::{ChannelConfig, TransportConfig};
pub use error::{TransportError, TransportResult};
pub use lifecycle::{Lifecycle, LifecycleManager, LifecycleState, SessionEnd, shutdown_signal};
pub use service::TransportService;

#[cfg(feature = "tcp")]
pub use config::TcpConfig;
