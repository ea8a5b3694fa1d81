//! STDIO transport implementation.
//!
//! Standard input/output transport for MCP - the default and recommended mode.
//! Stdout carries protocol frames only; logs go to stderr.

use std::future::Future;

use tokio::io::BufReader;
use tracing::info;

use super::TransportResult;
use super::channel::MessageChannel;
use super::lifecycle::{LifecycleManager, SessionEnd};
use crate::core::McpServer;

/// STDIO transport handler.
pub struct StdioTransport;

impl StdioTransport {
    /// Run the STDIO transport until stdin closes or `shutdown` resolves.
    pub async fn run(
        server: McpServer,
        shutdown: impl Future<Output = ()>,
    ) -> TransportResult<SessionEnd> {
        info!("Ready - communicating via stdin/stdout");

        let channel = MessageChannel::with_config(
            BufReader::new(tokio::io::stdin()),
            tokio::io::stdout(),
            &server.config().channel,
        );

        let end = LifecycleManager::new(server).serve(channel, shutdown).await?;

        info!("STDIO transport finished: {:?}", end);
        Ok(end)
    }
}
