//! TCP transport implementation.
//!
//! Raw TCP socket transport with JSON-RPC messages (line-delimited). One peer
//! is served per process; the listener is dropped once it connects.

use std::future::Future;

use tokio::io::BufReader;
use tokio::net::TcpListener;
use tracing::{info, warn};

use super::channel::MessageChannel;
use super::lifecycle::{LifecycleManager, LifecycleState, SessionEnd};
use super::{TransportError, TransportResult, config::TcpConfig};
use crate::core::McpServer;

/// TCP transport handler.
pub struct TcpTransport {
    config: TcpConfig,
}

impl TcpTransport {
    /// Create a new TCP transport with the given config.
    pub fn new(config: TcpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Bind, wait for one peer, and serve it.
    pub async fn run(
        self,
        server: McpServer,
        shutdown: impl Future<Output = ()>,
    ) -> TransportResult<SessionEnd> {
        let addr = self.address();

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        info!("Ready - listening on {} (JSON-RPC over TCP)", addr);

        let manager = LifecycleManager::new(server.clone());
        tokio::pin!(shutdown);

        let (stream, peer_addr) = loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Termination signal received before a peer connected");
                    manager.lifecycle().advance(LifecycleState::Closed)?;
                    return Ok(SessionEnd::Shutdown);
                }
                accepted = listener.accept() => match accepted {
                    Ok(accepted) => break accepted,
                    Err(e) => {
                        warn!("Failed to accept connection: {}", e);
                        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
                    }
                },
            }
        };
        drop(listener);

        info!("Accepted connection from {}", peer_addr);
        if let Err(e) = stream.set_nodelay(true) {
            warn!("Failed to set TCP_NODELAY for {}: {}", peer_addr, e);
        }

        let (read_half, write_half) = stream.into_split();
        let channel = MessageChannel::with_config(
            BufReader::new(read_half),
            write_half,
            &server.config().channel,
        );

        let end = manager.serve(channel, shutdown).await?;
        info!("Client {} session ended: {:?}", peer_addr, end);
        Ok(end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    fn free_port() -> u16 {
        std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port()
    }

    #[test]
    fn test_address() {
        let transport = TcpTransport::new(TcpConfig {
            port: 4321,
            host: "127.0.0.1".to_string(),
        });
        assert_eq!(transport.address(), "127.0.0.1:4321");
    }

    #[tokio::test]
    async fn test_serves_one_peer_until_it_disconnects() {
        let port = free_port();
        let server = McpServer::with_standard_tools(Config::default()).unwrap();
        let transport = TcpTransport::new(TcpConfig {
            port,
            host: "127.0.0.1".to_string(),
        });
        let session = tokio::spawn(transport.run(server, std::future::pending()));

        let stream = loop {
            match TcpStream::connect(("127.0.0.1", port)).await {
                Ok(stream) => break stream,
                Err(_) => tokio::time::sleep(tokio::time::Duration::from_millis(10)).await,
            }
        };
        let (read_half, mut write_half) = stream.into_split();
        let mut lines = tokio::io::BufReader::new(read_half).lines();

        write_half
            .write_all(b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"tools/call\",\"params\":{\"name\":\"calculate\",\"arguments\":{\"expression\":\"6 * 7\"}}}\n")
            .await
            .unwrap();
        let line = lines.next_line().await.unwrap().unwrap();
        let response: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(response["result"]["content"][0]["text"], "6 * 7 = 42");

        write_half.shutdown().await.unwrap();
        assert_eq!(session.await.unwrap().unwrap(), SessionEnd::PeerClosed);
    }

    #[tokio::test]
    async fn test_shutdown_before_any_peer() {
        let server = McpServer::with_standard_tools(Config::default()).unwrap();
        let transport = TcpTransport::new(TcpConfig {
            port: free_port(),
            host: "127.0.0.1".to_string(),
        });
        let end = transport.run(server, async {}).await.unwrap();
        assert_eq!(end, SessionEnd::Shutdown);
    }
}
