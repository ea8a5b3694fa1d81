//! Transport lifecycle management.
//!
//! A session moves strictly forward through
//! `Uninitialized -> Connected -> ShuttingDown -> Closed`; `Connected` may
//! also go straight to `Closed` when the peer hangs up. Exactly one message is
//! handled at a time, and the shutdown signal is only observed between
//! messages.

use std::future::Future;

use tokio::io::{AsyncBufRead, AsyncWrite};
use tokio::sync::watch;
use tracing::{error, info, warn};

use super::channel::{ChannelEvent, MessageChannel};
use super::{TransportError, TransportResult};
use crate::core::McpServer;
use crate::core::protocol::JsonRpcRequest;

/// Lifecycle states of a transport session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LifecycleState {
    Uninitialized,
    Connected,
    ShuttingDown,
    Closed,
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The peer closed the channel.
    PeerClosed,
    /// A termination signal was received.
    Shutdown,
}

/// Forward-only state holder, observable through a watch channel.
#[derive(Debug)]
pub struct Lifecycle {
    state: watch::Sender<LifecycleState>,
}

impl Lifecycle {
    /// Start in `Uninitialized`.
    pub fn new() -> Self {
        let (state, _) = watch::channel(LifecycleState::Uninitialized);
        Self { state }
    }

    /// Current state.
    pub fn state(&self) -> LifecycleState {
        *self.state.borrow()
    }

    /// Observe state changes.
    pub fn subscribe(&self) -> watch::Receiver<LifecycleState> {
        self.state.subscribe()
    }

    /// Move to `next`, which must be later than the current state.
    pub fn advance(&self, next: LifecycleState) -> TransportResult<()> {
        let current = self.state();
        if next <= current {
            return Err(TransportError::lifecycle(current, next));
        }
        self.state.send_replace(next);
        info!("Transport state: {:?} -> {:?}", current, next);
        Ok(())
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

/// Owns one session between the server and its single peer.
pub struct LifecycleManager {
    server: McpServer,
    lifecycle: Lifecycle,
}

impl LifecycleManager {
    /// Create a manager in the `Uninitialized` state.
    pub fn new(server: McpServer) -> Self {
        Self {
            server,
            lifecycle: Lifecycle::new(),
        }
    }

    /// The session's lifecycle.
    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    /// Connect to `channel` and serve it until the peer leaves or `shutdown`
    /// resolves.
    pub async fn serve<R, W, F>(
        &self,
        mut channel: MessageChannel<R, W>,
        shutdown: F,
    ) -> TransportResult<SessionEnd>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
        F: Future<Output = ()>,
    {
        self.lifecycle.advance(LifecycleState::Connected)?;
        tokio::pin!(shutdown);

        loop {
            let event = tokio::select! {
                biased;
                _ = &mut shutdown => break,
                event = channel.next_event() => event,
            };

            match event {
                ChannelEvent::Message(frame) => self.on_message(&mut channel, &frame).await,
                ChannelEvent::Fault(e) => self.on_error(&e),
                ChannelEvent::Closed => {
                    info!("Peer closed the channel");
                    self.lifecycle.advance(LifecycleState::Closed)?;
                    return Ok(SessionEnd::PeerClosed);
                }
            }
        }

        info!("Termination signal received, closing channel");
        self.lifecycle.advance(LifecycleState::ShuttingDown)?;
        if let Err(e) = channel.close().await {
            self.on_error(&e);
        }
        self.lifecycle.advance(LifecycleState::Closed)?;
        Ok(SessionEnd::Shutdown)
    }

    async fn on_message<R, W>(&self, channel: &mut MessageChannel<R, W>, frame: &str)
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let request: JsonRpcRequest = match serde_json::from_str(frame) {
            Ok(request) => request,
            Err(e) => {
                self.on_error(&TransportError::protocol(format!(
                    "discarding frame that is not a JSON-RPC request: {}",
                    e
                )));
                return;
            }
        };

        if let Some(response) = self.server.handle_request(request).await {
            if let Err(e) = channel.send(&response).await {
                self.on_error(&e);
            }
        }
    }

    fn on_error(&self, error: &TransportError) {
        match error {
            TransportError::IoError(_) | TransportError::JsonError(_) => {
                error!("[MCP Error] {}", error)
            }
            _ => warn!("[MCP Error] {}", error),
        }
    }
}

/// Resolve on Ctrl-C, or SIGTERM on Unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl-C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
