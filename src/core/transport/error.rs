//! Transport error types.
//!
//! These are operator-facing errors: they are logged, never sent to the peer.

use thiserror::Error;

use super::lifecycle::LifecycleState;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Errors that can occur in transport operations.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Failed to bind to address.
    #[error("Failed to bind to {address}: {source}")]
    BindError {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// IO error during transport.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error while writing a frame.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A frame could not be decoded as text.
    #[error("Framing error: {0}")]
    FramingError(String),

    /// A frame was text but not a valid JSON-RPC request.
    #[error("Protocol error: {0}")]
    ProtocolError(String),

    /// A lifecycle transition that would move backwards.
    #[error("Invalid lifecycle transition from {from:?} to {to:?}")]
    LifecycleError {
        from: LifecycleState,
        to: LifecycleState,
    },
}

impl TransportError {
    /// Create a bind error.
    pub fn bind(address: impl Into<String>, source: std::io::Error) -> Self {
        Self::BindError {
            address: address.into(),
            source,
        }
    }

    /// Create a framing error.
    pub fn framing(msg: impl Into<String>) -> Self {
        Self::FramingError(msg.into())
    }

    /// Create a protocol error.
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::ProtocolError(msg.into())
    }

    /// Create a lifecycle error.
    pub fn lifecycle(from: LifecycleState, to: LifecycleState) -> Self {
        Self::LifecycleError { from, to }
    }
}
