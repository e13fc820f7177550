//! Transport-level error types.

use nns_core::NnsError;
use thiserror::Error;

use crate::request::JsonRpcError;

/// Errors that can occur while sending a JSON-RPC request.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed (connection refused, non-2xx, body unreadable).
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON-RPC protocol-level error returned by the node.
    #[error("RPC error {}: {}", .0.code, .0.message)]
    Rpc(JsonRpcError),

    /// Request timed out after the configured duration.
    #[error("Request timed out after {ms}ms")]
    Timeout { ms: u64 },

    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Returns `true` if this error is retryable (transient).
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Timeout { .. })
    }
}

impl From<TransportError> for NnsError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Rpc(e) => NnsError::Remote {
                code: e.code,
                message: e.message,
            },
            other => NnsError::Transport(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rpc_maps_to_remote() {
        let err: NnsError = TransportError::Rpc(JsonRpcError {
            code: 3,
            message: "execution reverted".into(),
            data: None,
        })
        .into();
        assert_eq!(
            err,
            NnsError::Remote {
                code: 3,
                message: "execution reverted".into()
            }
        );
    }

    #[test]
    fn timeout_maps_to_transport() {
        let err: NnsError = TransportError::Timeout { ms: 500 }.into();
        assert!(matches!(err, NnsError::Transport(ref m) if m.contains("500ms")));
        assert!(err.is_transient());
    }

    #[test]
    fn retryable_classification() {
        assert!(TransportError::Http("refused".into()).is_retryable());
        assert!(TransportError::Timeout { ms: 1 }.is_retryable());
        assert!(!TransportError::Other("x".into()).is_retryable());
    }
}
