//! The `RpcTransport` trait: the seam between the resolver and the network.

use async_trait::async_trait;

use crate::error::TransportError;
use crate::request::{JsonRpcRequest, JsonRpcResponse};

/// Sends one JSON-RPC request and returns the response envelope.
///
/// Implementations must be `Send + Sync`; the trait is object-safe and is
/// stored as `Arc<dyn RpcTransport>`.
#[async_trait]
pub trait RpcTransport: Send + Sync + 'static {
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError>;

    /// The transport's identifier (URL or name), used in logs.
    fn url(&self) -> &str;
}
