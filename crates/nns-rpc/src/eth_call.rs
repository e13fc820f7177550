//! `eth_call` against a fixed block tag, returning raw return data.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};

use nns_core::call::decode_hex;
use nns_core::{Address, NnsConfig, NnsError, ResolverCall};

use crate::error::TransportError;
use crate::http::{HttpClientConfig, HttpRpcClient};
use crate::request::JsonRpcRequest;
use crate::transport::RpcTransport;

/// Block tag every read is evaluated against.
pub const BLOCK_TAG: &str = "latest";

/// Read-only contract caller over any [`RpcTransport`].
///
/// Request ids are assigned from a per-client counter starting at 1.
pub struct RpcClient {
    transport: Arc<dyn RpcTransport>,
    next_id: AtomicU64,
    timeout: Option<Duration>,
}

impl RpcClient {
    pub fn new(transport: Arc<dyn RpcTransport>) -> Self {
        Self {
            transport,
            next_id: AtomicU64::new(1),
            timeout: None,
        }
    }

    /// Bound every call, retries included, by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// HTTP client for `config.rpc_url` with the configured retry and timeout.
    ///
    /// Each call is bounded by `call_timeout_ms`, or by the HTTP client's
    /// worst case when that is unset.
    pub fn from_config(config: &NnsConfig) -> Result<Self, NnsError> {
        let http_config = HttpClientConfig::from(config);
        let limit = config
            .call_timeout_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| http_config.call_budget());
        let http = HttpRpcClient::new(config.rpc_url.clone(), http_config)?;
        Ok(Self::new(Arc::new(http)).with_timeout(limit))
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn transport(&self) -> &Arc<dyn RpcTransport> {
        &self.transport
    }

    pub fn url(&self) -> &str {
        self.transport.url()
    }

    /// Execute `data` against `target` and return the decoded return bytes.
    pub async fn call(&self, target: &Address, data: &[u8]) -> Result<Vec<u8>, NnsError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let req = JsonRpcRequest::new(
            id,
            "eth_call",
            vec![
                json!({
                    "to": format!("0x{}", target.to_hex_lower()),
                    "data": format!("0x{}", hex::encode(data)),
                }),
                json!(BLOCK_TAG),
            ],
        );

        let send = self.transport.send(req);
        let resp = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, send).await.map_err(|_| {
                TransportError::Timeout {
                    ms: limit.as_millis() as u64,
                }
            })??,
            None => send.await?,
        };

        let value = resp.into_result().map_err(TransportError::Rpc)?;
        match value {
            Value::String(s) => decode_hex(&s),
            other => Err(NnsError::malformed(format!(
                "eth_call result is not a hex string: {other}"
            ))),
        }
    }

    /// Encode `call` and execute it against `target`.
    pub async fn query(&self, target: &Address, call: ResolverCall) -> Result<Vec<u8>, NnsError> {
        tracing::trace!(
            to = %target,
            signature = call.signature(),
            node = %call.node(),
            "eth_call"
        );
        self.call(target, &call.encode()).await
    }
}
