//! HTTP JSON-RPC client backed by `reqwest`.
//!
//! Each request is a single `POST` with a JSON body. Transient failures
//! (connect errors, non-2xx statuses, timeouts) are retried with exponential
//! backoff; JSON-RPC error objects are returned as-is.

use async_trait::async_trait;
use std::time::Duration;

use nns_core::NnsConfig;

use crate::error::TransportError;
use crate::request::{JsonRpcRequest, JsonRpcResponse};
use crate::retry::{RetryConfig, RetryPolicy};
use crate::transport::RpcTransport;

/// Configuration for `HttpRpcClient`.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub retry: RetryConfig,
    pub request_timeout: Duration,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            retry: RetryConfig::default(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl HttpClientConfig {
    /// Worst-case time for one `send`: every attempt runs to the request
    /// timeout and every backoff is slept in full.
    pub fn call_budget(&self) -> Duration {
        let policy = RetryPolicy::new(self.retry.clone());
        let backoff: Duration = (1..=self.retry.max_retries)
            .filter_map(|attempt| policy.next_delay(attempt))
            .sum();
        self.request_timeout * (self.retry.max_retries + 1) + backoff
    }
}

impl From<&NnsConfig> for HttpClientConfig {
    fn from(config: &NnsConfig) -> Self {
        Self {
            retry: RetryConfig::from(config),
            request_timeout: Duration::from_millis(config.request_timeout_ms),
        }
    }
}

/// HTTP JSON-RPC client with retry on transient errors.
pub struct HttpRpcClient {
    url: String,
    http: reqwest::Client,
    retry: RetryPolicy,
    request_timeout: Duration,
}

impl HttpRpcClient {
    /// Create a new client for the given JSON-RPC endpoint URL.
    pub fn new(url: impl Into<String>, config: HttpClientConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| TransportError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            url: url.into(),
            http,
            retry: RetryPolicy::new(config.retry),
            request_timeout: config.request_timeout,
        })
    }

    async fn send_once(&self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
        let resp = self
            .http
            .post(&self.url)
            .json(req)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout {
                        ms: self.request_timeout.as_millis() as u64,
                    }
                } else {
                    TransportError::Http(e.to_string())
                }
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(TransportError::Http(format!("HTTP {status}: {body}")));
        }

        resp.json::<JsonRpcResponse>()
            .await
            .map_err(|e| TransportError::Http(format!("invalid JSON-RPC envelope: {e}")))
    }
}

#[async_trait]
impl RpcTransport for HttpRpcClient {
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
        let mut attempt = 0u32;
        loop {
            match self.send_once(&req).await {
                Ok(resp) => return Ok(resp),
                Err(e) if e.is_retryable() => {
                    attempt += 1;
                    match self.retry.next_delay(attempt) {
                        Some(delay) => {
                            tracing::warn!(
                                attempt,
                                delay_ms = delay.as_millis() as u64,
                                error = %e,
                                url = %self.url,
                                "retrying request"
                            );
                            tokio::time::sleep(delay).await;
                        }
                        None => {
                            tracing::debug!(attempt, error = %e, url = %self.url, "giving up");
                            return Err(e);
                        }
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn url(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use nns_core::{Address, NnsError};
    use serde_json::Value;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    use crate::eth_call::RpcClient;

    /// One-shot HTTP server answering every request with a fixed reply.
    struct Stub {
        url: String,
        hits: Arc<AtomicUsize>,
        requests: Arc<Mutex<Vec<(String, String)>>>,
    }

    impl Stub {
        fn hits(&self) -> usize {
            self.hits.load(Ordering::SeqCst)
        }
    }

    async fn stub(status: &'static str, body: &'static str) -> Stub {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let hits = Arc::new(AtomicUsize::new(0));
        let requests = Arc::new(Mutex::new(Vec::new()));

        let (h, r) = (hits.clone(), requests.clone());
        tokio::spawn(async move {
            while let Ok((mut sock, _)) = listener.accept().await {
                h.fetch_add(1, Ordering::SeqCst);
                let request = read_request(&mut sock).await;
                r.lock().unwrap().push(request);
                let reply = format!(
                    "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = sock.write_all(reply.as_bytes()).await;
                let _ = sock.shutdown().await;
            }
        });

        Stub { url, hits, requests }
    }

    /// Read one request and return `(head, body)`.
    async fn read_request(sock: &mut TcpStream) -> (String, String) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = sock.read(&mut chunk).await.unwrap_or(0);
            if n == 0 {
                return (String::from_utf8_lossy(&buf).into_owned(), String::new());
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf).into_owned();
            if let Some(end) = text.find("\r\n\r\n") {
                let head = &text[..end];
                let len = head
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, v)| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if text.len() >= end + 4 + len {
                    return (head.to_string(), text[end + 4..end + 4 + len].to_string());
                }
            }
        }
    }

    fn client(url: &str, max_retries: u32) -> HttpRpcClient {
        HttpRpcClient::new(
            url,
            HttpClientConfig {
                retry: RetryConfig {
                    max_retries,
                    initial_backoff: Duration::from_millis(10),
                    ..RetryConfig::default()
                },
                request_timeout: Duration::from_secs(2),
            },
        )
        .unwrap()
    }

    fn target() -> Address {
        Address::new([0x01; 20])
    }

    #[test]
    fn config_from_nns_config() {
        let mut nns = NnsConfig::nexus_testnet();
        nns.max_retries = 4;
        nns.initial_backoff_ms = 50;
        nns.request_timeout_ms = 1_500;
        let cfg = HttpClientConfig::from(&nns);
        assert_eq!(cfg.retry.max_retries, 4);
        assert_eq!(cfg.retry.initial_backoff, Duration::from_millis(50));
        assert_eq!(cfg.request_timeout, Duration::from_millis(1_500));
    }

    #[test]
    fn call_budget_covers_attempts_and_backoff() {
        let mut nns = NnsConfig::nexus_testnet();
        nns.request_timeout_ms = 300;
        nns.max_retries = 2;
        nns.initial_backoff_ms = 200;
        // 3 x 300ms attempts plus 200ms and 400ms waits.
        assert_eq!(
            HttpClientConfig::from(&nns).call_budget(),
            Duration::from_millis(1_500)
        );

        nns.max_retries = 0;
        assert_eq!(
            HttpClientConfig::from(&nns).call_budget(),
            Duration::from_millis(300)
        );
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_transport_error() {
        let client = client("http://127.0.0.1:1", 0);
        let err = client
            .send(JsonRpcRequest::new(1, "eth_chainId", vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Http(_) | TransportError::Timeout { .. }));
        assert_eq!(client.url(), "http://127.0.0.1:1");
    }

    #[tokio::test]
    async fn server_error_is_retried_then_surfaces() {
        let server = stub("500 Internal Server Error", "oops").await;
        let client = client(&server.url, 2);

        let err = client
            .send(JsonRpcRequest::new(1, "eth_call", vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Http(ref m) if m.contains("HTTP 500") && m.contains("oops")));
        assert_eq!(server.hits(), 3);

        let err: NnsError = err.into();
        assert!(matches!(err, NnsError::Transport(_)));
    }

    #[tokio::test]
    async fn rpc_error_object_is_not_retried() {
        let server = stub(
            "200 OK",
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":3,"message":"execution reverted"}}"#,
        )
        .await;
        let rpc = RpcClient::new(Arc::new(client(&server.url, 2)));

        let err = rpc.call(&target(), &[0xab, 0xcd]).await.unwrap_err();
        assert_eq!(
            err,
            NnsError::Remote {
                code: 3,
                message: "execution reverted".into()
            }
        );
        assert_eq!(server.hits(), 1);
    }

    #[tokio::test]
    async fn undecodable_envelope_is_transport_error() {
        let server = stub("200 OK", "not json").await;
        let err = client(&server.url, 0)
            .send(JsonRpcRequest::new(1, "eth_call", vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Http(ref m) if m.contains("invalid JSON-RPC envelope")));
    }

    #[tokio::test]
    async fn eth_call_goes_out_as_json_post() {
        let server = stub("200 OK", r#"{"jsonrpc":"2.0","id":1,"result":"0x"}"#).await;
        let rpc = RpcClient::new(Arc::new(client(&server.url, 0)));

        let out = rpc.call(&target(), &[0xab, 0xcd]).await.unwrap();
        assert!(out.is_empty());

        let requests = server.requests.lock().unwrap().clone();
        assert_eq!(requests.len(), 1);
        let (head, body) = &requests[0];
        assert!(head.starts_with("POST / HTTP/1.1"));
        assert!(head.to_ascii_lowercase().contains("content-type: application/json"));

        let body: Value = serde_json::from_str(body).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "jsonrpc": "2.0",
                "method": "eth_call",
                "params": [
                    {"to": "0x0101010101010101010101010101010101010101", "data": "0xabcd"},
                    "latest"
                ],
                "id": 1
            })
        );
    }
}
