//! nns-rpc: JSON-RPC `eth_call` transport for Nexus Name Service reads.
//!
//! # Overview
//!
//! - [`RpcTransport`]: the async seam every transport implements
//! - [`HttpRpcClient`]: `reqwest` transport with exponential-backoff retry
//! - [`RpcClient`]: builds `eth_call` requests and decodes the hex result
//! - [`JsonRpcRequest`] / [`JsonRpcResponse`]: wire types
//! - [`TransportError`]: structured error type, convertible to `NnsError`
//!
//! The `mock` feature adds an in-memory transport for tests.

pub mod error;
pub mod eth_call;
pub mod http;
pub mod request;
pub mod retry;
pub mod transport;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::TransportError;
pub use eth_call::RpcClient;
pub use http::{HttpClientConfig, HttpRpcClient};
pub use request::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RpcId};
pub use retry::{RetryConfig, RetryPolicy};
pub use transport::RpcTransport;
