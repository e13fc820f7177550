//! In-memory `RpcTransport` that answers `eth_call` by target and selector.
//!
//! Enabled with the `mock` feature; used by the resolver's pipeline tests.
//!
//! ```ignore
//! let mock = MockTransport::new()
//!     .on(&registry, "resolver(bytes32)", MockReply::address(&resolver))
//!     .on(&resolver, "addr(bytes32)", MockReply::address(&alice));
//! ```

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use nns_core::call::{selector, ResolverCall};
use nns_core::Address;

use crate::error::TransportError;
use crate::request::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
use crate::transport::RpcTransport;

/// What the mock answers for a matched call.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// A successful `result` value (normally a hex string).
    Result(Value),
    /// A JSON-RPC error object.
    Remote { code: i64, message: String },
    /// A transport failure.
    Transport(String),
}

impl MockReply {
    /// A single right-aligned address word.
    pub fn address(addr: &Address) -> Self {
        Self::Result(json!(format!("0x{}", hex::encode(addr.to_word()))))
    }

    pub fn zero() -> Self {
        Self::address(&Address::ZERO)
    }

    /// An ABI-encoded dynamic string.
    pub fn string(s: &str) -> Self {
        let mut out = Vec::new();
        let mut offset = [0u8; 32];
        offset[31] = 0x20;
        out.extend_from_slice(&offset);
        let mut len = [0u8; 32];
        len[24..].copy_from_slice(&(s.len() as u64).to_be_bytes());
        out.extend_from_slice(&len);
        out.extend_from_slice(s.as_bytes());
        let padded = (s.len() + 31) / 32 * 32;
        out.resize(64 + padded, 0);
        Self::Result(json!(format!("0x{}", hex::encode(out))))
    }

    pub fn raw(hex_str: &str) -> Self {
        Self::Result(json!(hex_str))
    }

    pub fn reverted() -> Self {
        Self::Remote {
            code: -32000,
            message: "execution reverted".into(),
        }
    }
}

/// One `eth_call` seen by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Lowercase `0x` target.
    pub to: String,
    /// Lowercase `0x` calldata.
    pub data: String,
}

impl RecordedCall {
    /// `0x`-prefixed 4-byte selector.
    pub fn selector(&self) -> &str {
        self.data.get(..10).unwrap_or(&self.data)
    }
}

/// Scripted transport. Unmatched calls answer with the zero word.
pub struct MockTransport {
    by_calldata: HashMap<(String, String), MockReply>,
    by_selector: HashMap<(String, String), MockReply>,
    fallback: MockReply,
    calls: Mutex<Vec<RecordedCall>>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            by_calldata: HashMap::new(),
            by_selector: HashMap::new(),
            fallback: MockReply::zero(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer every call of `signature` against `to`, whatever the arguments.
    pub fn on(mut self, to: &Address, signature: &str, reply: MockReply) -> Self {
        let key = (target_key(to), format!("0x{}", hex::encode(selector(signature))));
        self.by_selector.insert(key, reply);
        self
    }

    /// Answer one exact call against `to`. Takes precedence over [`MockTransport::on`].
    pub fn on_call(mut self, to: &Address, call: ResolverCall, reply: MockReply) -> Self {
        let key = (target_key(to), format!("0x{}", hex::encode(call.encode())));
        self.by_calldata.insert(key, reply);
        self
    }

    /// Reply used when nothing matches.
    pub fn otherwise(mut self, reply: MockReply) -> Self {
        self.fallback = reply;
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }

    fn lookup(&self, call: &RecordedCall) -> MockReply {
        let exact = (call.to.clone(), call.data.clone());
        if let Some(reply) = self.by_calldata.get(&exact) {
            return reply.clone();
        }
        let by_sel = (call.to.clone(), call.selector().to_string());
        self.by_selector
            .get(&by_sel)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

fn target_key(addr: &Address) -> String {
    format!("0x{}", addr.to_hex_lower())
}

#[async_trait]
impl RpcTransport for MockTransport {
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
        if req.method != "eth_call" {
            return Err(TransportError::Other(format!("mock: unexpected method {}", req.method)));
        }
        let tx = req
            .params
            .first()
            .ok_or_else(|| TransportError::Other("mock: missing call object".into()))?;
        let call = RecordedCall {
            to: tx["to"].as_str().unwrap_or_default().to_lowercase(),
            data: tx["data"].as_str().unwrap_or_default().to_lowercase(),
        };
        let reply = self.lookup(&call);
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        match reply {
            MockReply::Result(v) => Ok(JsonRpcResponse::success(req.id, v)),
            MockReply::Remote { code, message } => Ok(JsonRpcResponse::failure(
                req.id,
                JsonRpcError {
                    code,
                    message,
                    data: None,
                },
            )),
            MockReply::Transport(msg) => Err(TransportError::Http(msg)),
        }
    }

    fn url(&self) -> &str {
        "mock"
    }
}
