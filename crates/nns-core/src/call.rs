//! Minimal calldata encoder / return-data decoder for registry and resolver reads.
//!
//! Only the fixed-arity calls the resolution pipeline needs are supported, so
//! there is no general ABI codec here. Every argument is already a 32-byte word.
//!
//! | Call | Signature | Selector |
//! |------|-----------|----------|
//! | [`ResolverCall::Resolver`] | `resolver(bytes32)` | `0x0178b8bf` |
//! | [`ResolverCall::Owner`] | `owner(bytes32)` | `0x02571be3` |
//! | [`ResolverCall::Addr`] | `addr(bytes32)` | `0x3b3b57de` |
//! | [`ResolverCall::AddrCoin`] | `addr(bytes32,uint256)` | `0xf1cb7e06` |
//! | [`ResolverCall::Name`] | `name(bytes32)` | `0x691f3431` |

use crate::address::Address;
use crate::error::NnsError;
use crate::namehash::{keccak256, Node};

/// First four bytes of `keccak256(signature)`.
pub fn selector(signature: &str) -> [u8; 4] {
    let digest = keccak256(signature.as_bytes());
    [digest[0], digest[1], digest[2], digest[3]]
}

/// `selector(signature) ‖ args…`, each argument a pre-padded 32-byte word.
pub fn encode_call(signature: &str, args: &[[u8; 32]]) -> Vec<u8> {
    let mut calldata = Vec::with_capacity(4 + 32 * args.len());
    calldata.extend_from_slice(&selector(signature));
    for word in args {
        calldata.extend_from_slice(word);
    }
    calldata
}

/// A `uint256` argument word, big-endian.
pub fn uint_word(value: u64) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&value.to_be_bytes());
    word
}

/// The closed set of read-only calls issued against the registry and resolvers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverCall {
    /// Registry: resolver contract for a node.
    Resolver(Node),
    /// Registry: owner of a node.
    Owner(Node),
    /// Resolver: the node's primary address record.
    Addr(Node),
    /// Resolver: the node's address record under a coin-type namespace.
    AddrCoin(Node, u64),
    /// Resolver: the reverse record's name.
    Name(Node),
}

impl ResolverCall {
    pub fn signature(&self) -> &'static str {
        match self {
            Self::Resolver(_) => "resolver(bytes32)",
            Self::Owner(_) => "owner(bytes32)",
            Self::Addr(_) => "addr(bytes32)",
            Self::AddrCoin(..) => "addr(bytes32,uint256)",
            Self::Name(_) => "name(bytes32)",
        }
    }

    pub fn node(&self) -> Node {
        match self {
            Self::Resolver(n) | Self::Owner(n) | Self::Addr(n) | Self::Name(n) => *n,
            Self::AddrCoin(n, _) => *n,
        }
    }

    /// Full calldata for this call.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Self::AddrCoin(node, coin_type) => {
                encode_call(self.signature(), &[node.0, uint_word(*coin_type)])
            }
            other => encode_call(other.signature(), &[other.node().0]),
        }
    }
}

/// Decode `0x`-prefixed hex into bytes. `"0x"` decodes to an empty vector.
pub fn decode_hex(s: &str) -> Result<Vec<u8>, NnsError> {
    let raw = s
        .strip_prefix("0x")
        .ok_or_else(|| NnsError::malformed(format!("missing 0x prefix in '{s}'")))?;
    hex::decode(raw).map_err(|e| NnsError::malformed(format!("bad hex '{s}': {e}")))
}

/// Extract the address right-aligned in the first 32-byte word.
///
/// An empty payload is treated as the zero address: nodes return `0x` for
/// calls to accounts without code.
pub fn decode_address(data: &[u8]) -> Result<Address, NnsError> {
    if data.is_empty() {
        return Ok(Address::ZERO);
    }
    if data.len() < 32 {
        return Err(NnsError::malformed(format!(
            "address word too short: {} bytes",
            data.len()
        )));
    }
    let mut out = [0u8; 20];
    out.copy_from_slice(&data[12..32]);
    Ok(Address::new(out))
}

/// Decode an ABI-encoded dynamic `string` return value.
///
/// Layout: `offset (32) ‖ … ‖ length (32) at offset ‖ utf8 bytes`.
/// An empty payload decodes to the empty string.
pub fn decode_string(data: &[u8]) -> Result<String, NnsError> {
    if data.is_empty() {
        return Ok(String::new());
    }
    let offset = read_usize(data, 0)?;
    let len = read_usize(data, offset)?;
    let start = offset
        .checked_add(32)
        .ok_or_else(|| NnsError::malformed("string offset overflow"))?;
    let end = start
        .checked_add(len)
        .ok_or_else(|| NnsError::malformed("string length overflow"))?;
    let bytes = data.get(start..end).ok_or_else(|| {
        NnsError::malformed(format!(
            "string of {len} bytes at {start} exceeds payload of {} bytes",
            data.len()
        ))
    })?;
    String::from_utf8(bytes.to_vec())
        .map_err(|e| NnsError::malformed(format!("string is not utf-8: {e}")))
}

fn read_usize(data: &[u8], at: usize) -> Result<usize, NnsError> {
    let word = at
        .checked_add(32)
        .and_then(|end| data.get(at..end))
        .ok_or_else(|| NnsError::malformed(format!("no 32-byte word at offset {at}")))?;
    if word[..24].iter().any(|b| *b != 0) {
        return Err(NnsError::malformed(format!("word at offset {at} does not fit in u64")));
    }
    let mut be = [0u8; 8];
    be.copy_from_slice(&word[24..]);
    usize::try_from(u64::from_be_bytes(be))
        .map_err(|_| NnsError::malformed(format!("word at offset {at} exceeds usize")))
}
