//! Recursive domain hashing (EIP-137 namehash).
//!
//! ```text
//! namehash("")          = 0x00…00
//! namehash(label.rest)  = keccak256(namehash(rest) ‖ keccak256(label))
//! ```
//!
//! Labels are hashed from the root-most (rightmost) to the leftmost. No case
//! folding or normalisation happens here: callers lower-case names first.

use std::fmt;

use serde::{Deserialize, Serialize};
use tiny_keccak::{Hasher, Keccak};

/// A 32-byte name identifier produced by [`namehash`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node(#[serde(with = "hex_word")] pub [u8; 32]);

impl Node {
    pub const ZERO: Node = Node([0u8; 32]);

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Plain keccak256 over a byte slice.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    let mut output = [0u8; 32];
    hasher.update(data);
    hasher.finalize(&mut output);
    output
}

/// keccak256 of a single label's UTF-8 bytes.
pub fn labelhash(label: &str) -> [u8; 32] {
    keccak256(label.as_bytes())
}

/// Compute the namehash of a dotted name.
pub fn namehash(name: &str) -> Node {
    if name.is_empty() {
        return Node::ZERO;
    }
    let mut node = [0u8; 32];
    for label in name.rsplit('.') {
        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(&node);
        buf[32..].copy_from_slice(&labelhash(label));
        node = keccak256(&buf);
    }
    Node(node)
}

/// Check a single label against the registrar's rules: at least three
/// characters of `[a-z0-9-]`, not starting or ending with a hyphen.
///
/// Returns a human-readable reason on rejection.
pub fn validate_label(label: &str) -> Result<(), String> {
    if label.len() < 3 {
        return Err(format!("label '{label}' is shorter than 3 characters"));
    }
    if !label
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
    {
        return Err(format!("label '{label}' may only contain a-z, 0-9 and '-'"));
    }
    if label.starts_with('-') || label.ends_with('-') {
        return Err(format!("label '{label}' may not start or end with '-'"));
    }
    Ok(())
}

mod hex_word {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8; 32], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format!("0x{}", hex::encode(bytes)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[u8; 32], D::Error> {
        let s = String::deserialize(d)?;
        let raw = s.strip_prefix("0x").unwrap_or(&s);
        let mut out = [0u8; 32];
        hex::decode_to_slice(raw, &mut out).map_err(serde::de::Error::custom)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_name_is_zero_node() {
        assert_eq!(namehash(""), Node::ZERO);
        assert_eq!(
            namehash("").to_hex(),
            "0x0000000000000000000000000000000000000000000000000000000000000000"
        );
    }

    #[test]
    fn eip137_vectors() {
        assert_eq!(
            namehash("eth").to_hex(),
            "0x93cdeb708b7545dc668eb9280176169d1c33cfd8ed6f04690a0bcc88a93fc4ae"
        );
        assert_eq!(
            namehash("foo.eth").to_hex(),
            "0xde9b09fd7c5f901e23a3f19fecc54828e9c848539801e86591bd9801b019f84f"
        );
    }

    #[test]
    fn namehash_is_suffix_first() {
        // namehash(a.b) = keccak(namehash(b) ‖ labelhash(a))
        let parent = namehash("nex");
        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(parent.as_bytes());
        buf[32..].copy_from_slice(&labelhash("alice"));
        assert_eq!(namehash("alice.nex").0, keccak256(&buf));
    }

    #[test]
    fn deterministic_and_distinct_on_sample() {
        let sample = [
            "nex",
            "alice.nex",
            "bob.nex",
            "alice.bob.nex",
            "bob.alice.nex",
            "nex.alice",
            "alice.eth",
            "a.nex",
            "addr.reverse",
            "0000000000000000000000000000000000000001.addr.reverse",
        ];
        let mut seen = std::collections::HashSet::new();
        for name in sample {
            assert_eq!(namehash(name), namehash(name));
            assert!(seen.insert(namehash(name)), "collision on {name}");
        }
    }

    #[test]
    fn hashing_does_not_fold_case() {
        assert_ne!(namehash("Alice.nex"), namehash("alice.nex"));
    }

    #[test]
    fn keccak_of_empty_input() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn label_rules() {
        assert!(validate_label("alice").is_ok());
        assert!(validate_label("a-1").is_ok());
        assert!(validate_label("ab").is_err());
        assert!(validate_label("Alice").is_err());
        assert!(validate_label("-alice").is_err());
        assert!(validate_label("alice-").is_err());
        assert!(validate_label("al_ce").is_err());
    }

    #[test]
    fn node_serde_roundtrip() {
        let node = namehash("alice.nex");
        let json = serde_json::to_string(&node).unwrap();
        assert!(json.starts_with("\"0x"));
        let back: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);
    }
}
