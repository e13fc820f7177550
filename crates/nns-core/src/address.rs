//! 20-byte account addresses and EIP-55 mixed-case checksums.
//!
//! Downstream equality checks compare checksummed strings, so
//! [`to_checksum_address`] must match EIP-55 bit for bit:
//! nibble `i` of the lowercase hex is upper-cased when nibble `i` of
//! `keccak256(lowercase_hex_ascii)` is `>= 8`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::NnsError;
use crate::namehash::keccak256;

/// A 20-byte account address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; 20]);

impl Address {
    /// The reserved all-zero address, meaning "unset".
    pub const ZERO: Address = Address([0u8; 20]);

    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Parse a `0x`-prefixed, 40-hex-digit literal. Case is not checked.
    pub fn parse(s: &str) -> Result<Self, NnsError> {
        if !is_address_literal(s) {
            return Err(NnsError::InvalidAddress(s.to_string()));
        }
        let mut out = [0u8; 20];
        hex::decode_to_slice(&s[2..], &mut out)
            .map_err(|_| NnsError::InvalidAddress(s.to_string()))?;
        Ok(Self(out))
    }

    /// Like [`Address::parse`], but rejects mixed-case input whose checksum is wrong.
    pub fn parse_checked(s: &str) -> Result<Self, NnsError> {
        if !is_valid_address(s) {
            return Err(NnsError::InvalidAddress(s.to_string()));
        }
        Self::parse(s)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Lowercase hex without the `0x` prefix.
    pub fn to_hex_lower(&self) -> String {
        hex::encode(self.0)
    }

    /// EIP-55 checksummed form, `0x`-prefixed.
    pub fn to_checksum(&self) -> String {
        checksum_from_lower(&self.to_hex_lower())
    }

    /// Right-aligned inside a 32-byte ABI word.
    pub fn to_word(&self) -> [u8; 32] {
        let mut word = [0u8; 32];
        word[12..].copy_from_slice(&self.0);
        word
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl FromStr for Address {
    type Err = NnsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_checksum())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// `0x` prefix followed by exactly 40 hex digits. Checksum is not inspected.
pub fn is_address_literal(value: &str) -> bool {
    let Some(hex_part) = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    else {
        return false;
    };
    hex_part.len() == 40 && hex_part.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Shape check plus EIP-55 verification for mixed-case literals.
///
/// All-lowercase and all-uppercase literals carry no checksum and are accepted.
pub fn is_valid_address(value: &str) -> bool {
    if !is_address_literal(value) {
        return false;
    }
    let hex_part = &value[2..];
    let has_lower = hex_part.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = hex_part.bytes().any(|b| b.is_ascii_uppercase());
    if !(has_lower && has_upper) {
        return true;
    }
    let expected = checksum_from_lower(&hex_part.to_ascii_lowercase());
    &expected[2..] == hex_part
}

/// Re-case an address literal into its EIP-55 checksum form.
pub fn to_checksum_address(value: &str) -> Result<String, NnsError> {
    if !is_address_literal(value) {
        return Err(NnsError::InvalidAddress(value.to_string()));
    }
    Ok(checksum_from_lower(&value[2..].to_ascii_lowercase()))
}

fn checksum_from_lower(lower: &str) -> String {
    let digest = keccak256(lower.as_bytes());
    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let byte = digest[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}
