//! EIP-3770 chain-qualified identifiers: `chain:identifier`.
//!
//! The identifier is either an address literal or a domain name:
//!
//! ```text
//! nex:alice.nex
//! nex:0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed
//! eth:vitalik.eth
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::address::{is_address_literal, is_valid_address, to_checksum_address};
use crate::chain::ChainTable;

pub const SEPARATOR: char = ':';

/// What the identifier half of a chain-qualified string denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierKind {
    Address,
    Domain,
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address => write!(f, "address"),
            Self::Domain => write!(f, "domain"),
        }
    }
}

/// A decoded `chain:identifier` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainQualifiedAddress {
    pub chain: String,
    pub identifier: String,
    #[serde(rename = "type")]
    pub kind: IdentifierKind,
}

impl fmt::Display for ChainQualifiedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEPARATOR}{}", self.chain, self.identifier)
    }
}

/// Join a chain token and an identifier.
pub fn encode(chain: &str, identifier: &str) -> String {
    format!("{chain}{SEPARATOR}{identifier}")
}

/// Split at the first separator and classify the identifier.
///
/// Returns `None` when there is no separator or either half is empty.
pub fn decode(encoded: &str) -> Option<ChainQualifiedAddress> {
    let (chain, identifier) = encoded.split_once(SEPARATOR)?;
    if chain.is_empty() || identifier.is_empty() {
        return None;
    }
    let kind = if is_address_literal(identifier) {
        IdentifierKind::Address
    } else {
        IdentifierKind::Domain
    };
    Some(ChainQualifiedAddress {
        chain: chain.to_string(),
        identifier: identifier.to_string(),
        kind,
    })
}

/// Contains a dot and is not an address literal.
pub fn is_domain(value: &str) -> bool {
    value.contains('.') && !is_address_literal(value)
}

/// Identifier part of an encoded string, or the input itself when untagged.
pub fn extract_identifier(encoded: &str) -> String {
    decode(encoded)
        .map(|d| d.identifier)
        .unwrap_or_else(|| encoded.to_string())
}

/// Chain token of an encoded string.
pub fn extract_chain(encoded: &str) -> Option<String> {
    decode(encoded).map(|d| d.chain)
}

/// Lower-case the chain, checksum addresses, lower-case domains.
///
/// Strings without a separator are returned unchanged.
pub fn normalize(encoded: &str) -> String {
    let Some(decoded) = decode(encoded) else {
        return encoded.to_string();
    };
    let chain = decoded.chain.to_lowercase();
    let identifier = match decoded.kind {
        IdentifierKind::Address => to_checksum_address(&decoded.identifier)
            .unwrap_or_else(|_| decoded.identifier.clone()),
        IdentifierKind::Domain => decoded.identifier.to_lowercase(),
    };
    encode(&chain, &identifier)
}

/// Chain-aware operations that need the chain table and the name-service
/// suffix: validation, auto-tagging and display formatting.
#[derive(Debug, Clone)]
pub struct AddressFormat {
    chains: ChainTable,
    /// Domain suffix owned by the name service, e.g. `".nex"`.
    domain_suffix: String,
    /// Chain token prepended to untagged name-service domains.
    nns_chain: String,
}

impl AddressFormat {
    pub fn new(
        chains: ChainTable,
        domain_suffix: impl Into<String>,
        nns_chain: impl Into<String>,
    ) -> Self {
        Self {
            chains,
            domain_suffix: domain_suffix.into(),
            nns_chain: nns_chain.into(),
        }
    }

    pub fn chains(&self) -> &ChainTable {
        &self.chains
    }

    pub fn domain_suffix(&self) -> &str {
        &self.domain_suffix
    }

    pub fn nns_chain(&self) -> &str {
        &self.nns_chain
    }

    /// Ends with the name service's own suffix.
    pub fn is_nns_domain(&self, value: &str) -> bool {
        value.ends_with(&self.domain_suffix)
    }

    /// Known chain token, exactly one separator, identifier fits its kind.
    pub fn validate(&self, encoded: &str) -> bool {
        let Some(decoded) = decode(encoded) else {
            return false;
        };
        if !self.chains.contains(&decoded.chain) {
            return false;
        }
        if decoded.identifier.contains(SEPARATOR) {
            return false;
        }
        match decoded.kind {
            IdentifierKind::Address => is_valid_address(&decoded.identifier),
            IdentifierKind::Domain => is_domain(&decoded.identifier),
        }
    }

    /// Prepend a chain tag to untagged input.
    ///
    /// Name-service domains get the name service's chain; other domains and
    /// addresses get `default_chain`. Anything else is returned unchanged.
    pub fn auto_format(&self, input: &str, default_chain: &str) -> String {
        if input.contains(SEPARATOR) {
            return input.to_string();
        }
        if is_valid_address(input) {
            return encode(default_chain, input);
        }
        if is_domain(input) {
            let chain = if self.is_nns_domain(input) {
                self.nns_chain.as_str()
            } else {
                default_chain
            };
            return encode(chain, input);
        }
        input.to_string()
    }

    /// Whether the input names a domain that has to go through resolution.
    pub fn needs_resolution(&self, input: &str) -> bool {
        match decode(input) {
            Some(decoded) => decoded.kind == IdentifierKind::Domain,
            None => is_domain(input),
        }
    }

    /// Numeric chain id of an encoded string's chain token.
    pub fn chain_id_of(&self, encoded: &str) -> Option<u64> {
        decode(encoded).and_then(|d| self.chains.chain_id(&d.chain))
    }
}

impl Default for AddressFormat {
    fn default() -> Self {
        Self::new(ChainTable::default(), ".nex", "nex")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    #[test]
    fn encode_joins_with_colon() {
        assert_eq!(encode("nex", "alice.nex"), "nex:alice.nex");
        assert_eq!(encode("nex", ADDR), format!("nex:{ADDR}"));
    }

    #[test]
    fn decode_classifies_identifier() {
        let d = decode("nex:alice.nex").unwrap();
        assert_eq!(d.chain, "nex");
        assert_eq!(d.identifier, "alice.nex");
        assert_eq!(d.kind, IdentifierKind::Domain);

        let d = decode(&format!("eth:{ADDR}")).unwrap();
        assert_eq!(d.kind, IdentifierKind::Address);
    }

    #[test]
    fn decode_rejects_missing_parts() {
        assert!(decode("alice.nex").is_none());
        assert!(decode("nex:").is_none());
        assert!(decode(":alice.nex").is_none());
    }

    #[test]
    fn encode_decode_roundtrip() {
        for (chain, id, kind) in [
            ("nex", "alice.nex", IdentifierKind::Domain),
            ("eth", "vitalik.eth", IdentifierKind::Domain),
            ("arb", ADDR, IdentifierKind::Address),
        ] {
            let decoded = decode(&encode(chain, id)).unwrap();
            assert_eq!(
                decoded,
                ChainQualifiedAddress {
                    chain: chain.into(),
                    identifier: id.into(),
                    kind
                }
            );
            assert_eq!(decoded.to_string(), encode(chain, id));
        }
    }

    #[test]
    fn validate_cases() {
        let fmt = AddressFormat::default();
        assert!(fmt.validate("nex:alice.nex"));
        assert!(fmt.validate("eth:vitalik.eth"));
        assert!(fmt.validate(&format!("nex:{ADDR}")));
        assert!(!fmt.validate("invalid:format"));
        assert!(!fmt.validate("alice.nex"));
        assert!(!fmt.validate("nex:"));
        assert!(!fmt.validate("unknown:test.domain"));
        assert!(!fmt.validate("zzz:alice.nex"));
        assert!(!fmt.validate("nex:alice"));
        assert!(!fmt.validate("nex:eth:alice.nex"));
        // mixed case with a broken checksum
        assert!(!fmt.validate("nex:0x5AAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"));
    }

    #[test]
    fn normalize_cases() {
        assert_eq!(normalize("NEX:ALICE.NEX"), "nex:alice.nex");
        assert_eq!(normalize("ETH:Vitalik.ETH"), "eth:vitalik.eth");
        assert_eq!(normalize(&format!("nex:{}", ADDR.to_lowercase())), format!("nex:{ADDR}"));
        assert_eq!(normalize("no-separator"), "no-separator");
    }

    #[test]
    fn auto_format_cases() {
        let fmt = AddressFormat::default();
        assert_eq!(fmt.auto_format("alice.nex", "eth"), "nex:alice.nex");
        assert_eq!(fmt.auto_format("vitalik.eth", "eth"), "eth:vitalik.eth");
        assert_eq!(fmt.auto_format("vitalik.eth", "nex"), "nex:vitalik.eth");
        assert_eq!(fmt.auto_format(ADDR, "nex"), format!("nex:{ADDR}"));
        assert_eq!(fmt.auto_format("nex:bob.nex", "eth"), "nex:bob.nex");
        assert_eq!(fmt.auto_format("garbage", "nex"), "garbage");
    }

    #[test]
    fn extraction_helpers() {
        assert_eq!(extract_identifier("nex:alice.nex"), "alice.nex");
        assert_eq!(extract_identifier("alice.nex"), "alice.nex");
        assert_eq!(extract_chain("eth:vitalik.eth").as_deref(), Some("eth"));
        assert_eq!(extract_chain("vitalik.eth"), None);
    }

    #[test]
    fn needs_resolution_cases() {
        let fmt = AddressFormat::default();
        assert!(fmt.needs_resolution("nex:alice.nex"));
        assert!(fmt.needs_resolution("alice.nex"));
        assert!(!fmt.needs_resolution(&format!("nex:{ADDR}")));
        assert!(!fmt.needs_resolution(ADDR));
    }

    #[test]
    fn chain_id_lookup() {
        let fmt = AddressFormat::default();
        assert_eq!(fmt.chain_id_of("nex:alice.nex"), Some(3940));
        assert_eq!(fmt.chain_id_of("zzz:alice.nex"), None);
    }

    #[test]
    fn kind_serializes_as_type() {
        let d = decode("nex:alice.nex").unwrap();
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["type"], "domain");
    }
}
