//! Resolution result record.

use serde::{Deserialize, Serialize};

use crate::address::Address;

/// The outcome of resolving a chain-qualified string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAddress {
    /// Checksummed account address.
    pub address: Address,
    /// Present only when the name service was consulted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Chain token from the input.
    pub chain: String,
    /// The input string exactly as given.
    pub original: String,
}

impl ResolvedAddress {
    /// `"alice.nex (nex)"` for names, `"0x5aAe...eAed (nex)"` for bare addresses.
    pub fn format_for_display(&self) -> String {
        match &self.domain {
            Some(domain) => format!("{domain} ({})", self.chain),
            None => {
                let full = self.address.to_checksum();
                format!("{}...{} ({})", &full[..6], &full[38..], self.chain)
            }
        }
    }
}
