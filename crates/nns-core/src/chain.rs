//! Chain short-name table used by the EIP-3770 layer.
//!
//! Maps a chain token (`nex`, `eth`, ...) to its numeric chain id and back.
//! A table is built once and shared read-only; it is only used for
//! encoding, validation and default-chain inference.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single chain-token entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainEntry {
    /// Short token used as the EIP-3770 prefix, e.g. `"nex"`.
    pub token: String,
    /// EVM chain id.
    pub chain_id: u64,
}

/// Immutable token ↔ chain-id table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainTable {
    by_token: BTreeMap<String, u64>,
    by_id: BTreeMap<u64, String>,
}

impl ChainTable {
    /// Build a table from `(token, chain_id)` pairs.
    ///
    /// If two tokens share a chain id the first one wins for reverse lookup.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        let mut by_token = BTreeMap::new();
        let mut by_id = BTreeMap::new();
        for (token, id) in entries {
            let token = token.into();
            by_id.entry(id).or_insert_with(|| token.clone());
            by_token.insert(token, id);
        }
        Self { by_token, by_id }
    }

    /// Numeric chain id for a token, if the token is known.
    pub fn chain_id(&self, token: &str) -> Option<u64> {
        self.by_token.get(token).copied()
    }

    /// Token for a numeric chain id, if known.
    pub fn token(&self, chain_id: u64) -> Option<&str> {
        self.by_id.get(&chain_id).map(String::as_str)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.by_token.contains_key(token)
    }

    /// All entries, ordered by token.
    pub fn supported(&self) -> Vec<ChainEntry> {
        self.by_token
            .iter()
            .map(|(token, id)| ChainEntry {
                token: token.clone(),
                chain_id: *id,
            })
            .collect()
    }
}

impl Default for ChainTable {
    fn default() -> Self {
        Self::new([
            ("eth", 1),
            ("gor", 5),
            ("sep", 11_155_111),
            ("nex", 3940),
            ("nexus", 3939),
            ("matic", 137),
            ("arb", 42_161),
            ("opt", 10),
        ])
    }
}

impl From<Vec<ChainEntry>> for ChainTable {
    fn from(entries: Vec<ChainEntry>) -> Self {
        Self::new(entries.into_iter().map(|e| (e.token, e.chain_id)))
    }
}
