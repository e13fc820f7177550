//! Name-service configuration.
//!
//! Everything that used to be a module-level constant (endpoint, contract
//! addresses, chain table, suffixes) lives in an explicitly constructed
//! [`NnsConfig`] that is handed to the resolver at construction time, so test
//! and production setups can coexist in one process.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::address::Address;
use crate::chain::{ChainEntry, ChainTable};
use crate::eip3770::AddressFormat;
use crate::error::NnsError;

/// What to report when the last fallback step fails with a transient error
/// and no earlier step produced an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalStepPolicy {
    /// Report "no address record" (`Ok(None)`).
    #[default]
    FoldIntoNotFound,
    /// Return the final step's transport/remote error.
    Surface,
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NnsConfig {
    /// Chain id of the network the registry lives on.
    pub chain_id: u64,
    /// JSON-RPC HTTP endpoint.
    pub rpc_url: String,
    /// Root registry contract.
    pub registry: Address,
    /// Resolver used when the registry has no resolver for a name.
    pub default_resolver: Address,
    /// Suffix a name must carry to be resolved here.
    #[serde(default = "default_domain_suffix")]
    pub domain_suffix: String,
    /// Chain tokens under which the name service answers.
    #[serde(default = "default_nns_chains")]
    pub nns_chains: Vec<String>,
    /// Parent name of reverse records (without leading dot).
    #[serde(default = "default_reverse_suffix")]
    pub reverse_suffix: String,
    /// Coin type for the `addr(bytes32,uint256)` fallback.
    #[serde(default = "default_coin_type")]
    pub native_coin_type: u64,
    #[serde(default)]
    pub final_step_policy: FinalStepPolicy,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Retries on transient transport errors (not counting the first try).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Initial retry backoff in milliseconds.
    #[serde(default = "default_backoff_ms")]
    pub initial_backoff_ms: u64,
    /// Bound on one contract call, retries and backoff included. When unset
    /// the transport derives it from the timeout and retry settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_timeout_ms: Option<u64>,
    /// Overrides the built-in chain table when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chains: Option<Vec<ChainEntry>>,
}

fn default_domain_suffix() -> String {
    ".nex".into()
}
fn default_nns_chains() -> Vec<String> {
    vec!["nex".into(), "nexus".into()]
}
fn default_reverse_suffix() -> String {
    "addr.reverse".into()
}
fn default_coin_type() -> u64 { 60 }
fn default_timeout_ms() -> u64 { 30_000 }
fn default_max_retries() -> u32 { 2 }
fn default_backoff_ms() -> u64 { 200 }

fn builtin(addr: &str) -> Address {
    Address::parse(addr).expect("built-in profile address is a valid literal")
}

impl NnsConfig {
    /// Nexus testnet (chain 3940).
    pub fn nexus_testnet() -> Self {
        Self::with_contracts(
            3940,
            "https://testnet3.rpc.nexus.xyz",
            builtin("0x35481Ed34c3E6446EaafDca622369Df4295dce31"),
            builtin("0x3C7bc6E4C65A194B3Bec187a3D6ef97A61F9DcD5"),
        )
    }

    /// Local Hardhat node (chain 31337) with the default deployment addresses.
    pub fn hardhat_local() -> Self {
        let mut config = Self::with_contracts(
            31_337,
            "http://127.0.0.1:8545",
            builtin("0x5FbDB2315678afecb367f032d93F642f64180aa3"),
            builtin("0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512"),
        );
        config.max_retries = 0;
        config
    }

    /// Built-in profile for a chain id, falling back to the testnet.
    pub fn for_chain_id(chain_id: u64) -> Self {
        match chain_id {
            31_337 => Self::hardhat_local(),
            _ => Self::nexus_testnet(),
        }
    }

    /// A profile with default suffixes and transport settings.
    pub fn with_contracts(
        chain_id: u64,
        rpc_url: impl Into<String>,
        registry: Address,
        default_resolver: Address,
    ) -> Self {
        Self {
            chain_id,
            rpc_url: rpc_url.into(),
            registry,
            default_resolver,
            domain_suffix: default_domain_suffix(),
            nns_chains: default_nns_chains(),
            reverse_suffix: default_reverse_suffix(),
            native_coin_type: default_coin_type(),
            final_step_policy: FinalStepPolicy::default(),
            request_timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
            initial_backoff_ms: default_backoff_ms(),
            call_timeout_ms: None,
            chains: None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, NnsError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| NnsError::Config(e.to_string()))?;
        config.check()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, NnsError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| NnsError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&raw)
    }

    /// Reject configurations the resolver cannot work with.
    pub fn check(&self) -> Result<(), NnsError> {
        if self.rpc_url.is_empty() {
            return Err(NnsError::Config("rpc_url is empty".into()));
        }
        if !self.domain_suffix.starts_with('.') || self.domain_suffix.len() < 2 {
            return Err(NnsError::Config(format!(
                "domain_suffix '{}' must look like '.tld'",
                self.domain_suffix
            )));
        }
        if self.nns_chains.is_empty() {
            return Err(NnsError::Config("nns_chains is empty".into()));
        }
        if self.reverse_suffix.is_empty() {
            return Err(NnsError::Config("reverse_suffix is empty".into()));
        }
        if self.call_timeout_ms == Some(0) {
            return Err(NnsError::Config("call_timeout_ms must be positive".into()));
        }
        Ok(())
    }

    pub fn chain_table(&self) -> ChainTable {
        match &self.chains {
            Some(entries) => ChainTable::from(entries.clone()),
            None => ChainTable::default(),
        }
    }

    /// Chain token the name service tags its own domains with.
    pub fn primary_nns_chain(&self) -> &str {
        self.nns_chains.first().map(String::as_str).unwrap_or("nex")
    }

    pub fn address_format(&self) -> AddressFormat {
        AddressFormat::new(
            self.chain_table(),
            self.domain_suffix.clone(),
            self.primary_nns_chain(),
        )
    }

    pub fn is_nns_chain(&self, token: &str) -> bool {
        self.nns_chains.iter().any(|c| c == token)
    }
}

impl Default for NnsConfig {
    fn default() -> Self {
        Self::nexus_testnet()
    }
}
