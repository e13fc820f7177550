//! The fallback resolution pipeline.
//!
//! ```text
//! Start ─► IdentifierComputed ─► ResolverLocated ─► AddressFound
//!                                                └► AddressAbsent
//! ```
//!
//! `ResolverLocated` substitutes the configured default resolver when the
//! registry has none (or the lookup fails transiently). `AddressFound` is the
//! first non-zero answer of `addr(node)`, `addr(node, coin)`, then the
//! registry's `owner(node)`. Transport and remote failures at any step are
//! logged, counted and treated as zero; invalid names and malformed responses
//! propagate.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use nns_core::call::{decode_address, decode_string};
use nns_core::{namehash, Address, FinalStepPolicy, NnsConfig, NnsError, Node, ResolverCall};
use nns_rpc::RpcClient;

/// One remote read in the pipeline. Used as the `step` field in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStage {
    /// Registry `resolver(node)`.
    LocateResolver,
    /// Resolver `addr(node)`.
    Addr,
    /// Resolver `addr(node, coin_type)`.
    AddrCoin,
    /// Registry `owner(node)`.
    Owner,
    /// Resolver `name(node)` for a reverse record.
    Name,
}

impl ResolutionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LocateResolver => "locate_resolver",
            Self::Addr => "addr",
            Self::AddrCoin => "addr_coin",
            Self::Owner => "owner",
            Self::Name => "name",
        }
    }
}

impl fmt::Display for ResolutionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Forward and reverse resolution against one registry.
pub struct Resolver {
    client: RpcClient,
    registry: Address,
    default_resolver: Address,
    domain_suffix: String,
    reverse_suffix: String,
    coin_type: u64,
    policy: FinalStepPolicy,
    swallowed: AtomicU64,
}

impl Resolver {
    pub fn new(client: RpcClient, config: &NnsConfig) -> Self {
        Self {
            client,
            registry: config.registry,
            default_resolver: config.default_resolver,
            domain_suffix: config.domain_suffix.to_lowercase(),
            reverse_suffix: config.reverse_suffix.trim_start_matches('.').to_lowercase(),
            coin_type: config.native_coin_type,
            policy: config.final_step_policy,
            swallowed: AtomicU64::new(0),
        }
    }

    /// Resolver over HTTP using `config.rpc_url`.
    pub fn from_config(config: &NnsConfig) -> Result<Self, NnsError> {
        Ok(Self::new(RpcClient::from_config(config)?, config))
    }

    pub fn client(&self) -> &RpcClient {
        &self.client
    }

    pub fn registry(&self) -> &Address {
        &self.registry
    }

    pub fn default_resolver(&self) -> &Address {
        &self.default_resolver
    }

    /// Failures recovered as "zero" since construction.
    pub fn swallowed_failures(&self) -> u64 {
        self.swallowed.load(Ordering::Relaxed)
    }

    /// Resolve a name carrying the domain suffix to an address.
    ///
    /// `Ok(None)` means no step produced a non-zero address.
    pub async fn resolve_name(&self, name: &str) -> Result<Option<Address>, NnsError> {
        let name = self.check_name(name)?;
        let node = namehash(&name);
        tracing::debug!(name = %name, node = %node, "identifier computed");

        let resolver = self.locate_resolver(&node).await?;
        tracing::debug!(name = %name, resolver = %resolver, "resolver located");

        let steps = [
            (ResolutionStage::Addr, resolver, ResolverCall::Addr(node)),
            (
                ResolutionStage::AddrCoin,
                resolver,
                ResolverCall::AddrCoin(node, self.coin_type),
            ),
            (ResolutionStage::Owner, self.registry, ResolverCall::Owner(node)),
        ];
        let last = steps.len() - 1;

        for (i, (stage, target, call)) in steps.into_iter().enumerate() {
            match self.read_address(&target, call).await {
                Ok(Some(address)) => {
                    tracing::debug!(name = %name, step = %stage, address = %address, "address found");
                    return Ok(Some(address));
                }
                Ok(None) => {
                    tracing::debug!(name = %name, step = %stage, "zero address");
                }
                Err(e) if e.is_transient() => {
                    if i == last && self.policy == FinalStepPolicy::Surface {
                        return Err(e);
                    }
                    self.swallow(stage, &node, &e);
                }
                Err(e) => return Err(e),
            }
        }

        tracing::debug!(name = %name, "address absent");
        Ok(None)
    }

    /// Look up the reverse record of `address`.
    ///
    /// `Ok(None)` when there is no record or it is empty.
    pub async fn reverse_name(&self, address: &Address) -> Result<Option<String>, NnsError> {
        let reverse = format!("{}.{}", address.to_hex_lower(), self.reverse_suffix);
        let node = namehash(&reverse);
        tracing::debug!(reverse = %reverse, node = %node, "reverse identifier computed");

        let resolver = self.locate_resolver(&node).await?;
        let raw = match self.client.query(&resolver, ResolverCall::Name(node)).await {
            Ok(raw) => raw,
            Err(e) if e.is_transient() => {
                if self.policy == FinalStepPolicy::Surface {
                    return Err(e);
                }
                self.swallow(ResolutionStage::Name, &node, &e);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let name = decode_string(&raw)?;
        if name.is_empty() {
            tracing::debug!(address = %address, "no reverse record");
            Ok(None)
        } else {
            Ok(Some(name))
        }
    }

    fn check_name(&self, name: &str) -> Result<String, NnsError> {
        let name = name.trim().to_lowercase();
        let Some(stem) = name.strip_suffix(&self.domain_suffix) else {
            return Err(NnsError::invalid_name(
                name.as_str(),
                format!("missing '{}' suffix", self.domain_suffix),
            ));
        };
        if stem.is_empty() {
            return Err(NnsError::invalid_name(name.as_str(), "empty name"));
        }
        if stem.split('.').any(str::is_empty) {
            return Err(NnsError::invalid_name(name.as_str(), "empty label"));
        }
        Ok(name)
    }

    async fn locate_resolver(&self, node: &Node) -> Result<Address, NnsError> {
        match self
            .read_address(&self.registry, ResolverCall::Resolver(*node))
            .await
        {
            Ok(Some(resolver)) => Ok(resolver),
            Ok(None) => {
                tracing::debug!(node = %node, default = %self.default_resolver, "no resolver set, using default");
                Ok(self.default_resolver)
            }
            Err(e) if e.is_transient() => {
                self.swallow(ResolutionStage::LocateResolver, node, &e);
                Ok(self.default_resolver)
            }
            Err(e) => Err(e),
        }
    }

    async fn read_address(
        &self,
        target: &Address,
        call: ResolverCall,
    ) -> Result<Option<Address>, NnsError> {
        let raw = self.client.query(target, call).await?;
        let address = decode_address(&raw)?;
        Ok((!address.is_zero()).then_some(address))
    }

    fn swallow(&self, stage: ResolutionStage, node: &Node, error: &NnsError) {
        self.swallowed.fetch_add(1, Ordering::Relaxed);
        tracing::warn!(step = %stage, node = %node, error = %error, "resolution step failed, treating as zero");
    }
}
