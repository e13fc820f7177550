//! `NameService`, the public entry point over `chain:identifier` strings.

use nns_core::eip3770::{self, AddressFormat, ChainQualifiedAddress, IdentifierKind};
use nns_core::{
    is_address_literal, namehash, Address, NnsConfig, NnsError, Node, ResolvedAddress,
};
use nns_rpc::RpcClient;

use crate::batch::resolve_ordered;
use crate::cache::ResolutionCache;
use crate::resolver::Resolver;

/// Resolves EIP-3770 strings through the name service.
pub struct NameService {
    config: NnsConfig,
    format: AddressFormat,
    resolver: Resolver,
    cache: Option<ResolutionCache>,
}

impl NameService {
    pub fn new(config: NnsConfig, client: RpcClient) -> Self {
        let resolver = Resolver::new(client, &config);
        Self {
            format: config.address_format(),
            config,
            resolver,
            cache: None,
        }
    }

    /// Service over HTTP using `config.rpc_url`.
    pub fn from_config(config: NnsConfig) -> Result<Self, NnsError> {
        config.check()?;
        let client = RpcClient::from_config(&config)?;
        Ok(Self::new(config, client))
    }

    pub fn with_cache(mut self, cache: ResolutionCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn config(&self) -> &NnsConfig {
        &self.config
    }

    pub fn format(&self) -> &AddressFormat {
        &self.format
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn cache(&self) -> Option<&ResolutionCache> {
        self.cache.as_ref()
    }

    pub fn namehash(&self, name: &str) -> Node {
        namehash(name)
    }

    pub fn encode(&self, chain: &str, identifier: &str) -> String {
        eip3770::encode(chain, identifier)
    }

    pub fn decode(&self, encoded: &str) -> Option<ChainQualifiedAddress> {
        eip3770::decode(encoded)
    }

    pub fn validate(&self, encoded: &str) -> bool {
        self.format.validate(encoded)
    }

    pub fn normalize(&self, encoded: &str) -> String {
        eip3770::normalize(encoded)
    }

    pub fn auto_format(&self, input: &str, default_chain: &str) -> String {
        self.format.auto_format(input, default_chain)
    }

    /// Resolve a `chain:identifier` string.
    ///
    /// Address identifiers come back checksummed without touching the network.
    /// Domains are resolved only when they carry the name-service suffix and
    /// the chain is one the service answers for; anything else is `Ok(None)`.
    pub async fn resolve(&self, encoded: &str) -> Result<Option<ResolvedAddress>, NnsError> {
        let Some(decoded) = eip3770::decode(encoded) else {
            tracing::debug!(input = %encoded, "not a chain-qualified string");
            return Ok(None);
        };

        match decoded.kind {
            IdentifierKind::Address => {
                let address = Address::parse(&decoded.identifier)?;
                Ok(Some(ResolvedAddress {
                    address,
                    domain: None,
                    chain: decoded.chain,
                    original: encoded.to_string(),
                }))
            }
            IdentifierKind::Domain => {
                let domain = decoded.identifier.trim().to_lowercase();
                if !self.format.is_nns_domain(&domain) || !self.config.is_nns_chain(&decoded.chain) {
                    tracing::debug!(
                        chain = %decoded.chain,
                        identifier = %decoded.identifier,
                        "not a name-service domain"
                    );
                    return Ok(None);
                }

                let chain_id = self
                    .format
                    .chains()
                    .chain_id(&decoded.chain)
                    .unwrap_or(self.config.chain_id);

                if let Some(address) = self.cache.as_ref().and_then(|c| c.get(&domain, chain_id)) {
                    tracing::debug!(domain = %domain, chain_id, "cache hit");
                    return Ok(Some(domain_record(address, domain, decoded.chain, encoded)));
                }

                let Some(address) = self.resolver.resolve_name(&domain).await? else {
                    return Ok(None);
                };
                if let Some(cache) = &self.cache {
                    cache.insert(&domain, chain_id, address);
                }
                Ok(Some(domain_record(address, domain, decoded.chain, encoded)))
            }
        }
    }

    /// Reverse-resolve `address` to a `chain:identifier` string.
    ///
    /// Returns `chain:domain` when a reverse record exists, otherwise
    /// `chain:address`. Non-address input yields `Ok(None)`.
    pub async fn reverse_resolve(
        &self,
        address: &str,
        preferred_chain: Option<&str>,
    ) -> Result<Option<String>, NnsError> {
        if !is_address_literal(address) {
            return Ok(None);
        }
        let parsed = Address::parse(address)?;

        if let Some(domain) = self.resolver.reverse_name(&parsed).await? {
            let chain = preferred_chain.unwrap_or(self.config.primary_nns_chain());
            return Ok(Some(eip3770::encode(chain, &domain)));
        }

        let chain = match preferred_chain {
            Some(chain) => chain.to_string(),
            None => self
                .format
                .chains()
                .token(self.config.chain_id)
                .unwrap_or("nex")
                .to_string(),
        };
        Ok(Some(eip3770::encode(&chain, &parsed.to_checksum())))
    }

    /// Resolve every input concurrently; output order equals input order and
    /// a failed entry is `None`.
    pub async fn batch_resolve<S: AsRef<str>>(&self, inputs: &[S]) -> Vec<Option<ResolvedAddress>> {
        resolve_ordered(inputs.iter().map(|s| s.as_ref()), |input| self.resolve(input)).await
    }

}

fn domain_record(address: Address, domain: String, chain: String, original: &str) -> ResolvedAddress {
    ResolvedAddress {
        address,
        domain: Some(domain),
        chain,
        original: original.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nns_rpc::mock::MockTransport;
    use std::sync::Arc;

    fn service() -> (NameService, Arc<MockTransport>) {
        let mock = Arc::new(MockTransport::new());
        let svc = NameService::new(NnsConfig::nexus_testnet(), RpcClient::new(mock.clone()));
        (svc, mock)
    }

    #[tokio::test]
    async fn address_identifier_skips_network() {
        let (svc, mock) = service();
        let input = "eth:0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed";
        let r = svc.resolve(input).await.unwrap().unwrap();
        assert_eq!(r.address.to_checksum(), "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
        assert_eq!(r.chain, "eth");
        assert_eq!(r.original, input);
        assert!(r.domain.is_none());
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn foreign_domains_are_not_resolved() {
        let (svc, mock) = service();
        assert!(svc.resolve("eth:vitalik.eth").await.unwrap().is_none());
        assert!(svc.resolve("eth:alice.nex").await.unwrap().is_none());
        assert!(svc.resolve("no-separator").await.unwrap().is_none());
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn reverse_of_non_address_is_none() {
        let (svc, _) = service();
        assert_eq!(svc.reverse_resolve("alice.nex", None).await.unwrap(), None);
    }

    #[test]
    fn pass_throughs() {
        let (svc, _) = service();
        assert_eq!(svc.encode("nex", "alice.nex"), "nex:alice.nex");
        assert!(svc.validate("nex:alice.nex"));
        assert!(!svc.validate("zzz:alice.nex"));
        assert_eq!(svc.normalize("NEX:ALICE.NEX"), "nex:alice.nex");
        assert_eq!(svc.auto_format("alice.nex", "eth"), "nex:alice.nex");
        assert_eq!(svc.namehash(""), Node::ZERO);
        assert_eq!(svc.decode("nex:alice.nex").unwrap().kind, IdentifierKind::Domain);
    }
}
