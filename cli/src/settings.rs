//! Config resolution for the CLI: file or built-in profile, then environment,
//! then flags.

use std::path::Path;

use anyhow::{Context, Result};
use nns_core::{Address, NnsConfig};

pub const ENV_RPC_URL: &str = "NNS_RPC_URL";
pub const ENV_REGISTRY: &str = "NNS_REGISTRY";
pub const ENV_DEFAULT_RESOLVER: &str = "NNS_DEFAULT_RESOLVER";

pub fn load(path: Option<&Path>, chain_id: Option<u64>, rpc: Option<&str>) -> Result<NnsConfig> {
    load_with(path, chain_id, rpc, |key| std::env::var(key).ok())
}

fn load_with(
    path: Option<&Path>,
    chain_id: Option<u64>,
    rpc: Option<&str>,
    var: impl Fn(&str) -> Option<String>,
) -> Result<NnsConfig> {
    let mut config = match path {
        Some(path) => NnsConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => chain_id.map(NnsConfig::for_chain_id).unwrap_or_default(),
    };

    apply_env(&mut config, var)?;

    if let Some(url) = rpc {
        config.rpc_url = url.to_string();
    }
    config.check()?;
    Ok(config)
}

fn apply_env(config: &mut NnsConfig, var: impl Fn(&str) -> Option<String>) -> Result<()> {
    if let Some(url) = var(ENV_RPC_URL) {
        config.rpc_url = url;
    }
    if let Some(raw) = var(ENV_REGISTRY) {
        config.registry =
            Address::parse(&raw).with_context(|| format!("{ENV_REGISTRY}={raw}"))?;
    }
    if let Some(raw) = var(ENV_DEFAULT_RESOLVER) {
        config.default_resolver =
            Address::parse(&raw).with_context(|| format!("{ENV_DEFAULT_RESOLVER}={raw}"))?;
    }
    Ok(())
}
