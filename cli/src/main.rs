//! nns: Nexus Name Service command-line tool.
//!
//! # Commands
//! ```text
//! nns namehash  <name>
//! nns labelhash <label>
//! nns encode    <chain> <identifier>
//! nns decode    <chain:identifier>
//! nns validate  <chain:identifier>
//! nns normalize <chain:identifier>
//! nns format    <input> [--default-chain <token>]
//! nns resolve   <chain:identifier>
//! nns reverse   <address> [--chain <token>]
//! nns batch     <chain:identifier>... | --file <path>
//! nns chains
//! nns selector  <signature>
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use nns_core::call::selector;
use nns_core::eip3770;
use nns_core::namehash::validate_label;
use nns_core::{labelhash, namehash, NnsConfig};
use nns_observability::{init_tracing, LogConfig};
use nns_resolver::NameService;

mod settings;

#[derive(Parser)]
#[command(
    name = "nns",
    about = "Nexus Name Service: namehash, EIP-3770 formatting and name resolution",
    long_about = "
Hash names, encode and validate EIP-3770 `chain:identifier` strings, and
resolve .nex names against the registry over JSON-RPC.

ENVIRONMENT VARIABLES:
  NNS_RPC_URL            JSON-RPC endpoint (overridden by --rpc)
  NNS_REGISTRY           Registry contract address
  NNS_DEFAULT_RESOLVER   Resolver used when a name has none set
  RUST_LOG               Log filter (overrides --verbose)
",
    version
)]
struct Cli {
    /// JSON config file (defaults to the built-in profile)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Built-in profile by chain id (3940 testnet, 31337 local)
    #[arg(long, global = true)]
    chain_id: Option<u64>,

    /// JSON-RPC endpoint URL
    #[arg(long, global = true)]
    rpc: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// EIP-137 namehash of a name
    Namehash { name: String },

    /// keccak256 of a single label
    Labelhash { label: String },

    /// Join a chain token and an identifier
    Encode { chain: String, identifier: String },

    /// Split a chain-qualified string and classify its identifier
    Decode { encoded: String },

    /// Check a chain-qualified string against the chain table
    Validate { encoded: String },

    /// Lower-case chain and domain, checksum addresses
    Normalize { encoded: String },

    /// Prepend a chain tag to an untagged address or domain
    Format {
        input: String,
        /// Chain used when the input is not a name-service domain
        #[arg(long, default_value = "eth")]
        default_chain: String,
    },

    /// Resolve a chain-qualified name or address
    Resolve { encoded: String },

    /// Reverse-resolve an address to a chain-qualified name
    Reverse {
        address: String,
        /// Chain token for the result
        #[arg(long)]
        chain: Option<String>,
    },

    /// Resolve several inputs concurrently
    Batch {
        inputs: Vec<String>,
        /// Read inputs from a file, one per line
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// List the chain table
    Chains,

    /// 4-byte selector of a function signature
    Selector { signature: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log = LogConfig::from_verbosity(cli.verbose).with_json(cli.json);
    // A subscriber may already be installed when embedded; keep going.
    let _ = init_tracing(&log);

    let config = || settings::load(cli.config.as_deref(), cli.chain_id, cli.rpc.as_deref());

    match &cli.command {
        Commands::Namehash { name } => cmd_namehash(name, cli.json),
        Commands::Labelhash { label } => {
            print_value(cli.json, "labelhash", &format!("0x{}", hex::encode(labelhash(label))))
        }
        Commands::Encode { chain, identifier } => {
            print_value(cli.json, "encoded", &eip3770::encode(chain, identifier))
        }
        Commands::Decode { encoded } => cmd_decode(encoded, cli.json),
        Commands::Validate { encoded } => cmd_validate(&config()?, encoded, cli.json),
        Commands::Normalize { encoded } => {
            print_value(cli.json, "normalized", &eip3770::normalize(encoded))
        }
        Commands::Format { input, default_chain } => {
            let formatted = config()?.address_format().auto_format(input, default_chain);
            print_value(cli.json, "formatted", &formatted)
        }
        Commands::Resolve { encoded } => cmd_resolve(config()?, encoded, cli.json).await,
        Commands::Reverse { address, chain } => {
            cmd_reverse(config()?, address, chain.as_deref(), cli.json).await
        }
        Commands::Batch { inputs, file } => {
            cmd_batch(config()?, inputs, file.as_deref(), cli.json).await
        }
        Commands::Chains => cmd_chains(&config()?, cli.json),
        Commands::Selector { signature } => {
            print_value(cli.json, "selector", &format!("0x{}", hex::encode(selector(signature))))
        }
    }
}

fn print_value(json: bool, key: &str, value: &str) -> Result<()> {
    if json {
        println!("{}", serde_json::json!({ key: value }));
    } else {
        println!("{value}");
    }
    Ok(())
}

fn cmd_namehash(name: &str, json: bool) -> Result<()> {
    let lowered = name.to_lowercase();
    if lowered != name {
        tracing::warn!(name, "name is not lower-case; hashing it as given");
    }
    if let Some(first) = name.split('.').next() {
        if let Err(reason) = validate_label(first) {
            tracing::warn!(%reason, "label would not be accepted for registration");
        }
    }
    print_value(json, "namehash", &namehash(name).to_hex())
}

fn cmd_decode(encoded: &str, json: bool) -> Result<()> {
    let Some(decoded) = eip3770::decode(encoded) else {
        bail!("'{encoded}' is not of the form chain:identifier");
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&decoded)?);
    } else {
        println!("Chain:       {}", decoded.chain);
        println!("Identifier:  {}", decoded.identifier);
        println!("Type:        {}", decoded.kind);
    }
    Ok(())
}

fn cmd_validate(config: &NnsConfig, encoded: &str, json: bool) -> Result<()> {
    let format = config.address_format();
    let valid = format.validate(encoded);
    if json {
        println!(
            "{}",
            serde_json::json!({
                "input": encoded,
                "valid": valid,
                "chain_id": format.chain_id_of(encoded),
            })
        );
    } else if valid {
        println!("valid");
    } else {
        println!("invalid");
    }
    if !valid {
        std::process::exit(1);
    }
    Ok(())
}

async fn cmd_resolve(config: NnsConfig, encoded: &str, json: bool) -> Result<()> {
    let input = config.address_format().auto_format(encoded, config.primary_nns_chain());
    let service = NameService::from_config(config).context("building name service")?;
    let resolved = service
        .resolve(&input)
        .await
        .with_context(|| format!("resolving {input}"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&resolved)?);
        return Ok(());
    }
    match resolved {
        Some(r) => {
            println!("Address:  {}", r.address);
            if let Some(domain) = &r.domain {
                println!("Domain:   {domain}");
            }
            println!("Chain:    {}", r.chain);
            println!("Display:  {}", r.format_for_display());
        }
        None => println!("no address record for {input}"),
    }
    Ok(())
}

async fn cmd_reverse(
    config: NnsConfig,
    address: &str,
    chain: Option<&str>,
    json: bool,
) -> Result<()> {
    let service = NameService::from_config(config).context("building name service")?;
    let Some(encoded) = service.reverse_resolve(address, chain).await? else {
        bail!("'{address}' is not an address literal");
    };
    print_value(json, "reverse", &encoded)
}

async fn cmd_batch(
    config: NnsConfig,
    inputs: &[String],
    file: Option<&std::path::Path>,
    json: bool,
) -> Result<()> {
    let mut all: Vec<String> = inputs.to_vec();
    if let Some(path) = file {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        all.extend(
            raw.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && !l.starts_with('#'))
                .map(String::from),
        );
    }
    if all.is_empty() {
        bail!("no inputs given");
    }

    let service = NameService::from_config(config).context("building name service")?;
    let results = service.batch_resolve(&all).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }
    for (input, result) in all.iter().zip(&results) {
        match result {
            Some(r) => println!("{input}  →  {}", r.address),
            None => println!("{input}  →  (none)"),
        }
    }
    Ok(())
}

fn cmd_chains(config: &NnsConfig, json: bool) -> Result<()> {
    let chains = config.chain_table().supported();
    if json {
        println!("{}", serde_json::to_string_pretty(&chains)?);
        return Ok(());
    }
    println!("{:<10} {:>10}", "TOKEN", "CHAIN ID");
    for entry in chains {
        let marker = if config.is_nns_chain(&entry.token) { " *" } else { "" };
        println!("{:<10} {:>10}{marker}", entry.token, entry.chain_id);
    }
    Ok(())
}
