//! nns-core: hashing, encoding and address-format primitives for the Nexus
//! Name Service.
//!
//! # Overview
//!
//! Everything here is pure and synchronous; network access lives in
//! `nns-rpc` and the fallback pipeline in `nns-resolver`.
//!
//! - [`namehash`]: recursive domain hashing (EIP-137)
//! - [`address`]: [`Address`] type, literal predicate and EIP-55 checksums
//! - [`call`]: selector/argument encoding and return-data decoding for the
//!   registry and resolver reads
//! - [`eip3770`]: `chain:identifier` encode/decode/validate/normalize
//! - [`chain`]: token ↔ chain-id table
//! - [`config`]: [`NnsConfig`] and built-in network profiles
//! - [`error`]: [`NnsError`]

pub mod address;
pub mod call;
pub mod chain;
pub mod config;
pub mod eip3770;
pub mod error;
pub mod namehash;
pub mod types;

pub use address::{is_address_literal, is_valid_address, to_checksum_address, Address};
pub use call::ResolverCall;
pub use chain::{ChainEntry, ChainTable};
pub use config::{FinalStepPolicy, NnsConfig};
pub use eip3770::{AddressFormat, ChainQualifiedAddress, IdentifierKind};
pub use error::NnsError;
pub use namehash::{labelhash, namehash, Node};
pub use types::ResolvedAddress;
