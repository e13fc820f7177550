//! nns-resolver: forward, reverse and batch resolution for the Nexus Name
//! Service.
//!
//! [`NameService`] is the entry point: it decodes `chain:identifier` strings,
//! returns address identifiers as-is and runs domains through the
//! [`Resolver`] fallback pipeline over an `nns_rpc::RpcClient`.
//!
//! ```no_run
//! # async fn demo() -> Result<(), nns_core::NnsError> {
//! use nns_core::NnsConfig;
//! use nns_resolver::NameService;
//!
//! let service = NameService::from_config(NnsConfig::nexus_testnet())?;
//! if let Some(resolved) = service.resolve("nex:alice.nex").await? {
//!     println!("{}", resolved.address);
//! }
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod cache;
pub mod resolver;
pub mod service;

pub use batch::resolve_ordered;
pub use cache::ResolutionCache;
pub use resolver::{ResolutionStage, Resolver};
pub use service::NameService;
