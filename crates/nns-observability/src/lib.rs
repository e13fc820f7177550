//! # nns-observability
//!
//! Structured logging for the name-service tools.
//!
//! Library crates only emit `tracing` events; binaries call [`init_tracing`]
//! once at startup. Levels are configurable per component (`nns_resolver`,
//! `nns_rpc`, ...) and output is human-readable text or JSON lines.

pub mod tracing_setup;

pub use tracing_setup::{init_tracing, LogConfig};
