//! cassmon-core: Cassandra JMX metrics collection library.
//!
//! Provides:
//! - `catalog`: compiled-in metric definitions (what to query, how to name it)
//! - `filter`: include/exclude filtering of the catalog
//! - `object_name`: JMX object name parsing and canonicalisation
//! - `source`: attribute source abstraction (Jolokia bridge, scripted mock)
//! - `query`: query execution over flat and per-table catalogs
//! - `populate`: raw value to typed sample mapping
//! - `sample`: typed metric sets and the rate/delta value store
//! - `collector`: one collection cycle end to end
//! - `inventory`: cassandra.yaml flattening
//! - `integration`: host agent JSON payload

pub mod catalog;
pub mod collector;
pub mod filter;
pub mod integration;
pub mod inventory;
pub mod object_name;
pub mod populate;
pub mod query;
pub mod sample;
pub mod source;

/// Crate version, shared by the binary for `--version` and the payload.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Short git SHA of the build, `unknown` outside a checkout.
pub const GIT_SHA: &str = env!("GIT_SHA");

/// Target triple the binary was built for.
pub const BUILD_TARGET: &str = env!("BUILD_TARGET");
