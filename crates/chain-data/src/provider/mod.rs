//! Upstream providers and the source abstraction built on them.
//!
//! This module contains:
//! - The `ChainDataSource` trait the aggregator depends on
//! - Upstream hosts and timeouts (`UpstreamConfig`)
//! - One module per upstream (mempool.space, CoinGecko) returning classified
//!   errors, which `UpstreamClient` turns into fallback chains
//!
//! Shared plumbing (`http`, `probe`) is crate-private.

mod config;
mod http;
mod probe;
mod traits;

pub mod coingecko;
pub mod mempool_space;

pub use config::{
    UpstreamConfig, DEFAULT_COINGECKO_URL, DEFAULT_CONNECT_TIMEOUT, DEFAULT_MEMPOOL_URL,
    DEFAULT_REQUEST_TIMEOUT,
};
pub use traits::ChainDataSource;

pub(crate) use config::endpoint;
pub(crate) use http::JsonFetcher;
pub(crate) use probe::{probe_field, probe_pointer};
