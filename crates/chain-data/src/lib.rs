//! BlockBar Chain Data Crate
//!
//! Fetches Bitcoin network and market data from public, unauthenticated
//! HTTP APIs and reports each data category as present or absent.
//!
//! # Overview
//!
//! ```text
//! +------------------+
//! |  ChainDataSource |  (trait the aggregator fans out over)
//! +------------------+
//!          |
//!          v
//! +------------------+     ordered fallback chains,
//! |  UpstreamClient  |     errors flattened to None
//! +------------------+
//!          |
//!          v
//! +----------------------+  +--------------------+
//! | MempoolSpaceProvider |  | CoinGeckoProvider  |  (classified errors)
//! +----------------------+  +--------------------+
//! ```
//!
//! # Core Types
//!
//! - [`Block`], [`MempoolStats`], [`Fees`], [`Difficulty`], [`PriceQuote`] -
//!   one model per category
//! - [`ChainDataError`] - why a single upstream call failed
//! - [`UpstreamConfig`] - hosts and timeouts

pub mod client;
pub mod errors;
pub mod models;
pub mod provider;

pub use client::UpstreamClient;
pub use errors::ChainDataError;
pub use models::{
    block_subsidy_btc, block_subsidy_sats, fee_span, Block, BlockExtras, Difficulty, Fees,
    MempoolStats, PriceDetails, PriceExtreme, PriceQuote, PriceSource, HALVING_INTERVAL,
    SATS_PER_BTC,
};
pub use provider::{ChainDataSource, UpstreamConfig};
