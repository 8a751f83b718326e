//! HTTP implementation of [`ChainDataSource`].
//!
//! Each category walks an ordered fallback chain and takes the first step
//! that succeeds:
//!
//! | Category   | Chain                                                            |
//! |------------|------------------------------------------------------------------|
//! | block      | mempool v1 listing → mempool legacy listing                      |
//! | mempool    | mempool stats                                                    |
//! | price      | CoinGecko market → CoinGecko simple price → mempool price (no change) |
//! | fees       | recommended tiers → derived from projected blocks                |
//! | difficulty | difficulty adjustment                                            |
//!
//! Errors never leave this module; they are logged and the category reports
//! absence.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::errors::ChainDataError;
use crate::models::{Block, Difficulty, Fees, MempoolStats, PriceQuote, PriceSource};
use crate::provider::coingecko::CoinGeckoProvider;
use crate::provider::mempool_space::{BlockListing, MempoolSpaceProvider};
use crate::provider::{ChainDataSource, UpstreamConfig};

/// Upstream client over mempool.space and CoinGecko.
#[derive(Clone)]
pub struct UpstreamClient {
    mempool: MempoolSpaceProvider,
    coingecko: CoinGeckoProvider,
}

impl UpstreamClient {
    pub fn new(config: UpstreamConfig) -> Self {
        Self {
            mempool: MempoolSpaceProvider::new(&config),
            coingecko: CoinGeckoProvider::new(&config),
        }
    }
}

impl Default for UpstreamClient {
    fn default() -> Self {
        Self::new(UpstreamConfig::default())
    }
}

/// Logs a failed step that still has a fallback after it.
fn step_failed(category: &str, step: &str, error: &ChainDataError) {
    if error.is_transient() {
        debug!("{} via {} failed ({}), falling back", category, step, error);
    } else {
        // Shape problems keep failing until the decoder is updated.
        warn!("{} via {} failed ({}), falling back", category, step, error);
    }
}

/// Converts the result of the last step of a chain into presence/absence.
fn settle<T>(category: &str, result: Result<T, ChainDataError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("{} unavailable: {}", category, e);
            None
        }
    }
}

#[async_trait]
impl ChainDataSource for UpstreamClient {
    async fn latest_block(&self) -> Option<Block> {
        match self.mempool.latest_block(BlockListing::V1).await {
            Ok(block) => Some(block),
            Err(e) => {
                step_failed("block", "v1 listing", &e);
                settle(
                    "block",
                    self.mempool.latest_block(BlockListing::Legacy).await,
                )
            }
        }
    }

    async fn mempool_stats(&self) -> Option<MempoolStats> {
        settle("mempool", self.mempool.mempool_stats().await)
    }

    async fn price(&self) -> PriceQuote {
        match self.coingecko.market_quote().await {
            Ok(quote) => return quote,
            Err(e) => step_failed("price", "CoinGecko market", &e),
        }

        match self.coingecko.simple_quote().await {
            Ok(quote) => return quote,
            Err(e) => step_failed("price", "CoinGecko simple price", &e),
        }

        settle("price", self.mempool.usd_price().await)
            .map(|usd| PriceQuote::price_only(usd, PriceSource::Mempool))
            .unwrap_or_else(PriceQuote::unavailable)
    }

    async fn fees(&self) -> Option<Fees> {
        match self.mempool.recommended_fees().await {
            Ok(fees) => Some(fees),
            Err(e) => {
                step_failed("fees", "recommended", &e);
                settle("fees", self.mempool.projected_block_fees().await)
            }
        }
    }

    async fn difficulty(&self) -> Option<Difficulty> {
        settle("difficulty", self.mempool.difficulty_adjustment().await)
    }
}
