//! The per-category seam the snapshot aggregator fans out over.

use async_trait::async_trait;

use crate::models::{Block, Difficulty, Fees, MempoolStats, PriceQuote};

/// Source of the five data categories that make up a snapshot.
///
/// Every method is infallible by contract: an implementation absorbs
/// transport, status, decode and timeout failures and reports the category
/// as missing. Callers treat `None` (or an empty [`PriceQuote`]) as a soft
/// failure of that category alone.
///
/// Implementations must be cheap to share: the aggregator holds one behind
/// an `Arc` and calls every method from its own task.
#[async_trait]
pub trait ChainDataSource: Send + Sync {
    /// Newest block, after walking the block fallback chain.
    async fn latest_block(&self) -> Option<Block>;

    async fn mempool_stats(&self) -> Option<MempoolStats>;

    /// Price, 24h change, answering provider and extended market data.
    ///
    /// Fields are absent individually: the price-only fallback supplies no
    /// change, and a total failure yields [`PriceQuote::unavailable`].
    async fn price(&self) -> PriceQuote;

    /// Fee tiers from the recommendation endpoint, or derived from the
    /// projected-block medians when that fails.
    async fn fees(&self) -> Option<Fees>;

    async fn difficulty(&self) -> Option<Difficulty>;
}
