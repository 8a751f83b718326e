//! Snapshot model and the fetch cycle that produces it.
//!
//! - [`Snapshot`] - immutable result of one fetch cycle
//! - [`SnapshotAggregator`] - fans the five category fetches out in parallel
//! - [`fetch_with_retry`] - retries unusable cycles on a fixed schedule

mod aggregator;
mod retry;

pub use aggregator::{CarryForwardPolicy, SnapshotAggregator};
pub use retry::{fetch_with_retry, RetryPolicy};

use blockbar_chain_data::{
    block_subsidy_btc, Block, Difficulty, Fees, MempoolStats, PriceDetails, PriceSource,
    SATS_PER_BTC,
};
use chrono::{DateTime, Utc};
use num_traits::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Aggregated view of the Bitcoin network and market at one point in time.
///
/// Every category is optional; a snapshot with at least one category present
/// is usable (see [`Snapshot::has_data`]).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub block: Option<Block>,
    pub mempool: Option<MempoolStats>,
    pub price_usd: Option<Decimal>,
    /// Percent, possibly carried forward from an earlier cycle
    pub price_change_24h: Option<Decimal>,
    pub price_source: Option<PriceSource>,
    pub price_details: Option<PriceDetails>,
    pub fees: Option<Fees>,
    pub difficulty: Option<Difficulty>,
    /// Start of the fetch cycle that produced this snapshot
    pub fetched_at: DateTime<Utc>,
}

impl Snapshot {
    /// A snapshot with every category absent.
    pub fn empty(fetched_at: DateTime<Utc>) -> Self {
        Self {
            block: None,
            mempool: None,
            price_usd: None,
            price_change_24h: None,
            price_source: None,
            price_details: None,
            fees: None,
            difficulty: None,
            fetched_at,
        }
    }

    /// Whether any primary category is present.
    ///
    /// The 24h change, price source and price details never count on their
    /// own: they only accompany a price.
    pub fn has_data(&self) -> bool {
        self.block.is_some()
            || self.mempool.is_some()
            || self.price_usd.is_some()
            || self.fees.is_some()
            || self.difficulty.is_some()
    }

    /// Satoshis one US dollar buys, rounded half away from zero.
    pub fn sats_per_dollar(&self) -> Option<u64> {
        let price = self.price_usd.filter(|p| p.is_sign_positive() && !p.is_zero())?;
        Decimal::from(SATS_PER_BTC)
            .checked_div(price)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u64()
    }

    /// Subsidy of the latest block, in BTC.
    pub fn block_subsidy_btc(&self) -> Option<Decimal> {
        self.block.as_ref().map(|b| block_subsidy_btc(b.height))
    }
}
