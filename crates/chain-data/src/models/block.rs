use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Satoshis in one bitcoin.
pub const SATS_PER_BTC: u64 = 100_000_000;

/// Blocks between two subsidy halvings.
pub const HALVING_INTERVAL: u64 = 210_000;

/// Subsidy of the genesis era, in satoshis.
const INITIAL_SUBSIDY_SATS: u64 = 50 * SATS_PER_BTC;

/// Latest block as reported by the block explorer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Block hash
    pub id: String,
    pub height: u64,
    /// Unix seconds
    pub timestamp: i64,
    pub tx_count: u64,
    /// Serialized size in bytes
    pub size: u64,
    /// Weight units
    pub weight: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extras: Option<BlockExtras>,
}

impl Block {
    /// Time the block was mined, if the timestamp is representable.
    pub fn mined_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.timestamp, 0).single()
    }

    /// Subsidy paid by this block's coinbase, in satoshis.
    pub fn subsidy_sats(&self) -> u64 {
        block_subsidy_sats(self.height)
    }
}

/// Extended block metadata only the v1 block listing carries.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockExtras {
    /// Fee rates (sat/vB) spanned by the block, ascending
    #[serde(default)]
    pub fee_range: Vec<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub median_fee: Option<Decimal>,
    /// Total fees in satoshis
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_fees: Option<u64>,
    /// Subsidy plus fees in satoshis
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reward: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_name: Option<String>,
}

impl BlockExtras {
    /// Formats the fee range as `"min - max"` with one decimal.
    ///
    /// Returns `None` when the block reported no fee range.
    pub fn fee_span(&self) -> Option<String> {
        fee_span(&self.fee_range)
    }
}

/// Formats a fee-range array as `"min - max"` sat/vB, one decimal each.
pub fn fee_span(range: &[Decimal]) -> Option<String> {
    let min = range.iter().min()?;
    let max = range.iter().max()?;
    Some(format!("{} - {}", one_decimal(*min), one_decimal(*max)))
}

fn one_decimal(value: Decimal) -> String {
    format!(
        "{:.1}",
        value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// Block subsidy at `height` in satoshis: 50 BTC halved every 210,000 blocks.
///
/// After 64 halvings the shift would overflow; the subsidy is zero from there on.
pub fn block_subsidy_sats(height: u64) -> u64 {
    let halvings = height / HALVING_INTERVAL;
    if halvings >= 64 {
        return 0;
    }
    INITIAL_SUBSIDY_SATS >> halvings
}

/// Block subsidy at `height` in BTC.
pub fn block_subsidy_btc(height: u64) -> Decimal {
    Decimal::from(block_subsidy_sats(height)) / Decimal::from(SATS_PER_BTC)
}
