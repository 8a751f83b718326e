use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Projected block index used for the half-hour tier (three blocks out).
const HALF_HOUR_BLOCK: usize = 2;

/// Projected block index used for the hour tier (six blocks out).
const HOUR_BLOCK: usize = 5;

/// Recommended fee rates in sat/vB.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fees {
    pub fastest_fee: Decimal,
    pub half_hour_fee: Decimal,
    pub hour_fee: Decimal,
}

impl Fees {
    /// Derives fee tiers from the median fee of each projected block.
    ///
    /// Index 0 is the next block. The half-hour and hour tiers clamp to the
    /// last projected block when fewer blocks are queued, so short lists make
    /// tiers coincide. Each rate is rounded to one decimal, half away from zero.
    pub fn from_projected_blocks(median_fees: &[Decimal]) -> Option<Self> {
        let last = median_fees.len().checked_sub(1)?;
        Some(Self {
            fastest_fee: round_fee(median_fees[0]),
            half_hour_fee: round_fee(median_fees[HALF_HOUR_BLOCK.min(last)]),
            hour_fee: round_fee(median_fees[HOUR_BLOCK.min(last)]),
        })
    }
}

fn round_fee(fee: Decimal) -> Decimal {
    fee.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}
