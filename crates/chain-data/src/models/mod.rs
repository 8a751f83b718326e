//! Chain data models
//!
//! One module per data category:
//! - `block` - Latest block, its extended metadata and the subsidy schedule
//! - `mempool` - Pending transaction pool statistics
//! - `fees` - Recommended fee tiers and the projected-block fallback
//! - `difficulty` - Progress toward the next difficulty retarget
//! - `price` - Spot price, 24h change and extended market data

mod block;
mod difficulty;
mod fees;
mod mempool;
mod price;

pub use block::{
    block_subsidy_btc, block_subsidy_sats, fee_span, Block, BlockExtras, HALVING_INTERVAL,
    SATS_PER_BTC,
};
pub use difficulty::Difficulty;
pub use fees::Fees;
pub use mempool::MempoolStats;
pub use price::{PriceDetails, PriceExtreme, PriceQuote, PriceSource};
