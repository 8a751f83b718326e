//! Parallel fetch of the five data categories into one [`Snapshot`].

use std::sync::{Arc, Mutex, MutexGuard};

use blockbar_chain_data::{Block, ChainDataSource, Difficulty, Fees, MempoolStats, PriceQuote};
use chrono::Utc;
use log::{debug, warn};
use rust_decimal::Decimal;
use tokio::task::JoinSet;

use super::Snapshot;

/// How long a remembered 24h change may stand in for a missing one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CarryForwardPolicy {
    /// Consecutive injecting cycles after which the remembered value is
    /// dropped. `None` carries it for the aggregator's lifetime.
    pub max_cycles: Option<u32>,
}

impl CarryForwardPolicy {
    pub fn unlimited() -> Self {
        Self { max_cycles: None }
    }

    pub fn expire_after(cycles: u32) -> Self {
        Self {
            max_cycles: Some(cycles),
        }
    }
}

#[derive(Debug, Default)]
struct CarriedChange {
    value: Option<Decimal>,
    /// Consecutive cycles that used `value` instead of a fresh change
    injections: u32,
}

/// Outcome of one spawned category fetch.
enum Category {
    Block(Option<Block>),
    Mempool(Option<MempoolStats>),
    Price(PriceQuote),
    Fees(Option<Fees>),
    Difficulty(Option<Difficulty>),
}

/// Builds snapshots by querying every category concurrently.
pub struct SnapshotAggregator {
    source: Arc<dyn ChainDataSource>,
    policy: CarryForwardPolicy,
    carried: Mutex<CarriedChange>,
}

impl SnapshotAggregator {
    pub fn new(source: Arc<dyn ChainDataSource>) -> Self {
        Self::with_policy(source, CarryForwardPolicy::default())
    }

    pub fn with_policy(source: Arc<dyn ChainDataSource>, policy: CarryForwardPolicy) -> Self {
        Self {
            source,
            policy,
            carried: Mutex::new(CarriedChange::default()),
        }
    }

    /// The 24h change currently remembered for carry-forward.
    pub fn remembered_change(&self) -> Option<Decimal> {
        self.lock_carried().value
    }

    fn lock_carried(&self) -> MutexGuard<'_, CarriedChange> {
        self.carried.lock().unwrap_or_else(|poisoned| {
            warn!("Carry-forward mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Runs one fetch cycle.
    ///
    /// All five categories are spawned on a [`JoinSet`] and awaited together.
    /// A branch that panics reports its category as absent. Dropping the
    /// returned future aborts every branch still running.
    pub async fn fetch_snapshot(&self) -> Snapshot {
        let mut snapshot = Snapshot::empty(Utc::now());
        let mut tasks = JoinSet::new();

        let source = Arc::clone(&self.source);
        tasks.spawn(async move { Category::Block(source.latest_block().await) });
        let source = Arc::clone(&self.source);
        tasks.spawn(async move { Category::Mempool(source.mempool_stats().await) });
        let source = Arc::clone(&self.source);
        tasks.spawn(async move { Category::Price(source.price().await) });
        let source = Arc::clone(&self.source);
        tasks.spawn(async move { Category::Fees(source.fees().await) });
        let source = Arc::clone(&self.source);
        tasks.spawn(async move { Category::Difficulty(source.difficulty().await) });

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Category::Block(block)) => snapshot.block = block,
                Ok(Category::Mempool(mempool)) => snapshot.mempool = mempool,
                Ok(Category::Price(quote)) => {
                    snapshot.price_usd = quote.price_usd;
                    snapshot.price_change_24h = quote.change_24h;
                    snapshot.price_source = quote.source;
                    snapshot.price_details = quote.details;
                }
                Ok(Category::Fees(fees)) => snapshot.fees = fees,
                Ok(Category::Difficulty(difficulty)) => snapshot.difficulty = difficulty,
                Err(e) => warn!("Category fetch did not complete: {}", e),
            }
        }

        self.apply_carry_forward(&mut snapshot);
        snapshot
    }

    /// Remembers a fresh 24h change, or fills a missing one from memory.
    ///
    /// Unusable snapshots are discarded by the caller, so they neither
    /// remember nor consume a carried value.
    fn apply_carry_forward(&self, snapshot: &mut Snapshot) {
        if !snapshot.has_data() {
            return;
        }

        let mut carried = self.lock_carried();
        if let Some(change) = snapshot.price_change_24h {
            carried.value = Some(change);
            carried.injections = 0;
            return;
        }

        let Some(value) = carried.value else {
            return;
        };
        if let Some(max) = self.policy.max_cycles {
            if carried.injections >= max {
                debug!(
                    "Carried 24h change expired after {} cycles",
                    carried.injections
                );
                *carried = CarriedChange::default();
                return;
            }
        }

        carried.injections += 1;
        snapshot.price_change_24h = Some(value);
    }
}
