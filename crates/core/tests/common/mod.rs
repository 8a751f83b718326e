//! Shared fakes for the store and snapshot tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use blockbar_chain_data::{
    Block, ChainDataSource, Difficulty, Fees, MempoolStats, PriceQuote, PriceSource,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// In-memory [`ChainDataSource`] whose health can be flipped mid-test.
///
/// Every category answers after `latency`. A fetch cycle is counted each
/// time the block category is queried.
pub struct FakeSource {
    healthy: AtomicBool,
    change_24h: Mutex<Option<Decimal>>,
    latency: Duration,
    cycles: AtomicUsize,
}

impl FakeSource {
    pub fn healthy() -> Self {
        Self {
            healthy: AtomicBool::new(true),
            change_24h: Mutex::new(Some(dec!(2.5))),
            latency: Duration::ZERO,
            cycles: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        let source = Self::healthy();
        source.set_healthy(false);
        source
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    pub fn set_change(&self, change: Option<Decimal>) {
        *self.change_24h.lock().unwrap() = change;
    }

    pub fn cycles(&self) -> usize {
        self.cycles.load(Ordering::SeqCst)
    }

    async fn answer<T>(&self, value: impl FnOnce() -> T) -> Option<T> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.healthy.load(Ordering::SeqCst).then(value)
    }
}

pub fn sample_block() -> Block {
    Block {
        id: "0000000000000000000200d3b7e5a5f3a3c1f2d8e4b6a7c9d0e1f2a3b4c5d6e7".to_string(),
        height: 850_000,
        timestamp: 1_718_000_000,
        tx_count: 4_210,
        size: 1_650_000,
        weight: 3_993_000,
        difficulty: Some(83_148_355_189_239.77),
        extras: None,
    }
}

#[async_trait]
impl ChainDataSource for FakeSource {
    async fn latest_block(&self) -> Option<Block> {
        self.cycles.fetch_add(1, Ordering::SeqCst);
        self.answer(sample_block).await
    }

    async fn mempool_stats(&self) -> Option<MempoolStats> {
        self.answer(|| MempoolStats {
            count: 42_000,
            vsize: 31_000_000,
            total_fee: Some(95_000_000),
        })
        .await
    }

    async fn price(&self) -> PriceQuote {
        let change = *self.change_24h.lock().unwrap();
        self.answer(|| PriceQuote {
            price_usd: Some(dec!(65000)),
            change_24h: change,
            source: Some(PriceSource::CoinGecko),
            details: None,
        })
        .await
        .unwrap_or_else(PriceQuote::unavailable)
    }

    async fn fees(&self) -> Option<Fees> {
        self.answer(|| Fees {
            fastest_fee: dec!(12),
            half_hour_fee: dec!(8),
            hour_fee: dec!(5),
        })
        .await
    }

    async fn difficulty(&self) -> Option<Difficulty> {
        self.answer(|| Difficulty {
            progress_percent: Some(42.5),
            remaining_blocks: Some(1_159),
            ..Default::default()
        })
        .await
    }
}
