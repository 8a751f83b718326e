//! mempool.space provider.
//!
//! Serves blocks, mempool statistics, fee estimates, difficulty progress and
//! a price-only USD quote:
//! - `/api/v1/blocks` (with `extras`) and the legacy `/api/blocks`
//! - `/api/mempool`
//! - `/api/v1/fees/recommended` and `/api/v1/fees/mempool-blocks`
//! - `/api/v1/difficulty-adjustment`
//! - `/api/v1/prices`
//!
//! API documentation: https://mempool.space/docs/api/rest

mod models;

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::ChainDataError;
use crate::models::{Block, Difficulty, Fees, MempoolStats};
use crate::provider::{endpoint, JsonFetcher, UpstreamConfig};

use models::{
    decode_block, decode_difficulty, decode_mempool, PricesResponse, ProjectedBlock,
    RecommendedFeesResponse,
};

pub const PROVIDER_ID: &str = "MEMPOOL_SPACE";

/// Block listing variant to query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockListing {
    /// `/api/v1/blocks`, carries fee and pool extras
    V1,
    /// `/api/blocks`, plain block headers
    Legacy,
}

impl BlockListing {
    fn path(&self) -> &'static str {
        match self {
            Self::V1 => "/api/v1/blocks",
            Self::Legacy => "/api/blocks",
        }
    }
}

/// mempool.space API client.
#[derive(Clone)]
pub struct MempoolSpaceProvider {
    http: JsonFetcher,
    base_url: String,
}

impl MempoolSpaceProvider {
    pub fn new(config: &UpstreamConfig) -> Self {
        Self {
            http: JsonFetcher::new(config),
            base_url: config.mempool_base_url.clone(),
        }
    }

    /// Newest block from the given listing (newest-first array, element 0).
    pub async fn latest_block(&self, listing: BlockListing) -> Result<Block, ChainDataError> {
        let url = endpoint(&self.base_url, listing.path());
        let blocks: Vec<Value> = self.http.get_json(PROVIDER_ID, &url, &[]).await?;

        let newest = blocks
            .first()
            .and_then(Value::as_object)
            .ok_or_else(|| empty(PROVIDER_ID, "blocks"))?;

        let block = decode_block(newest).ok_or_else(|| empty(PROVIDER_ID, "block hash/height"))?;
        debug!("{} {:?} listing: block {}", PROVIDER_ID, listing, block.height);
        Ok(block)
    }

    pub async fn mempool_stats(&self) -> Result<MempoolStats, ChainDataError> {
        let url = endpoint(&self.base_url, "/api/mempool");
        let object: Map<String, Value> = self.http.get_json(PROVIDER_ID, &url, &[]).await?;
        decode_mempool(&object).ok_or_else(|| empty(PROVIDER_ID, "mempool count/vsize"))
    }

    /// Fee tiers from the recommendation endpoint.
    pub async fn recommended_fees(&self) -> Result<Fees, ChainDataError> {
        let url = endpoint(&self.base_url, "/api/v1/fees/recommended");
        let response: RecommendedFeesResponse =
            self.http.get_json(PROVIDER_ID, &url, &[]).await?;

        match (
            response.fastest_fee,
            response.half_hour_fee,
            response.hour_fee,
        ) {
            (Some(fastest_fee), Some(half_hour_fee), Some(hour_fee)) => Ok(Fees {
                fastest_fee,
                half_hour_fee,
                hour_fee,
            }),
            _ => Err(empty(PROVIDER_ID, "recommended fee tiers")),
        }
    }

    /// Fee tiers derived from the projected mempool blocks.
    pub async fn projected_block_fees(&self) -> Result<Fees, ChainDataError> {
        let url = endpoint(&self.base_url, "/api/v1/fees/mempool-blocks");
        let blocks: Vec<ProjectedBlock> = self.http.get_json(PROVIDER_ID, &url, &[]).await?;

        let medians: Vec<Decimal> = blocks.into_iter().map(|b| b.median_fee).collect();
        Fees::from_projected_blocks(&medians).ok_or_else(|| empty(PROVIDER_ID, "mempool blocks"))
    }

    pub async fn difficulty_adjustment(&self) -> Result<Difficulty, ChainDataError> {
        let url = endpoint(&self.base_url, "/api/v1/difficulty-adjustment");
        let object: Map<String, Value> = self.http.get_json(PROVIDER_ID, &url, &[]).await?;

        let difficulty = decode_difficulty(&object);
        if difficulty.is_empty() {
            return Err(empty(PROVIDER_ID, "difficulty adjustment"));
        }
        Ok(difficulty)
    }

    /// Spot USD price. The endpoint carries no change data.
    pub async fn usd_price(&self) -> Result<Decimal, ChainDataError> {
        let url = endpoint(&self.base_url, "/api/v1/prices");
        let response: PricesResponse = self.http.get_json(PROVIDER_ID, &url, &[]).await?;
        response.usd.ok_or_else(|| empty(PROVIDER_ID, "usd price"))
    }
}

fn empty(provider: &str, what: &'static str) -> ChainDataError {
    ChainDataError::EmptyResponse {
        provider: provider.to_string(),
        what,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_id() {
        assert_eq!(PROVIDER_ID, "MEMPOOL_SPACE");
    }

    #[test]
    fn test_block_listing_paths() {
        assert_eq!(BlockListing::V1.path(), "/api/v1/blocks");
        assert_eq!(BlockListing::Legacy.path(), "/api/blocks");
    }
}
