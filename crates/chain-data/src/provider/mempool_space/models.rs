//! mempool.space response models.
//!
//! Block, mempool and difficulty payloads are decoded from generic JSON
//! objects by key probing: the v1 and legacy block listings disagree on which
//! fields exist, the `extras.pool` field has been both a bare name and an
//! object, and time fields arrive as integers or as fractional numbers.

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::models::{Block, BlockExtras, Difficulty, MempoolStats};
use crate::provider::probe_field;

/// Miner pool as reported in block extras.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum MinerPool {
    Name(String),
    Detailed {
        name: Option<String>,
        slug: Option<String>,
    },
}

impl MinerPool {
    fn into_name(self) -> Option<String> {
        let name = match self {
            Self::Name(name) => Some(name),
            Self::Detailed { name, slug } => name.or(slug),
        };
        name.filter(|n| !n.trim().is_empty())
    }
}

/// Decodes one element of a block listing.
///
/// Hash, height and timestamp are required; everything else degrades to a
/// default or `None`.
pub(crate) fn decode_block(object: &Map<String, Value>) -> Option<Block> {
    let id: String = probe_field(object, &["id", "hash"])?;
    let height: u64 = probe_field(object, &["height", "blockHeight"])?;
    let timestamp = probe_whole(object, &["timestamp", "time"])?;

    Some(Block {
        id,
        height,
        timestamp,
        tx_count: probe_field(object, &["tx_count", "txCount", "nTx"]).unwrap_or(0),
        size: probe_field(object, &["size"]).unwrap_or(0),
        weight: probe_field(object, &["weight"]).unwrap_or(0),
        difficulty: probe_field(object, &["difficulty"]),
        extras: object
            .get("extras")
            .and_then(Value::as_object)
            .map(decode_extras),
    })
}

fn decode_extras(object: &Map<String, Value>) -> BlockExtras {
    BlockExtras {
        fee_range: probe_field(object, &["feeRange", "fee_range"]).unwrap_or_default(),
        median_fee: probe_field(object, &["medianFee", "median_fee"]),
        total_fees: probe_field(object, &["totalFees", "total_fees"]),
        reward: probe_field(object, &["reward"]),
        pool_name: probe_field::<MinerPool>(object, &["pool", "miner", "minerPool"])
            .and_then(MinerPool::into_name),
    }
}

/// Decodes `/api/mempool`. Count and vsize are required.
pub(crate) fn decode_mempool(object: &Map<String, Value>) -> Option<MempoolStats> {
    Some(MempoolStats {
        count: probe_field(object, &["count", "tx_count"])?,
        vsize: probe_field(object, &["vsize", "vSize"])?,
        total_fee: probe_field(object, &["total_fee", "totalFee"]),
    })
}

/// `/api/v1/fees/recommended`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RecommendedFeesResponse {
    pub fastest_fee: Option<Decimal>,
    pub half_hour_fee: Option<Decimal>,
    pub hour_fee: Option<Decimal>,
    // Note: economyFee and minimumFee exist but are not part of the tiers
}

/// One element of `/api/v1/fees/mempool-blocks`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProjectedBlock {
    pub median_fee: Decimal,
}

/// Decodes `/api/v1/difficulty-adjustment`.
///
/// Each field is probed on its own, so one field of an unexpected type only
/// drops that field.
pub(crate) fn decode_difficulty(object: &Map<String, Value>) -> Difficulty {
    Difficulty {
        progress_percent: probe_field(object, &["progressPercent"]),
        remaining_blocks: probe_whole(object, &["remainingBlocks"])
            .and_then(|n| u64::try_from(n).ok()),
        estimated_retarget_date: probe_field(object, &["estimatedRetargetDate"]),
        estimated_difficulty_delta: probe_field(
            object,
            &["difficultyChange", "estimatedDifficultyDelta"],
        ),
        average_block_time: probe_field(object, &["timeAvg", "averageBlockTime"]),
        next_retarget_height: probe_whole(object, &["nextRetargetHeight"])
            .and_then(|n| u64::try_from(n).ok()),
        remaining_time: probe_field(object, &["remainingTime"]),
    }
}

/// Probes an integer field that may also arrive as a fractional number,
/// truncating toward zero.
fn probe_whole(object: &Map<String, Value>, candidates: &[&str]) -> Option<i64> {
    probe_field::<i64>(object, candidates).or_else(|| {
        probe_field::<f64>(object, candidates)
            .filter(|n| n.is_finite() && n.abs() < i64::MAX as f64)
            .map(|n| n.trunc() as i64)
    })
}

/// `/api/v1/prices`
#[derive(Debug, Deserialize)]
pub(crate) struct PricesResponse {
    #[serde(rename = "USD")]
    pub usd: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_decode_v1_block_with_extras() {
        let value = json!({
            "id": "0000000000000000000212a3c0a8bb1e2b3c",
            "height": 840000,
            "version": 536870912,
            "timestamp": 1713571767,
            "tx_count": 3050,
            "size": 2325617,
            "weight": 3993281,
            "difficulty": 86388558925171.02,
            "extras": {
                "medianFee": 1.5,
                "feeRange": [1, 2.01, 5, 300],
                "totalFees": 3757170,
                "reward": 316257170,
                "pool": {"id": 44, "name": "ViaBTC", "slug": "viabtc"}
            }
        });
        let block = decode_block(value.as_object().unwrap()).unwrap();
        assert_eq!(block.height, 840_000);
        assert_eq!(block.tx_count, 3050);
        assert_eq!(block.weight, 3_993_281);
        let extras = block.extras.unwrap();
        assert_eq!(extras.median_fee, Some(dec!(1.5)));
        assert_eq!(extras.fee_range.len(), 4);
        assert_eq!(extras.total_fees, Some(3_757_170));
        assert_eq!(extras.reward, Some(316_257_170));
        assert_eq!(extras.pool_name.as_deref(), Some("ViaBTC"));
    }

    #[test]
    fn test_decode_pool_as_bare_string() {
        let value = json!({
            "id": "abc", "height": 1, "timestamp": 2,
            "extras": {"pool": "Foundry USA"}
        });
        let block = decode_block(value.as_object().unwrap()).unwrap();
        assert_eq!(
            block.extras.unwrap().pool_name.as_deref(),
            Some("Foundry USA")
        );
    }

    #[test]
    fn test_decode_pool_slug_when_name_missing() {
        let value = json!({
            "id": "abc", "height": 1, "timestamp": 2,
            "extras": {"pool": {"slug": "antpool"}}
        });
        let block = decode_block(value.as_object().unwrap()).unwrap();
        assert_eq!(block.extras.unwrap().pool_name.as_deref(), Some("antpool"));
    }

    #[test]
    fn test_decode_legacy_block_without_extras() {
        let value = json!({
            "id": "abc", "height": 5, "timestamp": 1700000000,
            "tx_count": 10, "size": 1000, "weight": 4000
        });
        let block = decode_block(value.as_object().unwrap()).unwrap();
        assert!(block.extras.is_none());
        assert!(block.difficulty.is_none());
    }

    #[test]
    fn test_decode_block_requires_height() {
        let value = json!({"id": "abc", "timestamp": 2});
        assert!(decode_block(value.as_object().unwrap()).is_none());
    }

    #[test]
    fn test_decode_mempool() {
        let value = json!({"count": 51234, "vsize": 23456789, "total_fee": 12345678, "fee_histogram": []});
        let stats = decode_mempool(value.as_object().unwrap()).unwrap();
        assert_eq!(stats.count, 51_234);
        assert_eq!(stats.vsize, 23_456_789);
        assert_eq!(stats.total_fee, Some(12_345_678));
    }

    #[test]
    fn test_decode_difficulty_maps_renamed_fields() {
        let value = json!({
            "progressPercent": 44.4,
            "difficultyChange": -1.9,
            "estimatedRetargetDate": 1713960000000u64,
            "remainingBlocks": 1121,
            "remainingTime": 660000000,
            "nextRetargetHeight": 842688,
            "timeAvg": 588000
        });
        let difficulty = decode_difficulty(value.as_object().unwrap());
        assert_eq!(difficulty.estimated_difficulty_delta, Some(-1.9));
        assert_eq!(difficulty.average_block_time, Some(588000.0));
        assert_eq!(difficulty.remaining_blocks, Some(1121));
        assert_eq!(difficulty.estimated_retarget_date, Some(1713960000000.0));
        assert_eq!(difficulty.remaining_time, Some(660000000.0));
    }

    #[test]
    fn test_decode_difficulty_fractional_times() {
        let value = json!({
            "progressPercent": 44.397234501112074,
            "difficultyChange": 98.45932018381687,
            "estimatedRetargetDate": 1627762478.9111245,
            "remainingBlocks": 1121,
            "remainingTime": 665977.6261244365,
            "previousRetarget": -4.807005268478962,
            "nextRetargetHeight": 741888,
            "timeAvg": 302328.48322147654,
            "timeOffset": 0
        });
        let difficulty = decode_difficulty(value.as_object().unwrap());
        assert_eq!(difficulty.estimated_retarget_date, Some(1627762478.9111245));
        assert_eq!(difficulty.remaining_time, Some(665977.6261244365));
        assert_eq!(difficulty.remaining_blocks, Some(1121));
        assert_eq!(difficulty.next_retarget_height, Some(741888));
    }

    #[test]
    fn test_decode_difficulty_bad_field_drops_only_that_field() {
        let value = json!({
            "progressPercent": "forty",
            "remainingBlocks": 1121.0,
            "timeAvg": 588000
        });
        let difficulty = decode_difficulty(value.as_object().unwrap());
        assert_eq!(difficulty.progress_percent, None);
        assert_eq!(difficulty.remaining_blocks, Some(1121));
        assert_eq!(difficulty.average_block_time, Some(588000.0));
    }

    #[test]
    fn test_decode_block_fractional_timestamp() {
        let value = json!({
            "id": "00000000000000000001",
            "height": 840001,
            "timestamp": 1713572500.75
        });
        let block = decode_block(value.as_object().unwrap()).unwrap();
        assert_eq!(block.timestamp, 1713572500);
    }

    #[test]
    fn test_prices_response() {
        let response: PricesResponse =
            serde_json::from_str(r#"{"time": 1713571767, "USD": 64250, "EUR": 60100}"#).unwrap();
        assert_eq!(response.usd, Some(dec!(64250)));
    }
}
