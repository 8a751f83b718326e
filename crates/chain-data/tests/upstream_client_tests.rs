//! Fallback-chain tests for `UpstreamClient` against a local mock server.
//!
//! Unmatched requests get a 404 from the mock server, so a test only mounts
//! the endpoints that should answer.

use std::time::Duration;

use blockbar_chain_data::{ChainDataSource, PriceSource, UpstreamClient, UpstreamConfig};
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_json(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

fn client_for(server: &MockServer) -> UpstreamClient {
    UpstreamClient::new(UpstreamConfig::with_base_url(&server.uri()))
}

fn block_json(height: u64, with_extras: bool) -> Value {
    let mut block = json!({
        "id": format!("{:064x}", height),
        "height": height,
        "timestamp": 1_713_571_767,
        "tx_count": 3050,
        "size": 2_325_617,
        "weight": 3_993_281
    });
    if with_extras {
        block["extras"] = json!({
            "medianFee": 12.5,
            "feeRange": [1.0, 8.0, 250.4],
            "totalFees": 3_757_170,
            "reward": 316_257_170,
            "pool": {"id": 111, "name": "Foundry USA", "slug": "foundryusa"}
        });
    }
    block
}

#[tokio::test]
async fn test_block_from_v1_listing_carries_extras() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/api/v1/blocks",
        json!([block_json(840_001, true), block_json(840_000, true)]),
    )
    .await;

    let block = client_for(&server).latest_block().await.unwrap();
    assert_eq!(block.height, 840_001);
    let extras = block.extras.unwrap();
    assert_eq!(extras.pool_name.as_deref(), Some("Foundry USA"));
    assert_eq!(extras.fee_span().as_deref(), Some("1.0 - 250.4"));
}

#[tokio::test]
async fn test_block_falls_back_to_legacy_listing() {
    let server = MockServer::start().await;
    mount_status(&server, "/api/v1/blocks", 502).await;
    mount_json(&server, "/api/blocks", json!([block_json(840_002, false)])).await;

    let block = client_for(&server).latest_block().await.unwrap();
    assert_eq!(block.height, 840_002);
    assert!(block.extras.is_none());
}

#[tokio::test]
async fn test_block_absent_when_listing_empty() {
    let server = MockServer::start().await;
    mount_json(&server, "/api/v1/blocks", json!([])).await;
    mount_json(&server, "/api/blocks", json!([])).await;

    assert!(client_for(&server).latest_block().await.is_none());
}

#[tokio::test]
async fn test_mempool_stats() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/api/mempool",
        json!({"count": 42_000, "vsize": 18_000_000, "total_fee": 9_000_000}),
    )
    .await;

    let stats = client_for(&server).mempool_stats().await.unwrap();
    assert_eq!(stats.count, 42_000);
    assert_eq!(stats.vsize, 18_000_000);
}

#[tokio::test]
async fn test_mempool_stats_absent_on_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/mempool"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    assert!(client_for(&server).mempool_stats().await.is_none());
}

#[tokio::test]
async fn test_price_from_market_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/coins/bitcoin"))
        .and(query_param("sparkline", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "market_data": {
                "current_price": {"usd": 64_000},
                "price_change_percentage_24h": -2.5,
                "price_change_percentage_7d": 4.0,
                "sparkline_7d": {"price": [63_000, 64_000]}
            }
        })))
        .mount(&server)
        .await;

    let quote = client_for(&server).price().await;
    assert_eq!(quote.price_usd, Some(dec!(64000)));
    assert_eq!(quote.change_24h, Some(dec!(-2.5)));
    assert_eq!(quote.source, Some(PriceSource::CoinGecko));
    let details = quote.details.unwrap();
    assert_eq!(details.change_7d, Some(dec!(4)));
    assert_eq!(details.sparkline_7d.len(), 2);
}

#[tokio::test]
async fn test_price_falls_back_to_simple_price() {
    let server = MockServer::start().await;
    mount_status(&server, "/api/v3/coins/bitcoin", 429).await;
    Mock::given(method("GET"))
        .and(path("/api/v3/simple/price"))
        .and(query_param("include_24hr_change", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "bitcoin": {"usd": 63_500, "usd_24h_change": 1.75}
        })))
        .mount(&server)
        .await;

    let quote = client_for(&server).price().await;
    assert_eq!(quote.price_usd, Some(dec!(63500)));
    assert_eq!(quote.change_24h, Some(dec!(1.75)));
    assert_eq!(quote.source, Some(PriceSource::CoinGecko));
    assert!(quote.details.is_none());
}

#[tokio::test]
async fn test_price_falls_back_to_mempool_without_change() {
    let server = MockServer::start().await;
    mount_status(&server, "/api/v3/coins/bitcoin", 500).await;
    mount_status(&server, "/api/v3/simple/price", 500).await;
    mount_json(&server, "/api/v1/prices", json!({"time": 1, "USD": 62_000, "EUR": 58_000})).await;

    let quote = client_for(&server).price().await;
    assert_eq!(quote.price_usd, Some(dec!(62000)));
    assert!(quote.change_24h.is_none());
    assert_eq!(quote.source, Some(PriceSource::Mempool));
}

#[tokio::test]
async fn test_price_unavailable_when_every_provider_fails() {
    let server = MockServer::start().await;

    let quote = client_for(&server).price().await;
    assert!(quote.price_usd.is_none());
    assert!(quote.source.is_none());
}

#[tokio::test]
async fn test_recommended_fees() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/api/v1/fees/recommended",
        json!({"fastestFee": 21, "halfHourFee": 15, "hourFee": 9, "economyFee": 4, "minimumFee": 1}),
    )
    .await;

    let fees = client_for(&server).fees().await.unwrap();
    assert_eq!(fees.fastest_fee, dec!(21));
    assert_eq!(fees.half_hour_fee, dec!(15));
    assert_eq!(fees.hour_fee, dec!(9));
}

#[tokio::test]
async fn test_fees_derived_from_projected_blocks() {
    let server = MockServer::start().await;
    mount_status(&server, "/api/v1/fees/recommended", 503).await;
    let medians = [30.04, 20.0, 14.25, 11.0, 9.0, 7.35, 5.0, 3.0];
    let blocks: Vec<Value> = medians
        .iter()
        .map(|m| json!({"blockSize": 1_000_000, "medianFee": m, "feeRange": [1, 2]}))
        .collect();
    mount_json(&server, "/api/v1/fees/mempool-blocks", Value::Array(blocks)).await;

    let fees = client_for(&server).fees().await.unwrap();
    assert_eq!(fees.fastest_fee, dec!(30.0));
    assert_eq!(fees.half_hour_fee, dec!(14.3));
    assert_eq!(fees.hour_fee, dec!(7.4));
}

#[tokio::test]
async fn test_fees_absent_when_projected_blocks_empty() {
    let server = MockServer::start().await;
    mount_status(&server, "/api/v1/fees/recommended", 404).await;
    mount_json(&server, "/api/v1/fees/mempool-blocks", json!([])).await;

    assert!(client_for(&server).fees().await.is_none());
}

#[tokio::test]
async fn test_difficulty_adjustment() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/api/v1/difficulty-adjustment",
        json!({
            "progressPercent": 57.3,
            "difficultyChange": 2.1,
            "estimatedRetargetDate": 1_714_000_000_000_i64,
            "remainingBlocks": 860,
            "timeAvg": 590_000
        }),
    )
    .await;

    let difficulty = client_for(&server).difficulty().await.unwrap();
    assert_eq!(difficulty.remaining_blocks, Some(860));
    assert_eq!(difficulty.estimated_difficulty_delta, Some(2.1));
}

#[tokio::test]
async fn test_difficulty_adjustment_with_fractional_times() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/api/v1/difficulty-adjustment",
        json!({
            "progressPercent": 44.397234501112074,
            "difficultyChange": 98.45932018381687,
            "estimatedRetargetDate": 1627762478.9111245,
            "remainingBlocks": 1121,
            "remainingTime": 665977.6261244365,
            "previousRetarget": -4.807005268478962,
            "nextRetargetHeight": 741888,
            "timeAvg": 302328.48322147654,
            "timeOffset": 0
        }),
    )
    .await;

    let difficulty = client_for(&server).difficulty().await.unwrap();
    assert_eq!(difficulty.remaining_blocks, Some(1121));
    assert_eq!(difficulty.next_retarget_height, Some(741888));
    assert_eq!(difficulty.remaining_time, Some(665977.6261244365));
    assert_eq!(
        difficulty.estimated_retarget_at().map(|t| t.timestamp()),
        Some(1_627_762_478)
    );
    assert_eq!(
        difficulty.average_block_time().map(|d| d.as_secs()),
        Some(302)
    );
}

#[tokio::test]
async fn test_block_with_fractional_timestamp() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "/api/v1/blocks",
        json!([{
            "id": "000000000000000000026c9c4d1b2b37",
            "height": 850000,
            "timestamp": 1718000000.5,
            "tx_count": 4210
        }]),
    )
    .await;

    let block = client_for(&server).latest_block().await.unwrap();
    assert_eq!(block.height, 850000);
    assert_eq!(block.timestamp, 1718000000);
}

#[tokio::test]
async fn test_slow_upstream_times_out_to_absence() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/mempool"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"count": 1, "vsize": 1}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let config = UpstreamConfig {
        request_timeout: Duration::from_millis(50),
        ..UpstreamConfig::with_base_url(&server.uri())
    };
    let client = UpstreamClient::new(config);
    assert!(client.mempool_stats().await.is_none());
}

#[tokio::test]
async fn test_everything_absent_when_upstreams_are_down() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    assert!(client.latest_block().await.is_none());
    assert!(client.mempool_stats().await.is_none());
    assert!(client.price().await.price_usd.is_none());
    assert!(client.fees().await.is_none());
    assert!(client.difficulty().await.is_none());
}
