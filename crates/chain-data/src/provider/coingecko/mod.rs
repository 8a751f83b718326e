//! CoinGecko provider.
//!
//! Two endpoints, richest first:
//! - `/coins/bitcoin` returns price, 24h/7d/30d change, 24h extrema, all-time
//!   extrema with dates and a 7-day sparkline
//! - `/simple/price` returns price and 24h change only
//!
//! The market payload nests values under per-currency maps and has carried
//! both `price_change_percentage_24h` and
//! `price_change_percentage_24h_in_currency.usd`; fields are located by
//! pointer probing so either layout decodes.
//!
//! API documentation: https://docs.coingecko.com/reference/introduction

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

use crate::errors::ChainDataError;
use crate::models::{PriceDetails, PriceExtreme, PriceQuote, PriceSource};
use crate::provider::{endpoint, probe_pointer, JsonFetcher, UpstreamConfig};

pub const PROVIDER_ID: &str = "COINGECKO";

const COIN_ID: &str = "bitcoin";

const MARKET_QUERY: &[(&str, &str)] = &[
    ("localization", "false"),
    ("tickers", "false"),
    ("market_data", "true"),
    ("community_data", "false"),
    ("developer_data", "false"),
    ("sparkline", "true"),
];

const SIMPLE_QUERY: &[(&str, &str)] = &[
    ("ids", COIN_ID),
    ("vs_currencies", "usd"),
    ("include_24hr_change", "true"),
];

// Candidate locations inside `market_data`, most specific first.
const PRICE: &[&str] = &["/current_price/usd"];
const CHANGE_24H: &[&str] = &[
    "/price_change_percentage_24h_in_currency/usd",
    "/price_change_percentage_24h",
];
const CHANGE_7D: &[&str] = &[
    "/price_change_percentage_7d_in_currency/usd",
    "/price_change_percentage_7d",
];
const CHANGE_30D: &[&str] = &[
    "/price_change_percentage_30d_in_currency/usd",
    "/price_change_percentage_30d",
];
const HIGH_24H: &[&str] = &["/high_24h/usd"];
const LOW_24H: &[&str] = &["/low_24h/usd"];
const ATH: &[&str] = &["/ath/usd"];
const ATH_DATE: &[&str] = &["/ath_date/usd"];
const ATL: &[&str] = &["/atl/usd"];
const ATL_DATE: &[&str] = &["/atl_date/usd"];
const LAST_UPDATED: &[&str] = &["/last_updated"];
const SPARKLINE: &[&str] = &["/sparkline_7d/price", "/sparkline_in_7d/price"];

const SIMPLE_PRICE: &[&str] = &["/bitcoin/usd"];
const SIMPLE_CHANGE: &[&str] = &["/bitcoin/usd_24h_change", "/bitcoin/usd_24hr_change"];

/// CoinGecko API client.
#[derive(Clone)]
pub struct CoinGeckoProvider {
    http: JsonFetcher,
    base_url: String,
}

impl CoinGeckoProvider {
    pub fn new(config: &UpstreamConfig) -> Self {
        Self {
            http: JsonFetcher::new(config),
            base_url: config.coingecko_base_url.clone(),
        }
    }

    /// Price with change and extended market data from `/coins/bitcoin`.
    pub async fn market_quote(&self) -> Result<PriceQuote, ChainDataError> {
        let url = endpoint(&self.base_url, &format!("/coins/{}", COIN_ID));
        let coin: Value = self.http.get_json(PROVIDER_ID, &url, MARKET_QUERY).await?;

        let quote = parse_market_quote(&coin)?;
        debug!(
            "{} market quote: {:?} ({:?} 24h)",
            PROVIDER_ID, quote.price_usd, quote.change_24h
        );
        Ok(quote)
    }

    /// Price and 24h change from `/simple/price`.
    pub async fn simple_quote(&self) -> Result<PriceQuote, ChainDataError> {
        let url = endpoint(&self.base_url, "/simple/price");
        let body: Value = self.http.get_json(PROVIDER_ID, &url, SIMPLE_QUERY).await?;
        parse_simple_quote(&body)
    }
}

fn parse_market_quote(coin: &Value) -> Result<PriceQuote, ChainDataError> {
    let market = coin
        .get("market_data")
        .filter(|m| m.is_object())
        .ok_or_else(|| empty("market_data"))?;

    let price: Decimal = probe_pointer(market, PRICE).ok_or_else(|| empty("usd price"))?;

    let details = PriceDetails {
        change_7d: probe_pointer(market, CHANGE_7D),
        change_30d: probe_pointer(market, CHANGE_30D),
        high_24h: probe_pointer(market, HIGH_24H),
        low_24h: probe_pointer(market, LOW_24H),
        all_time_high: extreme(market, ATH, ATH_DATE),
        all_time_low: extreme(market, ATL, ATL_DATE),
        last_updated: probe_pointer::<DateTime<Utc>>(market, LAST_UPDATED)
            .or_else(|| probe_pointer(coin, LAST_UPDATED)),
        sparkline_7d: probe_pointer::<Vec<Option<Decimal>>>(market, SPARKLINE)
            .map(|points| points.into_iter().flatten().collect())
            .unwrap_or_default(),
    };

    Ok(PriceQuote {
        price_usd: Some(price),
        change_24h: probe_pointer(market, CHANGE_24H),
        source: Some(PriceSource::CoinGecko),
        details: Some(details),
    })
}

fn parse_simple_quote(body: &Value) -> Result<PriceQuote, ChainDataError> {
    let price: Decimal = probe_pointer(body, SIMPLE_PRICE).ok_or_else(|| empty("usd price"))?;

    Ok(PriceQuote {
        price_usd: Some(price),
        change_24h: probe_pointer(body, SIMPLE_CHANGE),
        source: Some(PriceSource::CoinGecko),
        details: None,
    })
}

fn extreme(market: &Value, price: &[&str], date: &[&str]) -> Option<PriceExtreme> {
    Some(PriceExtreme {
        price: probe_pointer(market, price)?,
        date: probe_pointer(market, date),
    })
}

fn empty(what: &'static str) -> ChainDataError {
    ChainDataError::EmptyResponse {
        provider: PROVIDER_ID.to_string(),
        what,
    }
}
