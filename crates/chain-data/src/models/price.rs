use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Upstream that supplied the price in a [`PriceQuote`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PriceSource {
    /// Rich market data provider (price, change, extrema, sparkline)
    CoinGecko,
    /// Price-only fallback served by the block explorer
    Mempool,
}

impl PriceSource {
    pub fn label(&self) -> &'static str {
        match self {
            Self::CoinGecko => "CoinGecko",
            Self::Mempool => "mempool.space",
        }
    }
}

impl std::fmt::Display for PriceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A price extreme together with the date it was reached.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceExtreme {
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

/// Extended market data only the rich provider returns.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceDetails {
    pub change_7d: Option<Decimal>,
    pub change_30d: Option<Decimal>,
    pub high_24h: Option<Decimal>,
    pub low_24h: Option<Decimal>,
    pub all_time_high: Option<PriceExtreme>,
    pub all_time_low: Option<PriceExtreme>,
    pub last_updated: Option<DateTime<Utc>>,
    /// Hourly USD prices over the last seven days, oldest first
    #[serde(default)]
    pub sparkline_7d: Vec<Decimal>,
}

/// Result of the price fallback chain. Any part may be missing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub price_usd: Option<Decimal>,
    /// 24h change in percent
    pub change_24h: Option<Decimal>,
    pub source: Option<PriceSource>,
    pub details: Option<PriceDetails>,
}

impl PriceQuote {
    /// A quote from a provider that only knows the spot price.
    pub fn price_only(price_usd: Decimal, source: PriceSource) -> Self {
        Self {
            price_usd: Some(price_usd),
            change_24h: None,
            source: Some(source),
            details: None,
        }
    }

    /// The quote returned when every price provider failed.
    pub fn unavailable() -> Self {
        Self::default()
    }
}
