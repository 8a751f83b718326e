use std::time::Duration;

use anyhow::{anyhow, Context};
use blockbar_chain_data::provider::{
    DEFAULT_COINGECKO_URL, DEFAULT_CONNECT_TIMEOUT, DEFAULT_MEMPOOL_URL,
    DEFAULT_REQUEST_TIMEOUT,
};
use blockbar_chain_data::UpstreamConfig;
use blockbar_core::{CarryForwardPolicy, RefreshInterval, StoreConfig};

pub struct Config {
    pub mempool_url: String,
    pub coingecko_url: String,
    pub refresh_interval: RefreshInterval,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub carry_max_cycles: Option<u32>,
}

impl Config {
    /// Reads `BLOCKBAR_*` variables, after loading `.env` if present.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mempool_url = var("BLOCKBAR_MEMPOOL_URL")
            .unwrap_or_else(|| DEFAULT_MEMPOOL_URL.to_string());
        let coingecko_url = var("BLOCKBAR_COINGECKO_URL")
            .unwrap_or_else(|| DEFAULT_COINGECKO_URL.to_string());

        let refresh_interval = match var("BLOCKBAR_REFRESH_INTERVAL") {
            Some(raw) => raw.parse::<RefreshInterval>().map_err(|_| {
                anyhow!("Invalid BLOCKBAR_REFRESH_INTERVAL: {raw} (expected manual, 5, 10 or 15)")
            })?,
            None => RefreshInterval::default(),
        };

        let connect_timeout = millis(&var, "BLOCKBAR_CONNECT_TIMEOUT_MS")?
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT);
        let request_timeout = millis(&var, "BLOCKBAR_REQUEST_TIMEOUT_MS")?
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        let carry_max_cycles = var("BLOCKBAR_CARRY_MAX_CYCLES")
            .map(|raw| {
                raw.parse::<u32>()
                    .with_context(|| format!("Invalid BLOCKBAR_CARRY_MAX_CYCLES: {raw}"))
            })
            .transpose()?;

        Ok(Self {
            mempool_url,
            coingecko_url,
            refresh_interval,
            connect_timeout,
            request_timeout,
            carry_max_cycles,
        })
    }

    pub fn upstream(&self) -> UpstreamConfig {
        UpstreamConfig {
            mempool_base_url: self.mempool_url.trim_end_matches('/').to_string(),
            coingecko_base_url: self.coingecko_url.trim_end_matches('/').to_string(),
            connect_timeout: self.connect_timeout,
            request_timeout: self.request_timeout,
        }
    }

    pub fn store(&self) -> StoreConfig {
        StoreConfig {
            refresh_interval: self.refresh_interval,
            carry_forward: CarryForwardPolicy {
                max_cycles: self.carry_max_cycles,
            },
            ..Default::default()
        }
    }
}

fn millis(
    var: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> anyhow::Result<Option<Duration>> {
    var(key)
        .map(|raw| {
            raw.parse::<u64>()
                .map(Duration::from_millis)
                .with_context(|| format!("Invalid {key}: {raw}"))
        })
        .transpose()
}
