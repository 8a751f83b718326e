//! Upstream endpoints and request policy.

use std::time::Duration;

/// Default block explorer / fee estimator host.
pub const DEFAULT_MEMPOOL_URL: &str = "https://mempool.space";

/// Default market data host.
pub const DEFAULT_COINGECKO_URL: &str = "https://api.coingecko.com/api/v3";

/// Default time allowed to establish a connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Default time allowed for a whole request, body included.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Hosts and timeouts for the upstream client.
///
/// Hosts are configuration, not contract: tests point them at a local mock
/// server, deployments can point them at a self-hosted explorer.
#[derive(Clone, Debug)]
pub struct UpstreamConfig {
    /// Base URL of the mempool.space-compatible explorer (no trailing `/api`)
    pub mempool_base_url: String,
    /// Base URL of the CoinGecko-compatible API (including `/api/v3`)
    pub coingecko_base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            mempool_base_url: DEFAULT_MEMPOOL_URL.to_string(),
            coingecko_base_url: DEFAULT_COINGECKO_URL.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl UpstreamConfig {
    /// Config pointing both providers at one host, as used against mock servers.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            mempool_base_url: base_url.to_string(),
            coingecko_base_url: format!("{}/api/v3", base_url.trim_end_matches('/')),
            ..Self::default()
        }
    }
}

/// Joins a base URL and an absolute path without doubling the slash.
pub(crate) fn endpoint(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}
