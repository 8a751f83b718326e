//! Shared JSON GET used by every provider.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::config::UpstreamConfig;
use crate::errors::ChainDataError;

const USER_AGENT: &str = concat!("blockbar/", env!("CARGO_PKG_VERSION"));

/// Thin wrapper over a `reqwest::Client` that classifies failures.
#[derive(Clone)]
pub(crate) struct JsonFetcher {
    client: Client,
}

impl JsonFetcher {
    pub(crate) fn new(config: &UpstreamConfig) -> Self {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    /// GET `url` and decode the body as `T`.
    ///
    /// Anything but a 2xx answer is an error; the body of a failed answer is
    /// not inspected.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        provider: &'static str,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ChainDataError> {
        debug!("{} request: {} with {} params", provider, url, query.len());

        let mut request = self.client.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await.map_err(|e| transport_error(provider, e))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ChainDataError::RateLimited {
                provider: provider.to_string(),
            });
        }
        if !status.is_success() {
            return Err(ChainDataError::HttpStatus {
                provider: provider.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| transport_error(provider, e))?;

        serde_json::from_str(&body).map_err(|e| ChainDataError::Decode {
            provider: provider.to_string(),
            message: e.to_string(),
        })
    }
}

fn transport_error(provider: &'static str, error: reqwest::Error) -> ChainDataError {
    if error.is_timeout() {
        ChainDataError::Timeout {
            provider: provider.to_string(),
        }
    } else {
        ChainDataError::Request {
            provider: provider.to_string(),
            message: error.to_string(),
        }
    }
}
