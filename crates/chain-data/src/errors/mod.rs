//! Error types for upstream chain data requests.
//!
//! [`ChainDataError`] classifies why a single upstream call failed. These
//! errors stay inside the provider layer: the [`UpstreamClient`] walks its
//! fallback chains on any error and reports a missing category as `None`.
//!
//! [`UpstreamClient`]: crate::UpstreamClient

use thiserror::Error;

/// Errors that can occur while talking to a single upstream endpoint.
#[derive(Error, Debug)]
pub enum ChainDataError {
    /// The request did not complete within the configured timeout.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// The provider rate limited the request (HTTP 429).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The provider answered with a non-2xx status.
    #[error("HTTP {status} from {provider}")]
    HttpStatus {
        /// The provider that answered
        provider: String,
        /// The HTTP status code
        status: u16,
    },

    /// The request could not be sent or the body could not be read.
    #[error("Request failed: {provider} - {message}")]
    Request {
        /// The provider the request was addressed to
        provider: String,
        /// Transport error description
        message: String,
    },

    /// The body was not the JSON shape we expected.
    #[error("Decode failed: {provider} - {message}")]
    Decode {
        /// The provider that returned the body
        provider: String,
        /// Decoder error description
        message: String,
    },

    /// The body decoded but did not carry the value we asked for.
    #[error("Empty response: {provider} - {what}")]
    EmptyResponse {
        /// The provider that returned the body
        provider: String,
        /// What was missing (e.g. "blocks", "usd price")
        what: &'static str,
    },
}

impl ChainDataError {
    /// Whether the failure is likely to clear up on its own.
    ///
    /// Timeouts, rate limits, transport failures and 5xx answers are
    /// transient. Decode problems and empty bodies point at schema drift and
    /// will keep failing until the decoder learns the new shape.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::RateLimited { .. } | Self::Request { .. } => true,
            Self::HttpStatus { status, .. } => *status >= 500,
            Self::Decode { .. } | Self::EmptyResponse { .. } => false,
        }
    }

    /// The provider the failed request was addressed to.
    pub fn provider(&self) -> &str {
        match self {
            Self::Timeout { provider }
            | Self::RateLimited { provider }
            | Self::HttpStatus { provider, .. }
            | Self::Request { provider, .. }
            | Self::Decode { provider, .. }
            | Self::EmptyResponse { provider, .. } => provider,
        }
    }
}
