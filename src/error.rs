//! Error types shared by the relay.
//!
//! Failures are always scoped to a single request: nothing here is fatal to
//! the process. Upstream statuses other than 401 are not errors at all, they
//! travel back to the caller inside [`crate::spotify::relay::UpstreamResponse`].

use reqwest::StatusCode;
use thiserror::Error;

/// Problems found while reading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} is not a valid URL: {source}")]
    InvalidUrl {
        var: &'static str,
        #[source]
        source: url::ParseError,
    },

    #[error("{var} must be an absolute http(s) URL, got {value}")]
    NotABaseUrl { var: &'static str, value: String },

    #[error("SERVER_ADDRESS is not a valid socket address: {0}")]
    InvalidAddress(String),

    #[error("SPOTIFY_REQUEST_TIMEOUT_SECS must be a positive integer, got {0}")]
    InvalidTimeout(String),
}

/// Failure of a grant exchange against the token endpoint.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// The vendor answered with an explicit `error` field. The body wins over
    /// the HTTP status, so this is reported even for a 200.
    #[error("token endpoint rejected the grant ({status}): {error}")]
    Rejected {
        status: StatusCode,
        error: String,
        description: Option<String>,
    },

    /// The vendor answered without an `error` but also without an access token.
    #[error("token endpoint returned no access token ({status})")]
    NoToken { status: StatusCode },

    /// Network failure, timeout or a body that is not JSON.
    #[error("token endpoint unreachable or unreadable: {0}")]
    Transport(String),
}

impl ExchangeError {
    /// True when the vendor answered but refused to hand out a token.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. } | Self::NoToken { .. })
    }
}

impl From<reqwest::Error> for ExchangeError {
    fn from(err: reqwest::Error) -> Self {
        ExchangeError::Transport(err.to_string())
    }
}

/// Failure of an authorized relay call.
#[derive(Debug, Error)]
pub enum RelayError {
    /// No access token is stored, or the refresh after a 401 failed.
    #[error("not authorized")]
    Unauthorized,

    #[error("cannot build upstream url: {0}")]
    InvalidPath(String),

    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),
}
