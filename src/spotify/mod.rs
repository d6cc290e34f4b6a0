//! # Spotify Integration Module
//!
//! This module is the only place that speaks HTTP to Spotify. It covers the
//! OAuth side (login URL and token exchanges) and the authorized relay that
//! forwards resource calls with the current bearer token.
//!
//! ## Architecture
//!
//! ```text
//! API Layer (axum handlers)
//!          ↓
//! Spotify Integration Layer
//!     ├── Authentication (login URL, code and refresh grants)
//!     └── Relay (bearer injection, refresh-and-retry on 401)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Accounts service / Web API
//! ```
//!
//! ## Core Modules
//!
//! ### Authentication Module
//!
//! [`auth`] - Authorization-code flow with a confidential client:
//! - **Login URL**: Deterministic authorization URL with `response_type=code`
//! - **Code Exchange**: Trades the callback code for access and refresh tokens
//! - **Refresh Exchange**: Obtains a new access token from the refresh token
//! - **Body Validation**: Treats an `error` body as a failure whatever the status
//!
//! ### Relay Module
//!
//! [`relay`] - Forwards calls to the Web API:
//! - **Bearer Injection**: Attaches the stored access token
//! - **Reactive Refresh**: One refresh and one retry after a 401, never more
//! - **Pass-through**: Any other upstream status and body reach the caller untouched
//!
//! ## Timeouts
//!
//! Every outbound request shares one [`reqwest::Client`] built by
//! [`http_client`] with the configured request timeout. A timeout surfaces
//! as a transport failure.

pub mod auth;
pub mod relay;

use reqwest::Client;

use crate::config::SpotifyConfig;

/// Builds the HTTP client shared by the exchange client and the relay.
pub fn http_client(config: &SpotifyConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(config.request_timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
}
