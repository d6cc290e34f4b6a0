//! # API Module
//!
//! HTTP handlers of the relay. Each handler is a thin adapter: it validates
//! the client's input, builds a [`RelayRequest`] and hands the upstream answer
//! back unchanged.
//!
//! ## Endpoints
//!
//! | Path | Method | Auth | Upstream |
//! |---|---|---|---|
//! | `/` | GET | no | static liveness text |
//! | `/health` | GET | no | relay status as JSON |
//! | `/login` | GET | no | redirect to the Spotify authorize page |
//! | `/callback` | GET | no | code grant on the token endpoint |
//! | `/me` | GET | yes | `/v1/me` |
//! | `/playlists` | GET | yes | `/v1/me/playlists` |
//! | `/playlist/{id}` | GET | yes | `/v1/playlists/{id}` |
//! | `/playlist/{id}/tracks` | GET | yes | `/v1/playlists/{id}/tracks` |
//! | `/playlist/{id}/add` | POST | yes | `POST /v1/playlists/{id}/tracks` |
//! | `/search` | GET | yes | `/v1/search?type=track,playlist` |
//! | `/track/{id}` | GET | no | redirect to the public track page |
//!
//! ## Error Bodies
//!
//! Errors produced by the relay itself are JSON objects with an `error`
//! message and, where useful, a `details` value. Errors produced by Spotify
//! are passed through with their original status and body.

mod callback;
mod health;
mod login;
mod playlists;
mod search;
mod track;
mod user;

use std::sync::Arc;

use axum::{
    Json,
    http::{
        StatusCode,
        header::{LOCATION, RETRY_AFTER},
    },
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

use crate::{
    config::SpotifyConfig,
    error::RelayError,
    management::TokenStore,
    spotify::{
        self,
        auth::AuthClient,
        relay::{AuthorizedRelay, RelayRequest},
    },
    warning,
};

pub use callback::callback;
pub use health::{health, root};
pub use login::login;
pub use playlists::{add_track, playlist, playlist_tracks, playlists};
pub use search::search;
pub use track::track;
pub use user::me;

/// Shared handles every handler receives through an `Extension`.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<SpotifyConfig>,
    pub store: TokenStore,
    pub auth: AuthClient,
    pub relay: AuthorizedRelay,
}

impl AppState {
    /// Wires the token store, exchange client and relay around one HTTP client.
    pub fn new(config: SpotifyConfig) -> Result<Self, reqwest::Error> {
        let config = Arc::new(config);
        let http = spotify::http_client(&config)?;
        let store = TokenStore::new();
        let auth = AuthClient::new(http.clone(), Arc::clone(&config));
        let relay = AuthorizedRelay::new(http, Arc::clone(&config), auth.clone(), store.clone());

        Ok(Self {
            config,
            store,
            auth,
            relay,
        })
    }
}

pub(crate) fn unauthorized() -> Response {
    error_response(StatusCode::UNAUTHORIZED, "Not authorized", None)
}

/// Answers 401 when no access token is stored. Handlers call this before
/// validating their own input so a client without a login always gets the
/// same answer.
pub(crate) async fn require_login(state: &AppState) -> Option<Response> {
    if state.store.get().await.is_authorized() {
        None
    } else {
        Some(unauthorized())
    }
}

/// Sends `request` through the relay and turns the outcome into a response.
/// `failure` names the operation in the error body for transport failures.
pub(crate) async fn forward(state: &AppState, request: RelayRequest, failure: &str) -> Response {
    match state.relay.send(&request).await {
        Ok(upstream) => {
            let mut response = (upstream.status, Json(upstream.body)).into_response();
            if let Some(retry_after) = upstream.retry_after {
                response.headers_mut().insert(RETRY_AFTER, retry_after);
            }
            response
        }
        Err(RelayError::Unauthorized) => unauthorized(),
        Err(e) => {
            warning!("{} ({} {}): {}", failure, request.method(), request.path(), e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                failure,
                Some(json!(e.to_string())),
            )
        }
    }
}

pub(crate) fn error_response(status: StatusCode, message: &str, details: Option<Value>) -> Response {
    let body = match details {
        Some(details) => json!({ "error": message, "details": details }),
        None => json!({ "error": message }),
    };
    (status, Json(body)).into_response()
}

/// 302 redirect.
pub(crate) fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location.to_string())]).into_response()
}
