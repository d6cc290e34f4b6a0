use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;

use crate::types::{TokenState, UpstreamTokenResponse};

/// Process-wide holder of the Spotify token pair.
///
/// Cloning hands out another handle to the same state. The lock only guards
/// individual reads and writes: a refresh is not serialized, so two calls
/// that hit a 401 at the same time each refresh on their own and the later
/// answer wins. The relay serves a single user, which makes that acceptable.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    state: Arc<Mutex<TokenState>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current tokens.
    pub async fn get(&self) -> TokenState {
        self.state.lock().await.clone()
    }

    /// Stores both tokens from a successful authorization-code exchange.
    pub async fn set_from_authorization_grant(&self, tokens: &UpstreamTokenResponse) {
        let mut state = self.state.lock().await;
        state.access_token = Some(tokens.access_token.clone());
        state.refresh_token = tokens.refresh_token.clone();
        state.updated_at = Some(Utc::now());
    }

    /// Replaces the access token after a refresh exchange. The refresh token
    /// is only replaced when the vendor rotated it.
    pub async fn set_access_token(&self, tokens: &UpstreamTokenResponse) {
        let mut state = self.state.lock().await;
        state.access_token = Some(tokens.access_token.clone());
        if let Some(rotated) = &tokens.refresh_token {
            state.refresh_token = Some(rotated.clone());
        }
        state.updated_at = Some(Utc::now());
    }
}
