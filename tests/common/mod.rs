#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use sporlrelay::{
    config::SpotifyConfig,
    management::TokenStore,
    spotify::{self, auth::AuthClient, relay::AuthorizedRelay},
    types::UpstreamTokenResponse,
};
use url::Url;

pub const CLIENT_ID: &str = "client-id";
pub const CLIENT_SECRET: &str = "client-secret";
pub const REDIRECT_URI: &str = "http://localhost:3000/callback";

// base64("client-id:client-secret")
pub const BASIC_AUTH: &str = "Basic Y2xpZW50LWlkOmNsaWVudC1zZWNyZXQ=";

// Helper function to build a config pointing every Spotify endpoint at `base`
pub fn test_config(base: &str) -> SpotifyConfig {
    SpotifyConfig {
        client_id: CLIENT_ID.to_string(),
        client_secret: CLIENT_SECRET.to_string(),
        redirect_uri: REDIRECT_URI.to_string(),
        frontend_uri: None,
        scopes: vec![
            "user-read-private".to_string(),
            "user-read-email".to_string(),
            "playlist-read-private".to_string(),
        ],
        auth_url: Url::parse(&format!("{base}/authorize")).unwrap(),
        token_url: Url::parse(&format!("{base}/api/token")).unwrap(),
        api_url: Url::parse(&format!("{base}/v1")).unwrap(),
        open_url: Url::parse("https://open.spotify.com").unwrap(),
        request_timeout: Duration::from_secs(5),
    }
}

pub fn tokens(access: &str, refresh: Option<&str>) -> UpstreamTokenResponse {
    UpstreamTokenResponse {
        access_token: access.to_string(),
        refresh_token: refresh.map(str::to_string),
        token_type: Some("Bearer".to_string()),
        scope: None,
        expires_in: Some(3600),
    }
}

pub fn auth_client(config: SpotifyConfig) -> AuthClient {
    let config = Arc::new(config);
    let http = spotify::http_client(&config).unwrap();
    AuthClient::new(http, config)
}

pub fn relay(config: SpotifyConfig, store: TokenStore) -> AuthorizedRelay {
    let config = Arc::new(config);
    let http = spotify::http_client(&config).unwrap();
    let auth = AuthClient::new(http.clone(), Arc::clone(&config));
    AuthorizedRelay::new(http, config, auth, store)
}

pub async fn logged_in_store(access: &str, refresh: &str) -> TokenStore {
    let store = TokenStore::new();
    store
        .set_from_authorization_grant(&tokens(access, Some(refresh)))
        .await;
    store
}
