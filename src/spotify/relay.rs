use std::sync::Arc;

use reqwest::{
    Client, Method, StatusCode,
    header::{HeaderValue, RETRY_AFTER},
};
use serde_json::Value;
use url::Url;

use crate::{
    config::SpotifyConfig, error::RelayError, info, management::TokenStore,
    spotify::auth::AuthClient, success, utils, warning,
};

/// A call to be forwarded to the Web API, relative to the configured API base.
#[derive(Debug, Clone)]
pub struct RelayRequest {
    method: Method,
    segments: Vec<String>,
    query: Vec<(String, String)>,
    body: Option<Value>,
    require_auth: bool,
}

impl RelayRequest {
    fn new<I, S>(method: Method, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
            body: None,
            require_auth: true,
        }
    }

    /// `GET` on the given path segments. Each segment is percent-encoded on
    /// its own, so an id can never escape into another path.
    pub fn get<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::GET, segments)
    }

    /// `POST` with a JSON body.
    pub fn post<I, S>(segments: I, body: Value) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut request = Self::new(Method::POST, segments);
        request.body = Some(body);
        request
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn queries<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Lets the call go out without a bearer token when none is stored.
    pub fn optional_auth(mut self) -> Self {
        self.require_auth = false;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Path relative to the API base, for log lines.
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

/// Status and body exactly as the Web API returned them.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: Value,
    /// `Retry-After` of a rate-limited (429) or unavailable answer.
    pub retry_after: Option<HeaderValue>,
}

/// Forwards calls to the Web API with the stored bearer token.
///
/// A call walks this state machine:
///
/// ```text
/// Start ──no token──▶ Unauthorized
///   │
///   ▼
/// Requesting ──non-401──▶ Done
///   │ 401
///   ▼
/// Refreshing ──failed──▶ Unauthorized
///   │ ok
///   ▼
/// Retrying ──any status──▶ Done
/// ```
///
/// There is at most one refresh and one retry per call. A 401 on the retry
/// is handed back like any other upstream answer.
#[derive(Debug, Clone)]
pub struct AuthorizedRelay {
    http: Client,
    config: Arc<SpotifyConfig>,
    auth: AuthClient,
    store: TokenStore,
}

impl AuthorizedRelay {
    pub fn new(http: Client, config: Arc<SpotifyConfig>, auth: AuthClient, store: TokenStore) -> Self {
        Self {
            http,
            config,
            auth,
            store,
        }
    }

    /// Sends `request` upstream.
    ///
    /// # Errors
    ///
    /// - [`RelayError::Unauthorized`] when no access token is stored (no
    ///   request is sent) or when the refresh after a 401 fails
    /// - [`RelayError::Transport`] on network failure or timeout
    /// - [`RelayError::InvalidPath`] when the API base cannot take path segments
    pub async fn send(&self, request: &RelayRequest) -> Result<UpstreamResponse, RelayError> {
        let tokens = self.store.get().await;
        if request.require_auth && tokens.access_token.is_none() {
            return Err(RelayError::Unauthorized);
        }

        let url = self.url_for(request)?;
        let first = self
            .dispatch(request, &url, tokens.access_token.as_deref())
            .await?;
        if first.status != StatusCode::UNAUTHORIZED {
            return Ok(first);
        }

        info!(
            "{} {} answered 401, refreshing access token",
            request.method,
            request.path()
        );
        self.refresh().await?;

        let tokens = self.store.get().await;
        self.dispatch(request, &url, tokens.access_token.as_deref())
            .await
    }

    async fn refresh(&self) -> Result<(), RelayError> {
        let Some(refresh_token) = self.store.get().await.refresh_token else {
            warning!("No refresh token stored, login required");
            return Err(RelayError::Unauthorized);
        };

        match self.auth.exchange_refresh_token(&refresh_token).await {
            Ok(tokens) => {
                self.store.set_access_token(&tokens).await;
                success!("Access token refreshed");
                Ok(())
            }
            Err(e) => {
                warning!("Token refresh failed: {}", e);
                Err(RelayError::Unauthorized)
            }
        }
    }

    async fn dispatch(
        &self,
        request: &RelayRequest,
        url: &Url,
        access_token: Option<&str>,
    ) -> Result<UpstreamResponse, RelayError> {
        let mut builder = self.http.request(request.method.clone(), url.clone());
        if let Some(token) = access_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let res = builder.send().await?;
        let status = res.status();
        let retry_after = res.headers().get(RETRY_AFTER).cloned();
        let bytes = res.bytes().await?;

        Ok(UpstreamResponse {
            status,
            body: utils::decode_body(&bytes),
            retry_after,
        })
    }

    fn url_for(&self, request: &RelayRequest) -> Result<Url, RelayError> {
        let mut url = self.config.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| RelayError::InvalidPath(self.config.api_url.to_string()))?
            .pop_if_empty()
            .extend(&request.segments);
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }
        Ok(url)
    }
}
