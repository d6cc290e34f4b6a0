use std::sync::Arc;

use reqwest::{Client, StatusCode, header::AUTHORIZATION};

use crate::{
    config::SpotifyConfig,
    error::ExchangeError,
    types::{AuthorizationGrant, TokenEndpointBody, UpstreamTokenResponse},
    utils,
};

/// Builds the Spotify authorization URL the browser is sent to from `/login`.
///
/// The result depends on nothing but the configuration: the same client id,
/// redirect URI and scopes always produce the same URL. Query values are
/// form-encoded, scopes are joined with a space in their configured order.
///
/// # Example
///
/// ```text
/// https://accounts.spotify.com/authorize?response_type=code&client_id=abc
///     &scope=user-read-private+user-read-email
///     &redirect_uri=http%3A%2F%2Flocalhost%3A3000%2Fcallback
/// ```
pub fn build_login_url(config: &SpotifyConfig) -> String {
    let mut url = config.auth_url.clone();
    url.query_pairs_mut()
        .append_pair("response_type", "code")
        .append_pair("client_id", &config.client_id)
        .append_pair("scope", &config.scopes.join(" "))
        .append_pair("redirect_uri", &config.redirect_uri);
    url.to_string()
}

/// Client for the two OAuth grant exchanges against the token endpoint.
///
/// Both grants authenticate with HTTP Basic credentials built from the
/// client id and secret. The caller decides what to do with the returned
/// tokens; this type never touches the [`crate::management::TokenStore`].
#[derive(Debug, Clone)]
pub struct AuthClient {
    http: Client,
    config: Arc<SpotifyConfig>,
}

impl AuthClient {
    pub fn new(http: Client, config: Arc<SpotifyConfig>) -> Self {
        Self { http, config }
    }

    /// Trades the authorization code from `/callback` for an access and a
    /// refresh token.
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::Rejected`] if the body carries an `error`, whatever
    ///   the HTTP status was
    /// - [`ExchangeError::NoToken`] if the body has no `access_token`
    /// - [`ExchangeError::Transport`] on network failure, timeout or a body
    ///   that is not JSON
    pub async fn exchange_authorization_code(
        &self,
        code: &str,
    ) -> Result<UpstreamTokenResponse, ExchangeError> {
        let grant = AuthorizationGrant::AuthorizationCode {
            code: code.to_string(),
            redirect_uri: self.config.redirect_uri.clone(),
        };
        self.request_token(&grant).await
    }

    /// Obtains a new access token with a stored refresh token.
    ///
    /// The answer may or may not carry a rotated refresh token; callers keep
    /// the old one when it does not. Errors are the same as for
    /// [`AuthClient::exchange_authorization_code`].
    pub async fn exchange_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<UpstreamTokenResponse, ExchangeError> {
        let grant = AuthorizationGrant::RefreshToken {
            refresh_token: refresh_token.to_string(),
        };
        self.request_token(&grant).await
    }

    async fn request_token(
        &self,
        grant: &AuthorizationGrant,
    ) -> Result<UpstreamTokenResponse, ExchangeError> {
        let res = self
            .http
            .post(self.config.token_url.clone())
            .header(
                AUTHORIZATION,
                utils::basic_credentials(&self.config.client_id, &self.config.client_secret),
            )
            .form(&grant.form())
            .send()
            .await?;

        let status = res.status();
        let bytes = res.bytes().await?;
        let body: TokenEndpointBody = serde_json::from_slice(&bytes).map_err(|e| {
            ExchangeError::Transport(format!("non-JSON body from token endpoint ({status}): {e}"))
        })?;

        validate_token_body(status, body)
    }
}

/// Applies the acceptance rules to a parsed token endpoint body. The body is
/// authoritative: an `error` field fails the exchange even on a 200.
pub fn validate_token_body(
    status: StatusCode,
    body: TokenEndpointBody,
) -> Result<UpstreamTokenResponse, ExchangeError> {
    if let Some(error) = body.error {
        return Err(ExchangeError::Rejected {
            status,
            error,
            description: body.error_description,
        });
    }

    match body.access_token {
        Some(access_token) if !access_token.is_empty() => Ok(UpstreamTokenResponse {
            access_token,
            refresh_token: body.refresh_token.filter(|t| !t.is_empty()),
            token_type: body.token_type,
            scope: body.scope,
            expires_in: body.expires_in,
        }),
        _ => Err(ExchangeError::NoToken { status }),
    }
}
