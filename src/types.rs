use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// In-memory token pair held by the relay. Empty until the first successful
/// authorization-code exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenState {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl TokenState {
    pub fn is_authorized(&self) -> bool {
        self.access_token.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantType {
    AuthorizationCode,
    RefreshToken,
}

impl GrantType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrantType::AuthorizationCode => "authorization_code",
            GrantType::RefreshToken => "refresh_token",
        }
    }
}

/// One request to the token endpoint. Client credentials travel in the
/// Basic authorization header, not in the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationGrant {
    AuthorizationCode { code: String, redirect_uri: String },
    RefreshToken { refresh_token: String },
}

impl AuthorizationGrant {
    pub fn grant_type(&self) -> GrantType {
        match self {
            AuthorizationGrant::AuthorizationCode { .. } => GrantType::AuthorizationCode,
            AuthorizationGrant::RefreshToken { .. } => GrantType::RefreshToken,
        }
    }

    pub fn form(&self) -> Vec<(&'static str, &str)> {
        let mut form = vec![("grant_type", self.grant_type().as_str())];
        match self {
            AuthorizationGrant::AuthorizationCode { code, redirect_uri } => {
                form.push(("code", code.as_str()));
                form.push(("redirect_uri", redirect_uri.as_str()));
            }
            AuthorizationGrant::RefreshToken { refresh_token } => {
                form.push(("refresh_token", refresh_token.as_str()));
            }
        }
        form
    }
}

/// Raw body of the token endpoint, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenEndpointBody {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub token_type: Option<String>,
    pub scope: Option<String>,
    pub expires_in: Option<u64>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// A validated token endpoint answer: the access token is always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamTokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub token_type: Option<String>,
    pub scope: Option<String>,
    pub expires_in: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddTrackRequest {
    #[serde(rename = "trackUri")]
    pub track_uri: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}
