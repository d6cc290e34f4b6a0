//! Configuration management for the Spotify relay.
//!
//! This module handles loading configuration values from environment
//! variables and `.env` files. Credentials and endpoints are read once at
//! startup into a [`Config`] value that is then handed to the server; nothing
//! else in the crate touches the process environment.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. `.env` file in the working directory
//! 4. Application defaults (where applicable)

use std::{env, net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use url::Url;

use crate::{error::ConfigError, utils};

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:3000";
pub const DEFAULT_SCOPE: &str = "user-read-private user-read-email playlist-read-private playlist-read-collaborative playlist-modify-public playlist-modify-private user-top-read";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_OPEN_URL: &str = "https://open.spotify.com";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Loads environment variables from `.env` files.
///
/// Looks for `sporlrelay/.env` in the platform-specific local data directory
/// first and then for a `.env` in the working directory. Variables that are
/// already set in the process environment are never overwritten, and a
/// missing file is not an error since every value may come from the real
/// environment instead.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/sporlrelay/.env`
/// - macOS: `~/Library/Application Support/sporlrelay/.env`
/// - Windows: `%LOCALAPPDATA%/sporlrelay/.env`
///
/// # Errors
///
/// Returns an error if the data directory cannot be created or an existing
/// `.env` file cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("sporlrelay/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }

    match dotenv::dotenv() {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e.to_string()),
    }
}

/// Everything the relay needs to talk to Spotify.
#[derive(Debug, Clone)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    /// Where `/callback` sends the browser after a successful login.
    pub frontend_uri: Option<String>,
    /// Requested OAuth scopes, in the order they are sent.
    pub scopes: Vec<String>,
    pub auth_url: Url,
    pub token_url: Url,
    pub api_url: Url,
    pub open_url: Url,
    /// Upper bound for every outbound request.
    pub request_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: SocketAddr,
    pub spotify: SpotifyConfig,
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// Call [`load_env`] before this so `.env` files are taken into account.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the configuration through an arbitrary key lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));
        let url = |key: &'static str, default: &str| -> Result<Url, ConfigError> {
            let value = get(key).unwrap_or_else(|| default.to_string());
            let parsed =
                Url::parse(&value).map_err(|source| ConfigError::InvalidUrl { var: key, source })?;
            if parsed.cannot_be_a_base() {
                return Err(ConfigError::NotABaseUrl { var: key, value });
            }
            Ok(parsed)
        };

        let server_address = get("SERVER_ADDRESS")
            .unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_string());
        let server_address = SocketAddr::from_str(&server_address)
            .map_err(|_| ConfigError::InvalidAddress(server_address))?;

        let request_timeout = match get("SPOTIFY_REQUEST_TIMEOUT_SECS") {
            Some(raw) => {
                let parsed = raw.trim().parse::<u64>();
                match parsed {
                    Ok(secs) if secs > 0 => Duration::from_secs(secs),
                    _ => return Err(ConfigError::InvalidTimeout(raw)),
                }
            }
            None => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        let scope = get("SPOTIFY_API_AUTH_SCOPE").unwrap_or_else(|| DEFAULT_SCOPE.to_string());

        let spotify = SpotifyConfig {
            client_id: required("SPOTIFY_CLIENT_ID")?,
            client_secret: required("SPOTIFY_CLIENT_SECRET")?,
            redirect_uri: required("SPOTIFY_REDIRECT_URI")?,
            frontend_uri: get("FRONTEND_URI"),
            scopes: utils::parse_scopes(&scope),
            auth_url: url("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL)?,
            token_url: url("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL)?,
            api_url: url("SPOTIFY_API_URL", DEFAULT_API_URL)?,
            open_url: url("SPOTIFY_OPEN_URL", DEFAULT_OPEN_URL)?,
            request_timeout,
        };

        Ok(Config {
            server_address,
            spotify,
        })
    }
}
