//! Spotify Relay Library
//!
//! This library implements a small backend relay between a client application
//! and the Spotify Web API. It performs the OAuth 2.0 authorization-code
//! exchange, keeps the resulting tokens in process memory and forwards a
//! handful of profile, playlist and search calls with the bearer token
//! attached, refreshing it once when Spotify answers 401.
//!
//! # Modules
//!
//! - `api` - HTTP handlers exposed by the relay
//! - `config` - Configuration management and environment variables
//! - `error` - Error types for configuration, token exchange and relaying
//! - `management` - In-memory token store
//! - `server` - Router assembly and the HTTP listener
//! - `spotify` - Spotify Accounts and Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use sporlrelay::{config, server};
//!
//! #[tokio::main]
//! async fn main() -> sporlrelay::Res<()> {
//!     config::load_env().await?;
//!     let config = config::Config::from_env()?;
//!     server::start_api_server(config).await
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// Result alias for startup glue and the server loop.
///
/// Request-scoped failures use the typed errors in [`error`] instead.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational line prefixed with a blue `o`.
///
/// ```
/// info!("Relay listening on http://{}", addr);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success line prefixed with a green check mark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error line prefixed with a red `!` and exits with status 1.
///
/// Only for startup failures in the binary. Handlers never call this: a
/// failing request must not take the relay down.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning line prefixed with a yellow `!`. Used for per-request
/// failures such as a rejected token exchange.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
