//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use serde::Deserialize;

/// Expiry claim embedded in every issued token (2018-01-18T01:30:22Z).
pub const DEFAULT_TOKEN_EXPIRES_AT: i64 = 1_516_239_022;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `JWT_SECRET` (required): HMAC secret used to sign and verify session tokens
/// - `DATABASE_URL` (optional): PostgreSQL connection string; the in-memory store is used when absent
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `TOKEN_EXPIRES_AT` (optional): expiry claim written into tokens, defaults to 1516239022
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub jwt_secret: String,

    #[serde(default)]
    pub database_url: Option<String>,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_token_expires_at")]
    pub token_expires_at: i64,
}

/// Errors raised while loading [`Config`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read environment: {0}")]
    Env(#[from] envy::Error),

    #[error("JWT_SECRET must not be empty")]
    EmptySecret,
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    3000
}

fn default_token_expires_at() -> i64 {
    DEFAULT_TOKEN_EXPIRES_AT
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `JWT_SECRET` is missing or empty
    /// - Environment variable values cannot be parsed into expected types
    pub fn from_env() -> Result<Self, ConfigError> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Field names are automatically converted: jwt_secret -> JWT_SECRET
        Self::from_vars(std::env::vars())
    }

    /// Build a config from an explicit set of key/value pairs.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(vars)?;
        if config.jwt_secret.is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        Ok(config)
    }
}
