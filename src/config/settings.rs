//! Application settings loaded from environment variables.

use std::env;

use super::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, MIN_JWT_SECRET_LENGTH,
};
use crate::errors::{AppError, AppResult};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    jwt_secret: String,
    pub server_host: String,
    pub server_port: u16,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .finish()
    }
}

impl Config {
    /// Build a configuration with default server address.
    ///
    /// # Errors
    /// Returns an internal error if the JWT secret is shorter than
    /// `MIN_JWT_SECRET_LENGTH`.
    pub fn new(database_url: impl Into<String>, jwt_secret: impl Into<String>) -> AppResult<Self> {
        let jwt_secret = jwt_secret.into();
        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(AppError::internal(format!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            )));
        }

        Ok(Self {
            database_url: database_url.into(),
            jwt_secret,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
        })
    }

    /// Load configuration from environment variables (and `.env` if present).
    ///
    /// In debug builds a missing `JWT_SECRET` falls back to an insecure
    /// development value; release builds refuse to start without one.
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) if cfg!(debug_assertions) => {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                "dev-secret-key-minimum-32-chars!!".to_string()
            }
            Err(_) => {
                return Err(AppError::internal(
                    "JWT_SECRET environment variable must be set in production",
                ))
            }
        };

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let mut config = Self::new(database_url, jwt_secret)?;
        if let Ok(host) = env::var("SERVER_HOST") {
            config.server_host = host;
        }
        if let Some(port) = env::var("SERVER_PORT").ok().and_then(|v| v.parse().ok()) {
            config.server_port = port;
        }

        Ok(config)
    }

    /// Get JWT secret bytes for token verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
