//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config.

use anyhow::Result;
use std::env;
use std::fmt;

/// Token lifetime used when `JWT_EXPIRY_MINUTES` is not set
pub const DEFAULT_EXPIRY_MINUTES: i64 = 30;

#[derive(Clone)]
pub struct Config {
    /// HMAC signing secret
    pub jwt_secret: String,

    /// Issuer label written into every token
    pub jwt_issuer: String,

    /// Default token lifetime in minutes
    pub jwt_expiry_minutes: i64,

    /// Runtime configuration
    pub rust_log: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let jwt_expiry_minutes = match env::var("JWT_EXPIRY_MINUTES") {
            Ok(raw) => raw.trim().parse::<i64>().map_err(|e| {
                anyhow::anyhow!("JWT_EXPIRY_MINUTES must be an integer number of minutes: {e}")
            })?,
            Err(_) => DEFAULT_EXPIRY_MINUTES,
        };

        let config = Self {
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET is required"))?,
            jwt_issuer: env::var("JWT_ISSUER")
                .map_err(|_| anyhow::anyhow!("JWT_ISSUER is required"))?,
            jwt_expiry_minutes,

            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "jwtsvc=debug".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
        };

        Ok(config)
    }
}

impl fmt::Debug for Config {
    #[mutants::skip]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_issuer", &self.jwt_issuer)
            .field("jwt_expiry_minutes", &self.jwt_expiry_minutes)
            .field("rust_log", &self.rust_log)
            .field("port", &self.port)
            .finish()
    }
}
