//! HMAC key material derived once from configuration

use std::fmt;

use jsonwebtoken::{DecodingKey, EncodingKey};
use jwtsvc_common::Config;

use crate::error::KeyError;

/// Minimum secret length for HS256 (256 bits)
pub const MIN_SECRET_BYTES: usize = 32;

/// Upper bound for the configured default lifetime (one year)
pub const MAX_DEFAULT_EXPIRY_MINUTES: i64 = 365 * 24 * 60;

/// Signing key plus the issuer label and default lifetime it is used with.
///
/// Immutable after construction; share it behind an `Arc`.
pub struct KeyMaterial {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    default_expiry_minutes: i64,
}

impl KeyMaterial {
    /// Derive key material from a secret.
    ///
    /// Secrets shorter than [`MIN_SECRET_BYTES`] are rejected, never padded.
    pub fn new(
        secret: &str,
        issuer: impl Into<String>,
        default_expiry_minutes: i64,
    ) -> Result<Self, KeyError> {
        if secret.is_empty() {
            return Err(KeyError::EmptySecret);
        }
        if secret.len() < MIN_SECRET_BYTES {
            return Err(KeyError::InsufficientEntropy {
                len: secret.len(),
                min: MIN_SECRET_BYTES,
            });
        }

        let issuer = issuer.into();
        if issuer.trim().is_empty() {
            return Err(KeyError::EmptyIssuer);
        }
        if !(1..=MAX_DEFAULT_EXPIRY_MINUTES).contains(&default_expiry_minutes) {
            return Err(KeyError::InvalidDefaultExpiry(default_expiry_minutes));
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            default_expiry_minutes,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, KeyError> {
        Self::new(
            &config.jwt_secret,
            config.jwt_issuer.clone(),
            config.jwt_expiry_minutes,
        )
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn default_expiry_minutes(&self) -> i64 {
        self.default_expiry_minutes
    }

    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.decoding
    }
}

impl fmt::Debug for KeyMaterial {
    #[mutants::skip]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("key", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("default_expiry_minutes", &self.default_expiry_minutes)
            .finish()
    }
}
