//! Token issuance

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, Header};

use crate::claims::{ClaimsCodec, Identity, TokenClaims, TOKEN_AUDIENCE, TOKEN_SUBJECT};
use crate::error::IssueError;
use crate::key::KeyMaterial;

/// Compact-serialized signed token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builds and signs HS256 tokens for an [`Identity`]
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    key: Arc<KeyMaterial>,
}

impl TokenIssuer {
    pub fn new(key: Arc<KeyMaterial>) -> Self {
        Self { key }
    }

    /// Issue a token that expires `ttl_minutes` from now.
    ///
    /// Negative lifetimes are allowed and yield an already-expired token.
    /// Lifetimes that overflow the calendar fail with `TtlOutOfRange`.
    pub fn issue(&self, identity: &Identity, ttl_minutes: i64) -> Result<Token, IssueError> {
        self.issue_at(identity, ttl_minutes, Utc::now())
    }

    /// Issue a token with the configured default lifetime
    pub fn issue_default(&self, identity: &Identity) -> Result<Token, IssueError> {
        self.issue(identity, self.key.default_expiry_minutes())
    }

    /// Issue a token as if the current time were `now`
    pub fn issue_at(
        &self,
        identity: &Identity,
        ttl_minutes: i64,
        now: DateTime<Utc>,
    ) -> Result<Token, IssueError> {
        let header = Header::new(Algorithm::HS256);
        tracing::debug!(typ = ?header.typ, alg = ?header.alg, "Token header built");

        let private = ClaimsCodec::encode(identity);
        tracing::debug!(email = %identity.email, name = ?identity.name, "Token private claims built");

        let issued_at = now.timestamp();
        let expires_at = Duration::try_minutes(ttl_minutes)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or(IssueError::TtlOutOfRange(ttl_minutes))?
            .timestamp();
        tracing::debug!(iat = issued_at, exp = expires_at, "Token timestamps set");

        let claims = TokenClaims {
            iss: self.key.issuer().to_string(),
            sub: TOKEN_SUBJECT.to_string(),
            aud: TOKEN_AUDIENCE.to_string(),
            iat: issued_at,
            exp: expires_at,
            nbf: None,
            private,
        };

        let token = encode(&header, &claims, self.key.encoding_key()).map_err(|e| {
            tracing::error!(error = %e, "Failed to encode JWT");
            IssueError::from(e)
        })?;

        Ok(Token(token))
    }
}
