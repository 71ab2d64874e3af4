//! Cloneable token service placed in application state
//!
//! Bundles an issuer and a validator over one shared key.
//! Application states expose it via `FromRef`:
//! ```ignore
//! impl FromRef<AppState> for TokenService {
//!     fn from_ref(state: &AppState) -> Self {
//!         state.tokens.clone()
//!     }
//! }
//! ```

use std::sync::Arc;

use jwtsvc_common::Config;

use crate::claims::Identity;
use crate::error::{AuthError, IssueError, KeyError, ValidationFailure};
use crate::issuer::{Token, TokenIssuer};
use crate::key::KeyMaterial;
use crate::validator::TokenValidator;

#[derive(Debug, Clone)]
pub struct TokenService {
    issuer: TokenIssuer,
    validator: TokenValidator,
}

impl TokenService {
    pub fn new(key: Arc<KeyMaterial>) -> Self {
        Self {
            issuer: TokenIssuer::new(key.clone()),
            validator: TokenValidator::new(key),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, KeyError> {
        let key = KeyMaterial::from_config(config)?;
        tracing::info!(
            issuer = %key.issuer(),
            default_expiry_minutes = key.default_expiry_minutes(),
            "Token key material loaded"
        );
        Ok(Self::new(Arc::new(key)))
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    pub fn validator(&self) -> &TokenValidator {
        &self.validator
    }

    pub fn issue(&self, identity: &Identity, ttl_minutes: i64) -> Result<Token, IssueError> {
        self.issuer.issue(identity, ttl_minutes)
    }

    pub fn issue_default(&self, identity: &Identity) -> Result<Token, IssueError> {
        self.issuer.issue_default(identity)
    }

    pub fn validate(&self, token: &str) -> Result<Identity, ValidationFailure> {
        self.validator.validate(token)
    }

    /// Validation used by the HTTP extractors
    pub(crate) fn authenticate(&self, token: &str) -> Result<Identity, AuthError> {
        let identity = self.validator.validate(token)?;
        tracing::debug!(email = %identity.email, "Bearer token authenticated");
        Ok(identity)
    }
}
