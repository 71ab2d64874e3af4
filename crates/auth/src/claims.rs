//! JWT claims types

use serde::{Deserialize, Serialize};

use crate::error::ValidationFailure;

/// Fixed `sub` claim of every token this service issues
pub const TOKEN_SUBJECT: &str = "jwt-service";

/// Fixed `aud` claim of every token this service issues
pub const TOKEN_AUDIENCE: &str = "seok";

/// Who a token speaks for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable identifier, always present
    pub email: String,
    /// Display name
    pub name: Option<String>,
    /// Authorization role; reserved, absent unless the member source sets it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Identity {
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: Some(name.into()),
            role: None,
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
}

/// Private claims as they appear on the wire
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateClaims {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Full claim set: registered claims plus the private identity claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Issuer
    pub iss: String,
    /// Subject, always [`TOKEN_SUBJECT`]
    pub sub: String,
    /// Audience, always [`TOKEN_AUDIENCE`]
    pub aud: String,
    /// Issued at (seconds since epoch)
    pub iat: i64,
    /// Expires at (seconds since epoch)
    pub exp: i64,
    /// Not before (seconds since epoch)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
    #[serde(flatten)]
    pub private: PrivateClaims,
}

/// Maps an [`Identity`] to and from [`PrivateClaims`]
pub struct ClaimsCodec;

impl ClaimsCodec {
    pub fn encode(identity: &Identity) -> PrivateClaims {
        PrivateClaims {
            email: Some(identity.email.clone()),
            name: identity.name.clone(),
            role: identity.role.clone(),
        }
    }

    /// Rebuild the identity; `email` is mandatory downstream.
    pub fn decode(claims: PrivateClaims) -> Result<Identity, ValidationFailure> {
        let email = claims
            .email
            .filter(|email| !email.is_empty())
            .ok_or_else(|| ValidationFailure::MissingClaim("email".to_string()))?;

        Ok(Identity {
            email,
            name: claims.name,
            role: claims.role,
        })
    }
}
