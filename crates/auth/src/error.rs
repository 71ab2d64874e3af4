//! Token and authentication errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Why a token was rejected.
///
/// Every variant except [`ValidationFailure::InvalidInput`] is an ordinary
/// outcome of checking untrusted input. `InvalidInput` means the caller
/// handed over an empty token, which is a contract violation rather than a
/// security event.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationFailure {
    #[error("token is not a well-formed compact JWT")]
    Malformed,

    #[error("token signature does not match")]
    BadSignature,

    #[error("token has expired")]
    Expired,

    #[error("token uses an unsupported or unsigned algorithm")]
    Unsupported,

    #[error("token is not valid yet")]
    Premature,

    #[error("token is missing required claim `{0}`")]
    MissingClaim(String),

    #[error("token was issued for a different issuer, audience or subject")]
    ClaimMismatch,

    #[error("token input is empty")]
    InvalidInput,
}

impl ValidationFailure {
    /// True for the caller-contract violation that must not be collapsed
    /// into a plain "invalid" answer.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ValidationFailure::InvalidInput)
    }
}

/// Key material could not be built from configuration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    #[error("signing secret is empty")]
    EmptySecret,

    #[error("signing secret is {len} bytes, HS256 requires at least {min}")]
    InsufficientEntropy { len: usize, min: usize },

    #[error("issuer label is empty")]
    EmptyIssuer,

    #[error("default expiry must be between 1 and {max} minutes, got {0}", max = crate::key::MAX_DEFAULT_EXPIRY_MINUTES)]
    InvalidDefaultExpiry(i64),
}

/// Token could not be signed
#[derive(Debug, thiserror::Error)]
pub enum IssueError {
    #[error("failed to encode token: {0}")]
    Encoding(#[from] jsonwebtoken::errors::Error),

    #[error("token lifetime of {0} minutes is out of range")]
    TtlOutOfRange(i64),
}

/// Authentication error surfaced to HTTP callers
#[derive(Debug)]
pub enum AuthError {
    MissingAuthorization,
    InvalidAuthorizationFormat,
    Token(ValidationFailure),
}

impl From<ValidationFailure> for AuthError {
    fn from(failure: ValidationFailure) -> Self {
        AuthError::Token(failure)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AuthError::MissingAuthorization => (
                StatusCode::UNAUTHORIZED,
                "MISSING_AUTHORIZATION",
                "Authorization header required",
            ),
            AuthError::InvalidAuthorizationFormat
            | AuthError::Token(ValidationFailure::InvalidInput) => (
                StatusCode::UNAUTHORIZED,
                "INVALID_AUTHORIZATION",
                "Invalid authorization header format",
            ),
            AuthError::Token(ValidationFailure::Expired) => (
                StatusCode::UNAUTHORIZED,
                "TOKEN_EXPIRED",
                "Token has expired",
            ),
            AuthError::Token(ValidationFailure::Premature) => (
                StatusCode::UNAUTHORIZED,
                "TOKEN_NOT_YET_VALID",
                "Token is not valid yet",
            ),
            AuthError::Token(_) => (
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                "Invalid token",
            ),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_status_codes() {
        let cases: Vec<AuthError> = vec![
            AuthError::MissingAuthorization,
            AuthError::InvalidAuthorizationFormat,
            AuthError::Token(ValidationFailure::Malformed),
            AuthError::Token(ValidationFailure::BadSignature),
            AuthError::Token(ValidationFailure::Expired),
            AuthError::Token(ValidationFailure::Premature),
            AuthError::Token(ValidationFailure::InvalidInput),
        ];

        for error in cases {
            let response = error.into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[tokio::test]
    async fn test_expired_token_has_distinct_code() {
        let response = AuthError::Token(ValidationFailure::Expired).into_response();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["code"], "TOKEN_EXPIRED");

        let response = AuthError::Token(ValidationFailure::BadSignature).into_response();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["code"], "INVALID_TOKEN");
    }

    #[test]
    fn test_only_invalid_input_is_fatal() {
        assert!(ValidationFailure::InvalidInput.is_fatal());
        for failure in [
            ValidationFailure::Malformed,
            ValidationFailure::BadSignature,
            ValidationFailure::Expired,
            ValidationFailure::Unsupported,
            ValidationFailure::Premature,
            ValidationFailure::MissingClaim("email".to_string()),
            ValidationFailure::ClaimMismatch,
        ] {
            assert!(!failure.is_fatal(), "{failure:?} should not be fatal");
        }
    }
}
