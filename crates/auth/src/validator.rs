//! Token validation and failure classification

use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, Validation};
use serde::Deserialize;

use crate::claims::{ClaimsCodec, Identity, TokenClaims, TOKEN_AUDIENCE, TOKEN_SUBJECT};
use crate::error::ValidationFailure;
use crate::key::KeyMaterial;

/// Registered claims every token of ours carries
const REGISTERED_CLAIMS: [&str; 5] = ["iss", "sub", "aud", "iat", "exp"];

/// Only the header field needed before handing the token to `jsonwebtoken`
#[derive(Deserialize)]
struct RawHeader {
    alg: Option<String>,
}

/// Parses tokens issued with the same [`KeyMaterial`] and classifies why a
/// token is rejected.
#[derive(Debug, Clone)]
pub struct TokenValidator {
    key: Arc<KeyMaterial>,
}

impl TokenValidator {
    pub fn new(key: Arc<KeyMaterial>) -> Self {
        Self { key }
    }

    /// Validate a token and return the identity it carries.
    ///
    /// Checks run in order: input present, structure, algorithm, signature,
    /// required claims, expiry, not-before, issuer/audience/subject.
    pub fn validate(&self, token: &str) -> Result<Identity, ValidationFailure> {
        let claims = self.validate_claims(token)?;
        ClaimsCodec::decode(claims.private)
    }

    /// Validate a token and return its full claim set
    pub fn validate_claims(&self, token: &str) -> Result<TokenClaims, ValidationFailure> {
        let token = precheck(token)?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_nbf = true;
        validation.set_issuer(&[self.key.issuer()]);
        validation.set_audience(&[TOKEN_AUDIENCE]);
        validation.sub = Some(TOKEN_SUBJECT.to_string());
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);

        let data = decode::<serde_json::Value>(token, self.key.decoding_key(), &validation)
            .map_err(|e| {
                let failure = classify(e.kind());
                tracing::debug!(error = %e, failure = ?failure, "JWT validation failed");
                failure
            })?;
        let claims = typed_claims(data.claims)?;

        tracing::debug!(
            iss = %claims.iss,
            sub = %claims.sub,
            aud = %claims.aud,
            iat = claims.iat,
            exp = claims.exp,
            nbf = ?claims.nbf,
            "JWT validated"
        );

        Ok(claims)
    }

    /// Collapse every ordinary failure to `false`.
    ///
    /// Empty input is still returned as `Err(InvalidInput)`: callers must not
    /// rely on this check to filter out a missing token.
    pub fn is_valid(&self, token: &str) -> Result<bool, ValidationFailure> {
        match self.validate(token) {
            Ok(_) => Ok(true),
            Err(failure) if failure.is_fatal() => Err(failure),
            Err(_) => Ok(false),
        }
    }

    /// Read the identity out of a token that already passed [`validate`].
    ///
    /// Signature and timestamps are not checked again, so never call this on
    /// a token that has not been validated.
    ///
    /// [`validate`]: TokenValidator::validate
    pub fn extract_identity(&self, token: &str) -> Result<Identity, ValidationFailure> {
        let token = precheck(token)?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let data = decode::<serde_json::Value>(token, self.key.decoding_key(), &validation)
            .map_err(|e| classify(e.kind()))?;

        ClaimsCodec::decode(typed_claims(data.claims)?.private)
    }
}

/// Reject empty input, broken structure and foreign algorithms before the
/// signature is looked at.
fn precheck(token: &str) -> Result<&str, ValidationFailure> {
    let token = token.trim();
    if token.is_empty() {
        return Err(ValidationFailure::InvalidInput);
    }

    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 || segments.iter().any(|s| s.is_empty()) {
        return Err(ValidationFailure::Malformed);
    }

    let decoded = segments
        .iter()
        .map(|segment| URL_SAFE_NO_PAD.decode(segment))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| ValidationFailure::Malformed)?;

    let header: RawHeader =
        serde_json::from_slice(&decoded[0]).map_err(|_| ValidationFailure::Malformed)?;

    match header.alg.as_deref() {
        Some("HS256") => Ok(token),
        Some(alg) => {
            tracing::debug!(alg = %alg, "Rejecting token with unsupported algorithm");
            Err(ValidationFailure::Unsupported)
        }
        None => Err(ValidationFailure::Malformed),
    }
}

/// Turn a verified payload into [`TokenClaims`], naming the first absent
/// registered claim instead of reporting a shape error.
fn typed_claims(payload: serde_json::Value) -> Result<TokenClaims, ValidationFailure> {
    if !payload.is_object() {
        return Err(ValidationFailure::Malformed);
    }
    if let Some(missing) = REGISTERED_CLAIMS
        .iter()
        .find(|claim| payload.get(**claim).map_or(true, |v| v.is_null()))
    {
        return Err(ValidationFailure::MissingClaim((*missing).to_string()));
    }

    serde_json::from_value(payload).map_err(|e| {
        tracing::debug!(error = %e, "JWT claims have unexpected types");
        ValidationFailure::Malformed
    })
}

fn classify(kind: &ErrorKind) -> ValidationFailure {
    match kind {
        ErrorKind::InvalidSignature => ValidationFailure::BadSignature,
        ErrorKind::ExpiredSignature => ValidationFailure::Expired,
        ErrorKind::ImmatureSignature => ValidationFailure::Premature,
        ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
            ValidationFailure::Unsupported
        }
        ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience | ErrorKind::InvalidSubject => {
            ValidationFailure::ClaimMismatch
        }
        ErrorKind::MissingRequiredClaim(claim) => ValidationFailure::MissingClaim(claim.clone()),
        _ => ValidationFailure::Malformed,
    }
}
