//! Signed identity tokens for the member service
//!
//! Issues and validates HS256 JWTs carrying a member's identity claims, and
//! provides axum extractors that work with any state implementing
//! `FromRef<S>` for `TokenService`.

mod claims;
mod error;
mod extractors;
mod issuer;
mod jwt;
mod key;
mod service;
mod validator;

pub use claims::{
    ClaimsCodec, Identity, PrivateClaims, TokenClaims, TOKEN_AUDIENCE, TOKEN_SUBJECT,
};
pub use error::{AuthError, IssueError, KeyError, ValidationFailure};
pub use extractors::AuthUser;
pub use issuer::{Token, TokenIssuer};
pub use key::{KeyMaterial, MAX_DEFAULT_EXPIRY_MINUTES, MIN_SECRET_BYTES};
pub use service::TokenService;
pub use validator::TokenValidator;
