//! Token service application composition root
//!
//! Wires the token service into an axum router.

use axum::{extract::FromRef, routing::get, Json, Router};
use jwtsvc_auth::{AuthUser, Identity, TokenService};
use jwtsvc_common::Config;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub tokens: TokenService,
}

impl FromRef<AppState> for TokenService {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

/// Create the main application router with all routes
pub fn create_app(config: &Config) -> Result<Router, anyhow::Error> {
    let tokens = TokenService::from_config(config)
        .map_err(|e| anyhow::anyhow!("Invalid token configuration: {e}"))?;

    Ok(router(AppState { tokens }))
}

/// Build the router over an existing state
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/", get(|| async { "jwtsvc v0.0.1-SNAPSHOT" }))
        .route("/me", get(current_identity))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Echo the identity carried by the caller's bearer token
async fn current_identity(AuthUser(identity): AuthUser) -> Json<Identity> {
    Json(identity)
}
