//! End-to-end token flow through the public API and the HTTP router

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header::AUTHORIZATION, Request, StatusCode},
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{Duration, Utc};
use jwtsvc_app::{router, AppState};
use jwtsvc_auth::{
    Identity, KeyMaterial, TokenIssuer, TokenService, TokenValidator, ValidationFailure,
};
use jwtsvc_common::Config;
use tower::ServiceExt;

fn test_config() -> Config {
    Config {
        jwt_secret: "integration-secret-key-32-bytes!!".to_string(),
        jwt_issuer: "member-api".to_string(),
        jwt_expiry_minutes: 60,
        rust_log: "jwtsvc=debug".to_string(),
        port: 0,
    }
}

fn issuer_and_validator() -> (TokenIssuer, TokenValidator) {
    let key = Arc::new(KeyMaterial::from_config(&test_config()).unwrap());
    (TokenIssuer::new(key.clone()), TokenValidator::new(key))
}

mod test_token_lifecycle {
    use super::*;

    #[test_log::test]
    fn test_issue_parse_decode_scenario() {
        let (issuer, validator) = issuer_and_validator();
        let identity = Identity::new("a@x.com", "A");

        let token = issuer.issue(&identity, 60).unwrap();
        assert_eq!(validator.is_valid(token.as_str()), Ok(true));

        let decoded = validator.validate(token.as_str()).unwrap();
        assert_eq!(decoded.email, "a@x.com");
        assert_eq!(decoded.name.as_deref(), Some("A"));
        assert_eq!(decoded.role, None);

        // Same token once its hour is over
        let elapsed = issuer
            .issue_at(&identity, 60, Utc::now() - Duration::minutes(60) - Duration::seconds(5))
            .unwrap();
        assert_eq!(validator.is_valid(elapsed.as_str()), Ok(false));
        assert_eq!(
            validator.validate(elapsed.as_str()),
            Err(ValidationFailure::Expired)
        );
    }

    #[test]
    fn test_wire_format_is_compact_hs256() {
        let (issuer, _) = issuer_and_validator();
        let token = issuer.issue(&Identity::new("a@x.com", "A"), 60).unwrap();

        let segments: Vec<&str> = token.as_str().split('.').collect();
        assert_eq!(segments.len(), 3);
        assert!(segments.iter().all(|s| !s.contains('=')));

        let header: serde_json::Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(segments[0]).unwrap()).unwrap();
        assert_eq!(header["typ"], "JWT");
        assert_eq!(header["alg"], "HS256");

        // 32-byte HMAC-SHA256 tag
        assert_eq!(URL_SAFE_NO_PAD.decode(segments[2]).unwrap().len(), 32);
    }

    #[test]
    fn test_token_verifiable_with_plain_jsonwebtoken() {
        let (issuer, _) = issuer_and_validator();
        let token = issuer.issue(&Identity::new("a@x.com", "A"), 60).unwrap();

        let mut validation = jsonwebtoken::Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.set_audience(&["seok"]);
        validation.set_issuer(&["member-api"]);
        let data = jsonwebtoken::decode::<serde_json::Value>(
            token.as_str(),
            &jsonwebtoken::DecodingKey::from_secret(test_config().jwt_secret.as_bytes()),
            &validation,
        )
        .unwrap();

        assert_eq!(data.claims["sub"], "jwt-service");
        assert_eq!(data.claims["email"], "a@x.com");
    }

    #[test]
    fn test_empty_input_stays_fatal() {
        let (_, validator) = issuer_and_validator();
        let failure = validator.is_valid("").unwrap_err();
        assert!(failure.is_fatal());
    }
}

mod test_http_flow {
    use super::*;

    #[tokio::test]
    async fn test_me_endpoint_with_issued_token() {
        let tokens = TokenService::from_config(&test_config()).unwrap();
        let token = tokens
            .issue_default(&Identity::new("member@example.com", "Member"))
            .unwrap();
        let app = router(AppState { tokens });

        let req = Request::get("/me")
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["email"], "member@example.com");
    }

    #[tokio::test]
    async fn test_me_endpoint_with_foreign_token() {
        let tokens = TokenService::from_config(&test_config()).unwrap();
        let app = router(AppState { tokens });

        let other = TokenService::new(Arc::new(
            KeyMaterial::new("a-completely-different-32-byte-key", "member-api", 60).unwrap(),
        ));
        let token = other.issue(&Identity::new("a@x.com", "A"), 60).unwrap();

        let req = Request::get("/me")
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
