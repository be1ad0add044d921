//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{body::Body, http::Request, middleware, routing::get, Router};

use pii_shield::crypto::{EncryptionKey, FieldCodec};
use pii_shield::http::{rate_limit_middleware, RateLimitState};
use pii_shield::security::{RateLimitPolicy, RateLimiter};

/// Codec under a fixed test key.
pub fn test_codec() -> FieldCodec {
    FieldCodec::new(&EncryptionKey::from_bytes([0x5a; 32]))
}

pub fn limiter(name: &str, max: u32, window: Duration, message: &str) -> Arc<RateLimiter> {
    Arc::new(RateLimiter::new(RateLimitPolicy::new(name, window, max, message)))
}

/// Router with `/login` and `/apply` gated by `limiter`.
pub fn gated_router(limiter: Arc<RateLimiter>) -> Router {
    Router::new()
        .route("/login", get(|| async { "ok" }))
        .route("/apply", get(|| async { "ok" }))
        .layer(middleware::from_fn_with_state(
            RateLimitState::new(limiter),
            rate_limit_middleware,
        ))
}

pub fn request_from(path: &str, forwarded_for: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(path);
    if let Some(ip) = forwarded_for {
        builder = builder.header("x-forwarded-for", ip);
    }
    builder.body(Body::empty()).unwrap()
}
