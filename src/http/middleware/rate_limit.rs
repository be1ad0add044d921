//! Rate limit middleware.
//! Turns a limiter's Deny into a 429 before the handler runs.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::security::{client_identity, Decision, Denial, RateLimiter};

/// State for one gated route group.
#[derive(Clone)]
pub struct RateLimitState {
    pub limiter: Arc<RateLimiter>,
    pub enabled: bool,
}

impl RateLimitState {
    /// Gate follows the limiter's own enabled flag.
    pub fn new(limiter: Arc<RateLimiter>) -> Self {
        let enabled = limiter.is_enabled();
        Self { limiter, enabled }
    }
}

pub async fn rate_limit_middleware(
    State(state): State<RateLimitState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    // Passthrough mode.
    if !state.enabled {
        return next.run(request).await;
    }

    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let identity = client_identity(request.headers(), peer);

    let decision = state.limiter.check(&identity, request.uri().path());
    match decision {
        Decision::Allow => next.run(request).await,
        Decision::Deny(denial) => denial_response(&denial),
    }
}

/// 429 with `Retry-After`, `X-RateLimit-*` headers and a JSON body
/// carrying the policy message verbatim.
pub fn denial_response(denial: &Denial) -> Response {
    let body = Json(json!({
        "error": denial.message,
        "retryAfter": denial.retry_after_secs,
    }));

    let status = StatusCode::from_u16(denial.status).unwrap_or(StatusCode::TOO_MANY_REQUESTS);
    let mut response = (status, body).into_response();

    let headers = response.headers_mut();
    headers.insert(header::RETRY_AFTER, HeaderValue::from(denial.retry_after_secs));
    headers.insert("x-ratelimit-limit", HeaderValue::from(denial.limit));
    headers.insert("x-ratelimit-remaining", HeaderValue::from(denial.remaining));
    headers.insert("x-ratelimit-reset", HeaderValue::from(denial.reset_at_epoch_ms));
    response
}
