//! Request middleware.

pub mod rate_limit;

pub use rate_limit::{denial_response, rate_limit_middleware, RateLimitState};
