//! HTTP integration.
//!
//! # Data Flow
//! ```text
//! Request
//!     → middleware/rate_limit.rs (identity + route → limiter)
//!     → Allow: inner handler
//!     → Deny: 429 + Retry-After, handler never runs
//! ```

pub mod middleware;

pub use middleware::{rate_limit_middleware, RateLimitState};
