//! Admission control.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → identity.rs (X-Forwarded-For / X-Real-IP / peer / "unknown")
//!     → rate_limit.rs (count per identity-route in a fixed window)
//!     → Allow: continue to sanitization and business logic
//!     → Deny: caller answers 429 with Retry-After
//!
//! Background:
//!     sweeper task per limiter drops expired records
//! ```
//!
//! # Design Decisions
//! - A Deny is a value, not an error; callers must check it
//! - Counters live in memory per process; horizontally scaled
//!   deployments enforce the limit per instance
//! - policies.rs builds every preset from the same limiter type

pub mod identity;
pub mod policies;
pub mod rate_limit;

pub use identity::client_identity;
pub use policies::{PolicyKind, RateLimitPolicy, RateLimiters};
pub use rate_limit::{Decision, Denial, RateLimiter};
