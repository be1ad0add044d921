//! Sensitive-data protection layer for a loan origination service.
//!
//! Three independent components, used by request handlers in this order:
//!
//! ```text
//! request → security (rate limit gate)
//!         → sanitize (clean inbound fields)
//!         → business logic
//!         → crypto (encrypt fields bound for storage)
//!         → sanitize::redact (anything bound for logs or audit)
//! ```

pub mod config;
pub mod crypto;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod sanitize;
pub mod security;

pub use config::ShieldConfig;
pub use crypto::{CodecError, FieldCodec};
pub use lifecycle::{ShieldRuntime, Shutdown};
pub use sanitize::RedactionPolicy;
pub use security::{Decision, RateLimiter, RateLimiters};
