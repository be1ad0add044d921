//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters and gauges)
//!
//! Consumers:
//!     → stderr log stream
//!     → Metrics endpoint (Prometheus scrape), when enabled
//! ```
//!
//! # Design Decisions
//! - Never log plaintext, keys or envelope contents
//! - Client identities appear only in rate limit rejections
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
