//! Input sanitization and log redaction.
//!
//! # Data Flow
//! ```text
//! Inbound request fields:
//!     → scalar.rs (escape, strip tags, normalize SSN/phone/email/number)
//!     → deep.rs (strip tags from every string leaf of a JSON body)
//!     → business logic
//!
//! Anything headed for logs, audit trails or echoed responses:
//!     → redact.rs (replace values under sensitive keys with a marker)
//! ```
//!
//! # Design Decisions
//! - Every function is total: malformed input yields a safe default
//! - Structured input is `serde_json::Value`; recursion is a match over it
//! - Sensitive key fragments are data, so callers can extend them

pub mod deep;
pub mod redact;
pub mod scalar;

pub use deep::deep_sanitize_text;
pub use redact::{redact, RedactionPolicy, REDACTED};
pub use scalar::{
    coerce_number, escape_html, is_valid_ssn, normalize_email, normalize_phone, normalize_ssn,
    parse_number, strip_tags,
};
