//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ShieldConfig (validated, immutable)
//!     → limiters, redaction policy, logging built from it
//!
//! Secrets:
//!     ENCRYPTION_KEY is read from the environment by the codec on use,
//!     never from the file
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - A missing key does not fail startup, only codec calls

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    CryptoConfig, ObservabilityConfig, PolicyConfig, RateLimitConfig, RedactionConfig,
    ShieldConfig,
};
pub use validation::{validate_config, ValidationError};
