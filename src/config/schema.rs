//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files.
//! Every section defaults, so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};

use crate::crypto::ENCRYPTION_KEY_VAR;

/// Root configuration for the protection layer.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ShieldConfig {
    /// Field encryption settings.
    pub crypto: CryptoConfig,

    /// Rate limiting policies.
    pub rate_limit: RateLimitConfig,

    /// Redaction policy for logs and audit trails.
    pub redaction: RedactionConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Field encryption configuration.
///
/// The key itself never lives in the file; only the variable that holds it.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CryptoConfig {
    /// Environment variable with the hex-encoded 256-bit key.
    pub key_env: String,
}

impl Default for CryptoConfig {
    fn default() -> Self {
        Self {
            key_env: ENCRYPTION_KEY_VAR.to_string(),
        }
    }
}

/// One limiter's window and budget.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct PolicyConfig {
    /// Window length in milliseconds.
    pub window_ms: u64,

    /// Requests allowed per window.
    pub max: u32,

    /// Message returned on rejection.
    #[serde(default)]
    pub message: Option<String>,
}

impl PolicyConfig {
    fn new(window_ms: u64, max: u32, message: &str) -> Self {
        Self {
            window_ms,
            max,
            message: Some(message.to_string()),
        }
    }
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// When false every limiter allows all requests and records nothing.
    /// Sweepers run either way.
    pub enabled: bool,

    /// Interval between sweeps of expired records, in seconds.
    pub sweep_interval_secs: u64,

    /// Authentication attempts.
    pub auth: PolicyConfig,

    /// General API calls.
    pub api: PolicyConfig,

    /// Read-heavy browsing.
    pub browse: PolicyConfig,

    /// Credential reset.
    pub password_reset: PolicyConfig,

    /// Expensive submissions.
    pub submission: PolicyConfig,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        const MINUTE_MS: u64 = 60 * 1000;
        const HOUR_MS: u64 = 60 * MINUTE_MS;

        Self {
            enabled: true,
            sweep_interval_secs: 300,
            auth: PolicyConfig::new(
                15 * MINUTE_MS,
                5,
                "Too many authentication attempts, please try again after 15 minutes.",
            ),
            api: PolicyConfig::new(MINUTE_MS, 100, "Too many requests, please slow down."),
            browse: PolicyConfig::new(MINUTE_MS, 300, "Too many requests, please slow down."),
            password_reset: PolicyConfig::new(
                HOUR_MS,
                3,
                "Too many password reset attempts, please try again in an hour.",
            ),
            submission: PolicyConfig::new(
                HOUR_MS,
                10,
                "Too many submissions, please try again later.",
            ),
        }
    }
}

/// Redaction policy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RedactionConfig {
    /// Case-insensitive key fragments whose values are redacted.
    pub sensitive_keys: Vec<String>,

    /// Organization-specific additions to `sensitive_keys`.
    pub extra_keys: Vec<String>,

    /// Replacement written in place of sensitive values.
    pub marker: String,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            sensitive_keys: crate::sanitize::redact::DEFAULT_SENSITIVE_KEYS
                .iter()
                .map(|k| k.to_string())
                .collect(),
            extra_keys: Vec::new(),
            marker: crate::sanitize::redact::REDACTED.to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter directive (e.g. `info`, `pii_shield=debug`).
    pub log_level: String,

    /// Enable Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: ShieldConfig = toml::from_str("").unwrap();
        assert_eq!(config.crypto.key_env, "ENCRYPTION_KEY");
        assert_eq!(config.rate_limit.sweep_interval_secs, 300);
        assert_eq!(config.rate_limit.auth.max, 5);
        assert_eq!(config.redaction.marker, "[REDACTED]");
        assert!(config.redaction.sensitive_keys.contains(&"ssn".to_string()));
    }

    #[test]
    fn test_partial_override() {
        let config: ShieldConfig = toml::from_str(
            r#"
            [rate_limit.auth]
            window_ms = 1000
            max = 2

            [redaction]
            extra_keys = ["taxId"]
            "#,
        )
        .unwrap();

        assert_eq!(config.rate_limit.auth.window_ms, 1000);
        assert_eq!(config.rate_limit.auth.message, None);
        assert_eq!(config.rate_limit.api.max, 100);
        assert_eq!(config.redaction.extra_keys, vec!["taxId".to_string()]);
        assert_eq!(config.redaction.sensitive_keys.len(), 5);
    }
}
