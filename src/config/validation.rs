//! Configuration validation.
//!
//! Serde handles syntax; this checks values. All errors are collected,
//! not just the first.

use thiserror::Error;

use crate::config::schema::{PolicyConfig, ShieldConfig};
use crate::security::PolicyKind;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("crypto.key_env must name an environment variable")]
    EmptyKeyEnv,

    #[error("rate_limit.sweep_interval_secs must be greater than zero")]
    ZeroSweepInterval,

    #[error("rate_limit.{policy}.window_ms must be greater than zero")]
    ZeroWindow { policy: &'static str },

    #[error("rate_limit.{policy}.max must be greater than zero")]
    ZeroMax { policy: &'static str },

    #[error("redaction.marker must not be empty")]
    EmptyMarker,

    #[error("redaction key list contains a blank entry")]
    BlankSensitiveKey,

    #[error("redaction.sensitive_keys must not be empty")]
    NoSensitiveKeys,
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ShieldConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.crypto.key_env.trim().is_empty() {
        errors.push(ValidationError::EmptyKeyEnv);
    }

    let rate_limit = &config.rate_limit;
    if rate_limit.sweep_interval_secs == 0 {
        errors.push(ValidationError::ZeroSweepInterval);
    }

    let policies: [(PolicyKind, &PolicyConfig); 5] = [
        (PolicyKind::Auth, &rate_limit.auth),
        (PolicyKind::Api, &rate_limit.api),
        (PolicyKind::Browse, &rate_limit.browse),
        (PolicyKind::PasswordReset, &rate_limit.password_reset),
        (PolicyKind::Submission, &rate_limit.submission),
    ];
    for (kind, policy) in policies {
        if policy.window_ms == 0 {
            errors.push(ValidationError::ZeroWindow { policy: kind.as_str() });
        }
        if policy.max == 0 {
            errors.push(ValidationError::ZeroMax { policy: kind.as_str() });
        }
    }

    let redaction = &config.redaction;
    if redaction.marker.is_empty() {
        errors.push(ValidationError::EmptyMarker);
    }
    if redaction.sensitive_keys.is_empty() {
        errors.push(ValidationError::NoSensitiveKeys);
    }
    if redaction
        .sensitive_keys
        .iter()
        .chain(&redaction.extra_keys)
        .any(|k| k.trim().is_empty())
    {
        errors.push(ValidationError::BlankSensitiveKey);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(validate_config(&ShieldConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ShieldConfig::default();
        config.crypto.key_env = " ".into();
        config.rate_limit.sweep_interval_secs = 0;
        config.rate_limit.auth.window_ms = 0;
        config.rate_limit.submission.max = 0;
        config.redaction.marker.clear();
        config.redaction.extra_keys.push(String::new());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::EmptyKeyEnv,
                ValidationError::ZeroSweepInterval,
                ValidationError::ZeroWindow { policy: "auth" },
                ValidationError::ZeroMax { policy: "submission" },
                ValidationError::EmptyMarker,
                ValidationError::BlankSensitiveKey,
            ]
        );
    }

    #[test]
    fn test_empty_key_list_rejected() {
        let mut config = ShieldConfig::default();
        config.redaction.sensitive_keys.clear();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::NoSensitiveKeys]);
    }
}
