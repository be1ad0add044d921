//! Startup orchestration.
//!
//! Builds every component from a validated [`ShieldConfig`], starts the
//! metrics endpoint and the limiter sweepers, and hands back one handle
//! the application keeps for its lifetime.

use std::time::Duration;

use tokio::task::JoinHandle;

use crate::config::ShieldConfig;
use crate::crypto::{CodecError, FieldCodec};
use crate::http::RateLimitState;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::sanitize::RedactionPolicy;
use crate::security::{PolicyKind, RateLimiters};

/// Running protection layer.
pub struct ShieldRuntime {
    key_env: String,
    limiters: RateLimiters,
    redaction: RedactionPolicy,
    shutdown: Shutdown,
    sweepers: Vec<JoinHandle<()>>,
}

impl ShieldRuntime {
    /// Must be called inside a Tokio runtime.
    pub fn start(config: &ShieldConfig) -> Self {
        let observability = &config.observability;
        if observability.metrics_enabled {
            match observability.metrics_address.parse() {
                Ok(addr) => metrics::init_metrics(addr),
                Err(_) => tracing::error!(
                    metrics_address = %observability.metrics_address,
                    "Failed to parse metrics address"
                ),
            }
        }

        // Absent key is only fatal when a field is actually encrypted.
        if let Err(e) = FieldCodec::from_env_var(&config.crypto.key_env) {
            tracing::warn!(error = %e, "Field encryption unavailable until the key is provided");
        }

        let limiters = RateLimiters::from_config(&config.rate_limit);
        let shutdown = Shutdown::new();
        let interval = Duration::from_secs(config.rate_limit.sweep_interval_secs);
        let sweepers = limiters.spawn_sweepers(interval, &shutdown);

        tracing::info!(
            rate_limit_enabled = config.rate_limit.enabled,
            sweepers = sweepers.len(),
            "Protection layer started"
        );

        Self {
            key_env: config.crypto.key_env.clone(),
            limiters,
            redaction: RedactionPolicy::from_config(&config.redaction),
            shutdown,
            sweepers,
        }
    }

    /// Codec for the configured key, read from the environment now.
    pub fn codec(&self) -> Result<FieldCodec, CodecError> {
        FieldCodec::from_env_var(&self.key_env)
    }

    pub fn limiters(&self) -> &RateLimiters {
        &self.limiters
    }

    /// Middleware state for one policy, honouring `rate_limit.enabled`.
    pub fn rate_limit_state(&self, kind: PolicyKind) -> RateLimitState {
        RateLimitState::new(self.limiters.get(kind).clone())
    }

    pub fn redaction(&self) -> &RedactionPolicy {
        &self.redaction
    }

    /// Stop the sweepers and wait for them to exit.
    pub async fn shutdown(self) {
        self.shutdown.trigger();
        for handle in self.sweepers {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Sweeper task failed");
            }
        }
        tracing::info!("Protection layer stopped");
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::*;

    #[tokio::test]
    async fn test_start_and_shutdown() {
        let runtime = ShieldRuntime::start(&ShieldConfig::default());
        assert_eq!(runtime.sweepers.len(), 5);
        assert!(runtime.limiters().auth.check("1.1.1.1", "/login").is_allowed());
        assert!(runtime.redaction().is_sensitive("ssn"));
        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_disabled_rate_limit_is_passthrough() {
        let mut config = ShieldConfig::default();
        config.rate_limit.enabled = false;
        config.rate_limit.auth.window_ms = 1;
        let runtime = ShieldRuntime::start(&config);
        assert_eq!(runtime.sweepers.len(), 5);

        let auth = &runtime.limiters().auth;
        for _ in 0..10 {
            assert!(auth.check("10.0.0.1", "/login").is_allowed());
        }
        for i in 0..100 {
            assert!(auth.check(&format!("10.1.0.{i}"), "/login").is_allowed());
        }
        assert_eq!(auth.tracked_keys(), 0);

        for kind in PolicyKind::ALL {
            assert!(!runtime.rate_limit_state(kind).enabled);
        }
        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_enabled_state_follows_config() {
        let runtime = ShieldRuntime::start(&ShieldConfig::default());
        let state = runtime.rate_limit_state(PolicyKind::Auth);
        assert!(state.enabled);
        assert_eq!(state.limiter.name(), "auth");
        runtime.shutdown().await;
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_missing_key_logged_once_as_warning() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .with_writer(move || writer.clone())
            .finish();

        let mut config = ShieldConfig::default();
        config.crypto.key_env = "PII_SHIELD_STARTUP_LOG_TEST_UNSET".into();
        let runtime =
            tracing::subscriber::with_default(subscriber, || ShieldRuntime::start(&config));
        runtime.shutdown().await;

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        let mentions: Vec<&str> = output
            .lines()
            .filter(|line| line.contains("PII_SHIELD_STARTUP_LOG_TEST_UNSET"))
            .collect();
        assert_eq!(mentions.len(), 1, "{output}");
        assert!(mentions[0].contains("WARN"));
        assert!(!output.contains("ERROR"));
    }

    #[tokio::test]
    async fn test_codec_reports_configured_var() {
        let mut config = ShieldConfig::default();
        config.crypto.key_env = "PII_SHIELD_RUNTIME_TEST_UNSET".into();
        let runtime = ShieldRuntime::start(&config);
        let err = runtime.codec().unwrap_err();
        assert!(err.to_string().contains("PII_SHIELD_RUNTIME_TEST_UNSET"));
        runtime.shutdown().await;
    }
}
