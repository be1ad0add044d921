//! Named rate limit policies.
//!
//! Every policy runs the same fixed-window mechanics; only the window,
//! budget and message differ.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::config::{PolicyConfig, RateLimitConfig};
use crate::lifecycle::Shutdown;
use crate::security::rate_limit::RateLimiter;

/// Message used when a policy does not configure its own.
pub const DEFAULT_MESSAGE: &str = "Too many requests, please try again later.";

/// Window, budget and rejection message for one limiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub name: String,
    pub window: Duration,
    pub max: u32,
    pub message: String,
}

impl RateLimitPolicy {
    pub fn new(name: impl Into<String>, window: Duration, max: u32, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            window,
            max,
            message: message.into(),
        }
    }

    pub fn from_config(name: &str, config: &PolicyConfig) -> Self {
        let message = config
            .message
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MESSAGE.to_string());
        Self::new(name, Duration::from_millis(config.window_ms), config.max, message)
    }
}

/// The policies the application routes are gated by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyKind {
    /// Login and sign-up attempts.
    Auth,
    /// General API calls.
    Api,
    /// Read-heavy browsing.
    Browse,
    /// Credential reset and other irreversible actions.
    PasswordReset,
    /// Expensive writes such as application submission.
    Submission,
}

impl PolicyKind {
    pub const ALL: [PolicyKind; 5] = [
        PolicyKind::Auth,
        PolicyKind::Api,
        PolicyKind::Browse,
        PolicyKind::PasswordReset,
        PolicyKind::Submission,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PolicyKind::Auth => "auth",
            PolicyKind::Api => "api",
            PolicyKind::Browse => "browse",
            PolicyKind::PasswordReset => "password_reset",
            PolicyKind::Submission => "submission",
        }
    }

    fn config(self, config: &RateLimitConfig) -> &PolicyConfig {
        match self {
            PolicyKind::Auth => &config.auth,
            PolicyKind::Api => &config.api,
            PolicyKind::Browse => &config.browse,
            PolicyKind::PasswordReset => &config.password_reset,
            PolicyKind::Submission => &config.submission,
        }
    }
}

/// One independent limiter per [`PolicyKind`].
#[derive(Debug, Clone)]
pub struct RateLimiters {
    pub auth: Arc<RateLimiter>,
    pub api: Arc<RateLimiter>,
    pub browse: Arc<RateLimiter>,
    pub password_reset: Arc<RateLimiter>,
    pub submission: Arc<RateLimiter>,
}

impl RateLimiters {
    pub fn from_config(config: &RateLimitConfig) -> Self {
        let build = |kind: PolicyKind| {
            Arc::new(
                RateLimiter::new(RateLimitPolicy::from_config(kind.as_str(), kind.config(config)))
                    .with_enabled(config.enabled),
            )
        };
        Self {
            auth: build(PolicyKind::Auth),
            api: build(PolicyKind::Api),
            browse: build(PolicyKind::Browse),
            password_reset: build(PolicyKind::PasswordReset),
            submission: build(PolicyKind::Submission),
        }
    }

    pub fn get(&self, kind: PolicyKind) -> &Arc<RateLimiter> {
        match kind {
            PolicyKind::Auth => &self.auth,
            PolicyKind::Api => &self.api,
            PolicyKind::Browse => &self.browse,
            PolicyKind::PasswordReset => &self.password_reset,
            PolicyKind::Submission => &self.submission,
        }
    }

    /// Start one sweeper per limiter.
    pub fn spawn_sweepers(&self, interval: Duration, shutdown: &Shutdown) -> Vec<JoinHandle<()>> {
        PolicyKind::ALL
            .iter()
            .map(|kind| self.get(*kind).spawn_sweeper(interval, shutdown.subscribe()))
            .collect()
    }
}

impl Default for RateLimiters {
    fn default() -> Self {
        Self::from_config(&RateLimitConfig::default())
    }
}
