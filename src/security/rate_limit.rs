//! Fixed-window rate limiting keyed by client identity and route.

use std::sync::{Arc, Weak};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time;

use crate::observability::metrics;
use crate::security::policies::RateLimitPolicy;

/// HTTP status carried by every [`Denial`].
pub const TOO_MANY_REQUESTS: u16 = 429;

/// Default sweep interval for expired records.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Request count inside the current window for one `identity-route` key.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitRecord {
    pub count: u32,
    pub window_reset_at: Instant,
}

impl RateLimitRecord {
    fn fresh(now: Instant, window: Duration) -> Self {
        Self {
            count: 1,
            window_reset_at: now + window,
        }
    }

    /// Expired records count as absent.
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.window_reset_at
    }
}

/// Returned when a request exceeds its window's budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denial {
    pub status: u16,
    pub message: String,
    pub limit: u32,
    pub remaining: u32,
    pub retry_after_secs: u64,
    pub reset_at_epoch_ms: u64,
}

/// Outcome of [`RateLimiter::check`]. A `Deny` must be turned into a rejection.
#[must_use = "a Deny decision must be enforced by the caller"]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(Denial),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn denial(&self) -> Option<&Denial> {
        match self {
            Decision::Allow => None,
            Decision::Deny(denial) => Some(denial),
        }
    }
}

/// One limiter per policy. Instances never share counters.
pub struct RateLimiter {
    name: String,
    window: Duration,
    max: u32,
    message: String,
    enabled: bool,
    records: DashMap<String, RateLimitRecord>,
}

impl RateLimiter {
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            name: policy.name,
            window: policy.window,
            max: policy.max,
            message: policy.message,
            enabled: true,
            records: DashMap::new(),
        }
    }

    /// A disabled limiter allows everything and records nothing.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Number of tracked keys, expired or not.
    pub fn tracked_keys(&self) -> usize {
        self.records.len()
    }

    /// Count this request and decide whether it may proceed.
    pub fn check(&self, identity: &str, route: &str) -> Decision {
        self.check_at(identity, route, Instant::now())
    }

    /// [`check`](Self::check) against an explicit clock reading.
    pub fn check_at(&self, identity: &str, route: &str, now: Instant) -> Decision {
        if !self.enabled {
            return Decision::Allow;
        }

        let key = format!("{identity}-{route}");

        // The entry guard holds the shard lock for the whole read-modify-write.
        let record = match self.records.entry(key) {
            Entry::Vacant(vacant) => {
                vacant.insert(RateLimitRecord::fresh(now, self.window));
                return Decision::Allow;
            }
            Entry::Occupied(mut occupied) => {
                let record = occupied.get_mut();
                if record.is_expired(now) {
                    *record = RateLimitRecord::fresh(now, self.window);
                    return Decision::Allow;
                }
                record.count = record.count.saturating_add(1);
                *record
            }
        };

        if record.count <= self.max {
            return Decision::Allow;
        }

        let remaining = record.window_reset_at.saturating_duration_since(now);
        let retry_after_secs = (remaining.as_millis().div_ceil(1000) as u64).max(1);
        let reset_at_epoch_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .saturating_add(remaining)
            .as_millis() as u64;

        tracing::warn!(
            policy = %self.name,
            client = %identity,
            route = %route,
            count = record.count,
            limit = self.max,
            retry_after_secs,
            "Rate limit exceeded"
        );
        metrics::record_rate_limited(&self.name);

        Decision::Deny(Denial {
            status: TOO_MANY_REQUESTS,
            message: self.message.clone(),
            limit: self.max,
            remaining: 0,
            retry_after_secs,
            reset_at_epoch_ms,
        })
    }

    /// Drop every record whose window has passed. Returns how many were removed.
    pub fn sweep_expired(&self) -> usize {
        self.sweep_expired_at(Instant::now())
    }

    pub fn sweep_expired_at(&self, now: Instant) -> usize {
        let before = self.records.len();
        // retain takes the same shard locks as check_at.
        self.records.retain(|_, record| !record.is_expired(now));
        let removed = before.saturating_sub(self.records.len());

        metrics::record_tracked_keys(&self.name, self.records.len());
        if removed > 0 {
            tracing::debug!(policy = %self.name, removed, "Swept expired rate limit records");
        }
        removed
    }

    /// Sweep periodically until shutdown or until the limiter is dropped.
    pub fn spawn_sweeper(
        self: &Arc<Self>,
        interval: Duration,
        mut shutdown: broadcast::Receiver<()>,
    ) -> JoinHandle<()> {
        let limiter: Weak<Self> = Arc::downgrade(self);
        let name = self.name.clone();

        tokio::spawn(async move {
            let mut ticker = time::interval(interval);
            // First tick completes immediately.
            ticker.tick().await;

            tracing::info!(policy = %name, interval_secs = interval.as_secs(), "Rate limit sweeper starting");
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let Some(limiter) = limiter.upgrade() else {
                            break;
                        };
                        limiter.sweep_expired();
                    }
                    _ = shutdown.recv() => {
                        tracing::info!(policy = %name, "Rate limit sweeper received shutdown signal, exiting loop");
                        break;
                    }
                }
            }
        })
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("name", &self.name)
            .field("window", &self.window)
            .field("max", &self.max)
            .field("enabled", &self.enabled)
            .field("tracked_keys", &self.records.len())
            .finish()
    }
}
