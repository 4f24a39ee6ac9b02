//! Reconnect backoff for the feed connection.
//!
//! The `n`th consecutive failure waits `n² × unit`, capped at `max_delay`, with optional
//! symmetric jitter. A successful read resets the failure count.

use rand::Rng;
use std::time::Duration;

/// Default backoff unit: the first failure waits one unit.
pub const DEFAULT_BACKOFF_UNIT: Duration = Duration::from_secs(1);

/// Default upper bound on any single backoff delay.
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Default jitter as a fraction of the computed delay (±10%).
pub const DEFAULT_BACKOFF_JITTER: f64 = 0.1;

/// Immutable quadratic backoff configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackoffPolicy {
    pub unit: Duration,
    pub max_delay: Duration,
    /// Fraction in `[0, 1]`.
    pub jitter: f64,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            unit: DEFAULT_BACKOFF_UNIT,
            max_delay: DEFAULT_MAX_BACKOFF,
            jitter: DEFAULT_BACKOFF_JITTER,
        }
    }
}

impl BackoffPolicy {
    pub fn with_unit(mut self, unit: Duration) -> Self {
        self.unit = unit;
        self
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = if jitter.is_finite() {
            jitter.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self
    }

    /// Delay before the next attempt after `failures` consecutive failures, without jitter.
    pub fn delay(&self, failures: u32) -> Duration {
        self.unit
            .saturating_mul(failures.saturating_mul(failures))
            .min(self.max_delay)
    }

    fn jittered(&self, delay: Duration) -> Duration {
        if self.jitter <= 0.0 || delay.is_zero() {
            return delay;
        }

        let factor = 1.0 + rand::rng().random_range(-self.jitter..=self.jitter);
        delay.mul_f64(factor).min(self.max_delay)
    }
}

/// Consecutive failure count for one feed connection.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconnectBackoff {
    policy: BackoffPolicy,
    failures: u32,
}

impl ReconnectBackoff {
    pub fn new(policy: BackoffPolicy) -> Self {
        Self {
            policy,
            failures: 0,
        }
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }

    /// Record a failed read or dial, returning how long to wait before reconnecting.
    pub fn record_failure(&mut self) -> Duration {
        self.failures = self.failures.saturating_add(1);
        self.policy.jittered(self.policy.delay(self.failures))
    }

    /// Record a successful read.
    pub fn record_success(&mut self) {
        self.failures = 0;
    }
}
