//! Per-user, per-tier generation quota over a fixed time window.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use linkkarma_core::UserTier;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("rate limit exceeded for {tier} tier: {limit} generations per window, retry in {retry_after:?}")]
pub struct RateLimitExceeded {
    pub tier: UserTier,
    pub limit: u32,
    pub retry_after: Duration,
}

/// Generations allowed per window for each tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierLimits {
    pub free: u32,
    pub premium: u32,
    pub pro: u32,
}

impl Default for TierLimits {
    fn default() -> Self {
        Self {
            free: 5,
            premium: 20,
            pro: 100,
        }
    }
}

impl TierLimits {
    pub fn limit_for(&self, tier: UserTier) -> u32 {
        match tier {
            UserTier::Free => self.free,
            UserTier::Premium => self.premium,
            UserTier::Pro => self.pro,
        }
    }
}

pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

struct Window {
    started: Instant,
    count: u32,
}

pub struct RateLimiter {
    limits: TierLimits,
    window: Duration,
    clock: Arc<dyn Clock>,
    windows: Mutex<HashMap<(String, UserTier), Window>>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(TierLimits::default(), DEFAULT_WINDOW)
    }
}

impl RateLimiter {
    pub fn new(limits: TierLimits, window: Duration) -> Self {
        Self::with_clock(limits, window, Arc::new(SystemClock))
    }

    pub fn with_clock(limits: TierLimits, window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            limits,
            window,
            clock,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Check whether `(user_id, tier)` has quota left without consuming it.
    /// Returns how many generations remain in the current window.
    pub fn check(&self, user_id: &str, tier: UserTier) -> Result<u32, RateLimitExceeded> {
        let limit = self.limits.limit_for(tier);
        let now = self.clock.now();
        let windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);

        let key = (user_id.to_string(), tier);
        match windows.get(&key) {
            Some(window) if self.is_live(window, now) => self.remaining(window, now, limit, user_id, tier),
            _ => Ok(limit),
        }
    }

    /// Count one generation for `(user_id, tier)`. Returns how many remain in
    /// the current window.
    pub fn check_and_record(&self, user_id: &str, tier: UserTier) -> Result<u32, RateLimitExceeded> {
        let limit = self.limits.limit_for(tier);
        let now = self.clock.now();
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);

        let key = (user_id.to_string(), tier);
        if !windows.contains_key(&key) {
            let before = windows.len();
            windows.retain(|_, w| self.is_live(w, now));
            let evicted = before - windows.len();
            if evicted > 0 {
                debug!(evicted, tracked = windows.len(), "expired rate limit windows dropped");
            }
        }

        let window = windows.entry(key).or_insert(Window { started: now, count: 0 });
        if !self.is_live(window, now) {
            window.started = now;
            window.count = 0;
        }

        self.remaining(window, now, limit, user_id, tier)?;
        window.count += 1;
        let remaining = limit - window.count;
        debug!(user_id, %tier, remaining, "generation quota consumed");
        Ok(remaining)
    }

    fn is_live(&self, window: &Window, now: Instant) -> bool {
        now.saturating_duration_since(window.started) < self.window
    }

    fn remaining(
        &self,
        window: &Window,
        now: Instant,
        limit: u32,
        user_id: &str,
        tier: UserTier,
    ) -> Result<u32, RateLimitExceeded> {
        if window.count >= limit {
            let retry_after = self
                .window
                .saturating_sub(now.saturating_duration_since(window.started));
            warn!(user_id, %tier, limit, "generation rate limit exceeded");
            return Err(RateLimitExceeded {
                tier,
                limit,
                retry_after,
            });
        }
        Ok(limit - window.count)
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.windows.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
