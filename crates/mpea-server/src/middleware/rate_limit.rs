// Rate limiting for the public contact form and the admin login
// Both limiters are owned by AppState and pruned by a background task

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::model::app_state::AppState;

// ============================================================================
// Contact form limiter
// One submission per client IP per interval, bounded number of tracked IPs
// ============================================================================

/// Contact form limiter configuration
#[derive(Clone, Debug)]
pub struct ContactRateLimitConfig {
    /// Minimum time between two submissions from the same IP
    pub interval: Duration,
    /// Maximum number of IPs tracked at once
    pub max_entries: usize,
}

impl Default for ContactRateLimitConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            max_entries: 10_000,
        }
    }
}

/// Per-IP submission window for the public contact endpoints
pub struct ContactRateLimiter {
    last_seen: DashMap<String, Instant>,
    config: ContactRateLimitConfig,
}

impl ContactRateLimiter {
    pub fn new(config: ContactRateLimitConfig) -> Self {
        Self {
            last_seen: DashMap::new(),
            config,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(ContactRateLimitConfig::default())
    }

    /// Record a submission from `ip`; `false` means it arrived inside the window.
    pub fn try_acquire(&self, ip: &str) -> bool {
        self.try_acquire_at(ip, Instant::now())
    }

    fn try_acquire_at(&self, ip: &str, now: Instant) -> bool {
        // Room is made before the entry is taken: pruning walks every shard
        if !self.last_seen.contains_key(ip) && self.last_seen.len() >= self.config.max_entries {
            self.prune_at(now);
            if self.last_seen.len() >= self.config.max_entries {
                self.evict_oldest();
            }
        }

        // The shard stays locked between the window check and the write
        match self.last_seen.entry(ip.to_string()) {
            Entry::Occupied(mut slot) => {
                if now.saturating_duration_since(*slot.get()) < self.config.interval {
                    return false;
                }
                slot.insert(now);
                true
            }
            Entry::Vacant(slot) => {
                slot.insert(now);
                true
            }
        }
    }

    /// Drop IPs whose window has passed.
    pub fn cleanup(&self) {
        self.prune_at(Instant::now());
    }

    fn prune_at(&self, now: Instant) {
        let interval = self.config.interval;
        self.last_seen
            .retain(|_, last| now.saturating_duration_since(*last) < interval);
    }

    fn evict_oldest(&self) {
        let oldest = self
            .last_seen
            .iter()
            .min_by_key(|entry| *entry.value())
            .map(|entry| entry.key().clone());

        if let Some(ip) = oldest {
            self.last_seen.remove(&ip);
        }
    }

    pub fn len(&self) -> usize {
        self.last_seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_seen.is_empty()
    }
}

// ============================================================================
// Login limiter
// Failed logins per client IP, with a lockout once the limit is reached
// ============================================================================

/// Login limiter configuration
#[derive(Clone, Debug)]
pub struct AuthRateLimitConfig {
    /// Failed attempts allowed per window
    pub max_attempts: u32,
    /// Time window for counting failures
    pub window_duration: Duration,
    /// Lockout duration after reaching `max_attempts`
    pub lockout_duration: Duration,
}

impl Default for AuthRateLimitConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            window_duration: Duration::from_secs(60),
            lockout_duration: Duration::from_secs(300),
        }
    }
}

struct AuthAttemptEntry {
    failures: u32,
    first_failure: Instant,
    locked_until: Option<Instant>,
}

impl AuthAttemptEntry {
    fn new(now: Instant) -> Self {
        Self {
            failures: 0,
            first_failure: now,
            locked_until: None,
        }
    }

    fn remaining_lockout(&self, now: Instant) -> Option<Duration> {
        self.locked_until
            .filter(|until| now < *until)
            .map(|until| until - now)
    }
}

/// Brute-force protection for the login endpoint
pub struct AuthRateLimiter {
    entries: DashMap<String, AuthAttemptEntry>,
    config: AuthRateLimitConfig,
}

impl AuthRateLimiter {
    pub fn new(config: AuthRateLimitConfig) -> Self {
        Self {
            entries: DashMap::new(),
            config,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(AuthRateLimitConfig::default())
    }

    /// Remaining lockout for `key`, `None` if a login may be attempted.
    pub fn check(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        self.entries
            .get(key)
            .and_then(|entry| entry.remaining_lockout(now))
    }

    /// Count a failed login; returns the lockout if this failure triggered one.
    pub fn record_failure(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        let mut entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| AuthAttemptEntry::new(now));

        if let Some(remaining) = entry.remaining_lockout(now) {
            return Some(remaining);
        }

        if entry.locked_until.is_some()
            || now.duration_since(entry.first_failure) >= self.config.window_duration
        {
            *entry = AuthAttemptEntry::new(now);
        }

        entry.failures += 1;

        if entry.failures >= self.config.max_attempts {
            entry.locked_until = Some(now + self.config.lockout_duration);
            tracing::warn!(
                key,
                lockout_secs = self.config.lockout_duration.as_secs(),
                "login locked after repeated failures"
            );
            return Some(self.config.lockout_duration);
        }

        None
    }

    /// Forget the failures of `key` after a successful login.
    pub fn record_success(&self, key: &str) {
        self.entries.remove(key);
    }

    pub fn cleanup(&self) {
        let now = Instant::now();
        let max_age = self.config.window_duration + self.config.lockout_duration;

        self.entries.retain(|_, entry| {
            entry.remaining_lockout(now).is_some()
                || now.duration_since(entry.first_failure) < max_age
        });
    }
}

/// Cleanup interval for rate limiter entries
const CLEANUP_INTERVAL_SECS: u64 = 60;

/// Periodically prune both limiters of `app_state`.
pub fn start_cleanup_task(app_state: Arc<AppState>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(CLEANUP_INTERVAL_SECS));
        loop {
            interval.tick().await;
            app_state.contact_limiter.cleanup();
            app_state.login_limiter.cleanup();
            tracing::debug!(
                contact_entries = app_state.contact_limiter.len(),
                "Rate limiter cleanup completed"
            );
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact_limiter(interval_secs: u64, max_entries: usize) -> ContactRateLimiter {
        ContactRateLimiter::new(ContactRateLimitConfig {
            interval: Duration::from_secs(interval_secs),
            max_entries,
        })
    }

    #[test]
    fn test_contact_window() {
        let limiter = contact_limiter(30, 100);
        let start = Instant::now();

        assert!(limiter.try_acquire_at("10.0.0.1", start));
        assert!(!limiter.try_acquire_at("10.0.0.1", start + Duration::from_secs(29)));
        assert!(limiter.try_acquire_at("10.0.0.2", start + Duration::from_secs(1)));
        assert!(limiter.try_acquire_at("10.0.0.1", start + Duration::from_secs(30)));
    }

    #[test]
    fn test_contact_rejected_attempt_does_not_extend_window() {
        let limiter = contact_limiter(30, 100);
        let start = Instant::now();

        assert!(limiter.try_acquire_at("ip", start));
        assert!(!limiter.try_acquire_at("ip", start + Duration::from_secs(20)));
        assert!(limiter.try_acquire_at("ip", start + Duration::from_secs(31)));
    }

    #[test]
    fn test_contact_capacity_is_bounded() {
        let limiter = contact_limiter(30, 3);
        let start = Instant::now();

        for i in 0..10u64 {
            let ip = format!("10.0.0.{}", i);
            assert!(limiter.try_acquire_at(&ip, start + Duration::from_millis(i)));
            assert!(limiter.len() <= 3);
        }

        // The oldest IPs were evicted, the newest is still limited
        assert!(limiter.try_acquire_at("10.0.0.0", start + Duration::from_millis(20)));
        assert!(!limiter.try_acquire_at("10.0.0.9", start + Duration::from_millis(21)));
    }

    #[test]
    fn test_contact_capacity_prefers_expired_entries() {
        let limiter = contact_limiter(30, 2);
        let start = Instant::now();

        assert!(limiter.try_acquire_at("old", start));
        assert!(limiter.try_acquire_at("recent", start + Duration::from_secs(25)));
        assert!(limiter.try_acquire_at("new", start + Duration::from_secs(40)));

        assert_eq!(limiter.len(), 2);
        assert!(!limiter.try_acquire_at("recent", start + Duration::from_secs(41)));
    }

    #[test]
    fn test_contact_concurrent_submissions_admit_one() {
        use std::sync::Barrier;

        const THREADS: usize = 8;

        for _ in 0..50 {
            let limiter = contact_limiter(30, 100);
            let barrier = Barrier::new(THREADS);

            let admitted = std::thread::scope(|scope| {
                let handles: Vec<_> = (0..THREADS)
                    .map(|_| {
                        scope.spawn(|| {
                            barrier.wait();
                            limiter.try_acquire("203.0.113.7")
                        })
                    })
                    .collect();

                handles
                    .into_iter()
                    .map(|handle| handle.join().unwrap())
                    .filter(|admitted| *admitted)
                    .count()
            });

            assert_eq!(admitted, 1);
            assert_eq!(limiter.len(), 1);
        }
    }

    #[test]
    fn test_contact_concurrent_eviction_at_capacity() {
        use std::sync::Barrier;

        const THREADS: usize = 8;

        let limiter = contact_limiter(30, 4);
        let barrier = Barrier::new(THREADS);

        std::thread::scope(|scope| {
            for t in 0..THREADS {
                let limiter = &limiter;
                let barrier = &barrier;
                scope.spawn(move || {
                    barrier.wait();
                    for i in 0..100 {
                        assert!(limiter.try_acquire(&format!("10.{}.0.{}", t, i)));
                    }
                });
            }
        });

        assert!(limiter.len() <= 4 + THREADS);
    }

    #[test]
    fn test_contact_cleanup() {
        let limiter = contact_limiter(0, 100);
        assert!(limiter.try_acquire("a"));
        assert!(limiter.try_acquire("b"));
        limiter.cleanup();
        assert!(limiter.is_empty());
    }

    fn auth_limiter(max_attempts: u32) -> AuthRateLimiter {
        AuthRateLimiter::new(AuthRateLimitConfig {
            max_attempts,
            window_duration: Duration::from_secs(60),
            lockout_duration: Duration::from_secs(300),
        })
    }

    #[test]
    fn test_auth_lockout() {
        let limiter = auth_limiter(3);

        assert!(limiter.check("ip").is_none());
        assert!(limiter.record_failure("ip").is_none());
        assert!(limiter.record_failure("ip").is_none());
        assert!(limiter.check("ip").is_none());

        // 3rd failure locks
        let lockout = limiter.record_failure("ip").unwrap();
        assert_eq!(lockout.as_secs(), 300);
        assert!(limiter.check("ip").is_some());
        assert!(limiter.record_failure("ip").is_some());

        // Other clients are unaffected
        assert!(limiter.check("other").is_none());
    }

    #[test]
    fn test_auth_success_resets() {
        let limiter = auth_limiter(3);
        limiter.record_failure("ip");
        limiter.record_failure("ip");
        limiter.record_success("ip");

        assert!(limiter.record_failure("ip").is_none());
        assert!(limiter.record_failure("ip").is_none());
        assert!(limiter.check("ip").is_none());
    }

    #[test]
    fn test_auth_cleanup_keeps_locked_entries() {
        let limiter = auth_limiter(1);
        limiter.record_failure("locked");
        limiter.cleanup();
        assert!(limiter.check("locked").is_some());
    }
}
