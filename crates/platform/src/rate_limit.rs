//! Rate Limiting Infrastructure
//!
//! Sliding-window rate limiting for sensitive operations (login, password
//! reset). The store is a trait so a shared external store (e.g. a TTL'd
//! key-value store) can replace the in-memory ledger without touching the
//! guard logic; [`MemoryRateLimiter`] is the single-process implementation.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum attempts allowed in the window
    pub max_attempts: u32,
    /// Time window duration
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        // 5 attempts per 15 minutes for auth routes
        Self {
            max_attempts: 5,
            window: Duration::from_secs(15 * 60),
        }
    }
}

impl RateLimitConfig {
    pub fn new(max_attempts: u32, window_secs: u64) -> Self {
        Self {
            max_attempts,
            window: Duration::from_secs(window_secs),
        }
    }
}

/// Rate limit check result
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub remaining: u32,
    /// How long until the oldest counted attempt leaves the window.
    /// Zero when the attempt was allowed.
    pub retry_after: Duration,
}

/// Trait for rate limit storage backends
#[trait_variant::make(RateLimitStore: Send)]
pub trait LocalRateLimitStore {
    /// Check the ledger for `key` under `operation`.
    ///
    /// An allowed check records the attempt; a rejected check does not add
    /// to the ledger, so a locked-out caller's window does not keep sliding
    /// forward on every retry.
    async fn check(
        &self,
        key: &str,
        operation: &str,
        config: &RateLimitConfig,
    ) -> Result<RateLimitResult, Box<dyn std::error::Error + Send + Sync>>;
}

/// In-memory sliding-window ledger.
///
/// Maps (caller key, operation) to attempt timestamps. Entries older than
/// the window are pruned lazily on each check. Process lifetime only; not
/// shared across horizontally scaled instances.
#[derive(Debug, Default)]
pub struct MemoryRateLimiter {
    ledger: RwLock<HashMap<String, Vec<Instant>>>,
}

impl MemoryRateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry_key(key: &str, operation: &str) -> String {
        format!("{operation}:{key}")
    }

    /// Core check with an injectable clock, for deterministic tests.
    async fn check_at(
        &self,
        key: &str,
        operation: &str,
        config: &RateLimitConfig,
        now: Instant,
    ) -> RateLimitResult {
        let mut ledger = self.ledger.write().await;

        // Sweep every entry, not just the checked one, so keys that never
        // come back do not accumulate in the map. All guarded operations
        // share one window, so the caller's window applies ledger-wide.
        ledger.retain(|_, attempts| {
            attempts.retain(|&at| now.duration_since(at) < config.window);
            !attempts.is_empty()
        });

        let attempts = ledger.entry(Self::entry_key(key, operation)).or_default();

        if attempts.len() as u32 >= config.max_attempts {
            let oldest = attempts.iter().min().copied().unwrap_or(now);
            let retry_after = config.window.saturating_sub(now.duration_since(oldest));
            return RateLimitResult {
                allowed: false,
                remaining: 0,
                retry_after,
            };
        }

        attempts.push(now);
        RateLimitResult {
            allowed: true,
            remaining: config.max_attempts - attempts.len() as u32,
            retry_after: Duration::ZERO,
        }
    }
}

impl RateLimitStore for MemoryRateLimiter {
    async fn check(
        &self,
        key: &str,
        operation: &str,
        config: &RateLimitConfig,
    ) -> Result<RateLimitResult, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.check_at(key, operation, config, Instant::now()).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RateLimitConfig {
        RateLimitConfig::new(5, 15 * 60)
    }

    #[tokio::test]
    async fn test_attempts_under_limit_allowed() {
        let limiter = MemoryRateLimiter::new();
        let now = Instant::now();

        for i in 0..5 {
            let result = limiter.check_at("ip:a@b.com", "login", &config(), now).await;
            assert!(result.allowed, "attempt {} should be allowed", i + 1);
            assert_eq!(result.remaining, 4 - i);
        }
    }

    #[tokio::test]
    async fn test_sixth_attempt_rejected() {
        let limiter = MemoryRateLimiter::new();
        let now = Instant::now();

        for _ in 0..5 {
            limiter.check_at("ip:a@b.com", "login", &config(), now).await;
        }

        let result = limiter.check_at("ip:a@b.com", "login", &config(), now).await;
        assert!(!result.allowed);
        assert_eq!(result.remaining, 0);
        assert!(result.retry_after > Duration::ZERO);
    }

    #[tokio::test]
    async fn test_window_elapse_allows_again() {
        let limiter = MemoryRateLimiter::new();
        let start = Instant::now();
        let cfg = config();

        for _ in 0..5 {
            limiter.check_at("ip:a@b.com", "login", &cfg, start).await;
        }
        assert!(!limiter.check_at("ip:a@b.com", "login", &cfg, start).await.allowed);

        // Just past the window, the pruned ledger admits the caller again
        let later = start + cfg.window + Duration::from_secs(1);
        let result = limiter.check_at("ip:a@b.com", "login", &cfg, later).await;
        assert!(result.allowed);
    }

    #[tokio::test]
    async fn test_keys_and_operations_are_independent() {
        let limiter = MemoryRateLimiter::new();
        let now = Instant::now();
        let cfg = config();

        for _ in 0..5 {
            limiter.check_at("ip:a@b.com", "login", &cfg, now).await;
        }

        // Different caller, same operation
        assert!(limiter.check_at("ip:c@d.com", "login", &cfg, now).await.allowed);
        // Same caller, different operation
        assert!(limiter.check_at("ip:a@b.com", "reset", &cfg, now).await.allowed);
        // Original pair still locked out
        assert!(!limiter.check_at("ip:a@b.com", "login", &cfg, now).await.allowed);
    }

    #[tokio::test]
    async fn test_rejection_does_not_extend_window() {
        let limiter = MemoryRateLimiter::new();
        let start = Instant::now();
        let cfg = config();

        for _ in 0..5 {
            limiter.check_at("k", "login", &cfg, start).await;
        }

        // Hammering while locked out must not push the unlock time forward
        let mid = start + cfg.window / 2;
        assert!(!limiter.check_at("k", "login", &cfg, mid).await.allowed);

        let after = start + cfg.window + Duration::from_secs(1);
        assert!(limiter.check_at("k", "login", &cfg, after).await.allowed);
    }

    #[tokio::test]
    async fn test_expired_entries_are_dropped_from_ledger() {
        let limiter = MemoryRateLimiter::new();
        let start = Instant::now();
        let cfg = config();

        limiter.check_at("ip:a@b.com", "login", &cfg, start).await;
        limiter.check_at("ip:c@d.com", "login", &cfg, start).await;
        limiter.check_at("ip:e@f.com", "reset", &cfg, start).await;
        assert_eq!(limiter.ledger.read().await.len(), 3);

        // A later check from a fresh caller sweeps out every stale key,
        // so the map does not grow with callers that never return
        let after = start + cfg.window + Duration::from_secs(1);
        limiter.check_at("ip:g@h.com", "login", &cfg, after).await;

        let ledger = limiter.ledger.read().await;
        assert_eq!(ledger.len(), 1);
        assert!(ledger.contains_key("login:ip:g@h.com"));
    }

    #[tokio::test]
    async fn test_trait_check_uses_real_clock() {
        let limiter = MemoryRateLimiter::new();
        let result = RateLimitStore::check(&limiter, "k", "login", &config())
            .await
            .unwrap();
        assert!(result.allowed);
        assert_eq!(result.remaining, 4);
    }
}
