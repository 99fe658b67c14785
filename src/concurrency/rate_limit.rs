//! A token-bucket rate limiter keyed by client id.

use std::time::{Duration, Instant};

use dashmap::DashMap;

struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

pub struct RateLimiter {
    capacity: f64,
    refill_per_second: f64,
    buckets: DashMap<String, Bucket>,
}

impl RateLimiter {
    /// `requests_per_minute` tokens refill continuously; a client starts
    /// with a full bucket.
    pub fn new(requests_per_minute: f64) -> Self {
        Self {
            capacity: requests_per_minute,
            refill_per_second: requests_per_minute / 60.0,
            buckets: DashMap::new(),
        }
    }

    /// The spec's documented default: 100 requests/minute per client.
    pub fn with_defaults() -> Self {
        Self::new(100.0)
    }

    /// Attempts to consume one token for `client_id`. Returns `true` if the
    /// request is allowed, `false` if the client should be rejected.
    pub fn try_acquire(&self, client_id: &str) -> bool {
        let now = Instant::now();
        let mut bucket = self.buckets.entry(client_id.to_string()).or_insert_with(|| Bucket {
            tokens: self.capacity,
            last_refill: now,
        });

        let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.refill_per_second).min(self.capacity);
        bucket.last_refill = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausts_then_rejects() {
        let limiter = RateLimiter::new(3.0);
        assert!(limiter.try_acquire("a"));
        assert!(limiter.try_acquire("a"));
        assert!(limiter.try_acquire("a"));
        assert!(!limiter.try_acquire("a"));
    }

    #[test]
    fn distinct_clients_have_independent_buckets() {
        let limiter = RateLimiter::new(1.0);
        assert!(limiter.try_acquire("a"));
        assert!(limiter.try_acquire("b"));
        assert!(!limiter.try_acquire("a"));
    }

    #[test]
    fn refills_over_time() {
        let limiter = RateLimiter::new(6000.0); // 100 tokens/sec
        assert!(limiter.try_acquire("a"));
        assert!(limiter.try_acquire("a"));
        std::thread::sleep(Duration::from_millis(50));
        // ~5 tokens refilled in 50ms at 100/sec, comfortably enough for one more.
        assert!(limiter.try_acquire("a"));
    }
}
