//! Retry schedule for upstream calls.

use rand::Rng;
use std::time::Duration;

/// Exponential backoff with additive random jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    backoff_base: Duration,
    jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(100), Duration::from_millis(100))
    }
}

impl RetryPolicy {
    /// `max_retries` counts every attempt, the first one included; it is clamped to at least 1.
    pub fn new(max_retries: u32, backoff_base: Duration, jitter: Duration) -> Self {
        Self {
            max_retries: max_retries.max(1),
            backoff_base,
            jitter,
        }
    }

    /// A policy that retries immediately. Handy in tests.
    pub fn no_delay(max_retries: u32) -> Self {
        Self::new(max_retries, Duration::ZERO, Duration::ZERO)
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn backoff_base(&self) -> Duration {
        self.backoff_base
    }

    pub fn jitter(&self) -> Duration {
        self.jitter
    }

    /// Deterministic part of the wait before `attempt` (0-based).
    ///
    /// Attempt 0 goes out immediately; attempt `n` waits `base * 2^n`.
    pub fn base_delay(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.backoff_base.saturating_mul(factor)
    }

    /// Full wait before `attempt`: the base delay plus jitter drawn from `[0, jitter)`.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        let base = self.base_delay(attempt);
        if attempt == 0 || self.jitter.is_zero() {
            return base;
        }
        let jitter_ms = self.jitter.as_millis().min(u64::MAX as u128) as u64;
        let extra = rand::thread_rng().gen_range(0..jitter_ms.max(1));
        base.saturating_add(Duration::from_millis(extra))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries(), 3);
        assert_eq!(policy.backoff_base(), Duration::from_millis(100));
        assert_eq!(policy.jitter(), Duration::from_millis(100));
    }

    #[test]
    fn test_base_delay_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.base_delay(0), Duration::ZERO);
        assert_eq!(policy.base_delay(1), Duration::from_millis(200));
        assert_eq!(policy.base_delay(2), Duration::from_millis(400));
        assert_eq!(policy.base_delay(3), Duration::from_millis(800));
    }

    #[test]
    fn test_delay_includes_bounded_jitter() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_before(0), Duration::ZERO);
        for _ in 0..100 {
            let delay = policy.delay_before(1);
            assert!(delay >= Duration::from_millis(200));
            assert!(delay < Duration::from_millis(300));
        }
    }

    #[test]
    fn test_no_delay_policy() {
        let policy = RetryPolicy::no_delay(3);
        for attempt in 0..3 {
            assert_eq!(policy.delay_before(attempt), Duration::ZERO);
        }
    }

    #[test]
    fn test_max_retries_clamped() {
        assert_eq!(RetryPolicy::no_delay(0).max_retries(), 1);
    }

    #[test]
    fn test_huge_attempt_saturates() {
        let policy = RetryPolicy::default();
        assert!(policy.base_delay(64) >= policy.base_delay(31));
    }

    #[test]
    fn test_saturated_base_with_jitter_does_not_overflow() {
        let policy = RetryPolicy::new(3, Duration::MAX, Duration::from_millis(100));
        assert_eq!(policy.delay_before(2), Duration::MAX);
    }
}
