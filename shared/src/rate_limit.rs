//! Minimum spacing between dispatched actions

/// Gate on inter-action timing.
///
/// Timestamps are monotonic milliseconds supplied by the caller. A rejected
/// attempt never moves the baseline.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    min_spacing_ms: u64,
    last_action_ms: Option<u64>,
}

impl RateLimiter {
    pub fn new(min_spacing_ms: u64) -> Self {
        Self {
            min_spacing_ms,
            last_action_ms: None,
        }
    }

    /// Admit an action at `now_ms`, moving the baseline on success
    pub fn try_acquire(&mut self, now_ms: u64) -> bool {
        if let Some(last) = self.last_action_ms {
            if now_ms.saturating_sub(last) < self.min_spacing_ms {
                return false;
            }
        }
        self.last_action_ms = Some(now_ms);
        true
    }

    /// Timestamp of the last admitted action
    pub fn last_action_ms(&self) -> Option<u64> {
        self.last_action_ms
    }

    pub fn min_spacing_ms(&self) -> u64 {
        self.min_spacing_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::MIN_ACTION_DELAY_MS;

    #[test]
    fn test_spacing_sequence() {
        let mut limiter = RateLimiter::new(MIN_ACTION_DELAY_MS);

        assert!(limiter.try_acquire(0));
        assert_eq!(limiter.last_action_ms(), Some(0));

        assert!(!limiter.try_acquire(50));
        assert_eq!(limiter.last_action_ms(), Some(0));

        assert!(limiter.try_acquire(110));
        assert_eq!(limiter.last_action_ms(), Some(110));
    }

    #[test]
    fn test_exact_spacing_is_admitted() {
        let mut limiter = RateLimiter::new(100);
        assert!(limiter.try_acquire(1000));
        assert!(!limiter.try_acquire(1099));
        assert!(limiter.try_acquire(1100));
    }

    #[test]
    fn test_first_action_always_admitted() {
        let mut limiter = RateLimiter::new(100);
        assert!(limiter.last_action_ms().is_none());
        assert!(limiter.try_acquire(5));
    }

    #[test]
    fn test_clock_going_backwards_is_rejected() {
        let mut limiter = RateLimiter::new(100);
        assert!(limiter.try_acquire(500));
        assert!(!limiter.try_acquire(400));
        assert_eq!(limiter.last_action_ms(), Some(500));
    }
}
