use std::time::Duration;

/// Default pause between attempts after a schema-lock conflict.
pub const DEFAULT_RETRY_PAUSE: Duration = Duration::from_secs(1);

/// How the reconciler restarts after a schema-lock conflict.
///
/// Every retry starts over from a fresh snapshot; no partial progress is
/// carried across attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub pause: Duration,
    /// `None` retries until the conflict clears.
    pub max_attempts: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            pause: DEFAULT_RETRY_PAUSE,
            max_attempts: None,
        }
    }
}

impl RetryPolicy {
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts.max(1));
        self
    }

    /// Returns `true` if another attempt may follow attempt number `attempt`.
    pub fn allows_retry_after(&self, attempt: u32) -> bool {
        self.max_attempts.is_none_or(|max| attempt < max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unbounded() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.pause, Duration::from_secs(1));
        assert!(policy.allows_retry_after(1_000));
    }

    #[test]
    fn test_bounded() {
        let policy = RetryPolicy::default().with_max_attempts(3);
        assert!(policy.allows_retry_after(2));
        assert!(!policy.allows_retry_after(3));
    }

    #[test]
    fn test_zero_attempts_means_one() {
        let policy = RetryPolicy::default().with_max_attempts(0);
        assert!(!policy.allows_retry_after(1));
    }
}
