use std::time::Duration;

use calc_base::config::ClientConfig;
use calc_base::constants::{EXPRESSION_POLLING_INTERVAL_MS, MAX_POLLING_INTERVAL_MS};

/// How often, and how many times, a submitted expression is polled.
///
/// The default polls forever at a fixed 200 ms interval.
#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    pub interval: Duration,
    /// Non-terminal polls allowed before giving up; None = unbounded
    pub max_attempts: Option<u32>,
    /// Delay multiplier per non-terminal poll (1.0 = fixed interval)
    pub backoff_factor: f64,
    /// Ceiling for the delay once backoff kicks in
    pub max_interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(EXPRESSION_POLLING_INTERVAL_MS),
            max_attempts: None,
            backoff_factor: 1.0,
            max_interval: Duration::from_millis(MAX_POLLING_INTERVAL_MS),
        }
    }
}

impl PollPolicy {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            interval: Duration::from_millis(config.poll_interval_ms),
            max_attempts: config.poll_max_attempts,
            backoff_factor: config.poll_backoff,
            ..Self::default()
        }
    }

    /// Fixed interval, unbounded. Handy for tests with `Duration::ZERO`.
    pub fn fixed(interval: Duration) -> Self {
        Self { interval, ..Self::default() }
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    pub fn with_backoff(mut self, factor: f64, max_interval: Duration) -> Self {
        self.backoff_factor = factor;
        self.max_interval = max_interval;
        self
    }

    /// Whether another poll may follow `attempts` non-terminal polls.
    pub fn allows_another(&self, attempts: u32) -> bool {
        self.max_attempts.is_none_or(|max| attempts < max)
    }

    /// Delay before the next poll, after `attempts` (>= 1) non-terminal polls.
    pub fn delay_after(&self, attempts: u32) -> Duration {
        if self.backoff_factor <= 1.0 {
            return self.interval;
        }
        let exp = attempts.saturating_sub(1).min(32) as i32;
        let scaled = self.interval.as_secs_f64() * self.backoff_factor.powi(exp);
        Duration::from_secs_f64(scaled.min(self.max_interval.as_secs_f64()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_fixed_and_unbounded() {
        let p = PollPolicy::default();
        assert_eq!(p.interval, Duration::from_millis(200));
        assert!(p.allows_another(1_000_000));
        assert_eq!(p.delay_after(1), Duration::from_millis(200));
        assert_eq!(p.delay_after(50), Duration::from_millis(200));
    }

    #[test]
    fn max_attempts_bounds_polls() {
        let p = PollPolicy::fixed(Duration::ZERO).with_max_attempts(3);
        assert!(p.allows_another(0));
        assert!(p.allows_another(2));
        assert!(!p.allows_another(3));
    }

    #[test]
    fn backoff_grows_and_caps() {
        let p = PollPolicy::fixed(Duration::from_millis(100)).with_backoff(2.0, Duration::from_millis(500));
        assert_eq!(p.delay_after(1), Duration::from_millis(100));
        assert_eq!(p.delay_after(2), Duration::from_millis(200));
        assert_eq!(p.delay_after(3), Duration::from_millis(400));
        assert_eq!(p.delay_after(4), Duration::from_millis(500));
        assert_eq!(p.delay_after(40), Duration::from_millis(500));
    }

    #[test]
    fn from_config_copies_poll_settings() {
        let cfg = ClientConfig { poll_interval_ms: 25, poll_max_attempts: Some(8), poll_backoff: 1.5, ..Default::default() };
        let p = PollPolicy::from_config(&cfg);
        assert_eq!(p.interval, Duration::from_millis(25));
        assert_eq!(p.max_attempts, Some(8));
        assert_eq!(p.backoff_factor, 1.5);
    }
}
