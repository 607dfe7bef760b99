// @file: kline_ingestion/src/core/retry.rs
// @description: Capped exponential backoff applied when the exchange throttles a page request.
// @author: LAS.

use tokio::time::Duration;


//
// POLICY
//

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub base_delay: Duration,
    pub multiplier: f64,
    pub max_delay: Duration,
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            base_delay: Duration::from_secs(60),
            multiplier: 2.0,
            max_delay: Duration::from_secs(480),
            max_attempts: 10,
        }
    }
}

impl RetryPolicy {
    /// The old behaviour: a flat delay between every throttled attempt.
    pub fn fixed(delay: Duration, max_attempts: u32) -> Self {
        RetryPolicy {
            base_delay: delay,
            multiplier: 1.0,
            max_delay: delay,
            max_attempts,
        }
    }

    // #1. Delay before retry number `attempt` (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(32) as i32;
        let factor = self.multiplier.max(1.0).powi(exponent);
        let scaled = self.base_delay.as_secs_f64() * factor;

        if !scaled.is_finite() || scaled >= self.max_delay.as_secs_f64() {
            return self.max_delay;
        }
        Duration::from_secs_f64(scaled)
    }

    // #2. Whether another attempt is allowed after `attempt` throttles
    pub fn allows(&self, attempt: u32) -> bool {
        attempt < self.max_attempts.max(1)
    }
}
