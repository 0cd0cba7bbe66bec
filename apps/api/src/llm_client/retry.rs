//! Exponential backoff for transient provider failures.

use std::time::Duration;

use super::LlmError;

/// Backoff schedule applied around every provider call.
///
/// The wait before attempt `n + 1` is `multiplier * 2^(n - 1)` seconds, clamped to
/// `[min_delay, max_delay]`. With the defaults that is 4s, 4s, 4s, 8s.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub min_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            min_delay: Duration::from_secs(4),
            max_delay: Duration::from_secs(60),
            multiplier: 1.0,
        }
    }
}

impl RetryPolicy {
    /// A policy that retries immediately.
    #[cfg(test)]
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            multiplier: 0.0,
        }
    }

    /// Delay to wait after `failed_attempts` attempts have failed (1-based).
    pub fn delay_for(&self, failed_attempts: u32) -> Duration {
        let exponent = failed_attempts.saturating_sub(1).min(62) as i32;
        let secs = self.multiplier * 2f64.powi(exponent);
        let capped = secs.clamp(0.0, self.max_delay.as_secs_f64());
        Duration::from_secs_f64(capped)
            .max(self.min_delay)
            .min(self.max_delay)
    }

    /// True while another attempt is allowed after `failed_attempts` failures.
    pub fn should_retry(&self, failed_attempts: u32, error: &LlmError) -> bool {
        failed_attempts < self.max_attempts && is_transient(error)
    }
}

/// Rate limits, server errors and transport failures are worth retrying.
/// Client errors, refusals and malformed output are not.
pub fn is_transient(error: &LlmError) -> bool {
    match error {
        LlmError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
        LlmError::Api { status, .. } => *status == 429 || *status >= 500,
        _ => false,
    }
}
