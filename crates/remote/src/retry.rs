//! Transport-level retry policy.

use std::time::Duration;

use reqwest::{Method, StatusCode};

/// Statuses treated as transient by the remote API.
pub const RETRY_STATUS_CODES: [u16; 5] = [429, 500, 502, 503, 504];

/// How many times, and how far apart, a request is re-sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt (0 = single attempt).
    pub max_retries: u32,
    /// Pause before each retry.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    /// Three retries, one second apart.
    fn default() -> Self {
        Self::fixed(3, Duration::from_secs(1))
    }
}

impl RetryPolicy {
    pub fn fixed(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    /// `true` while another retry fits in the budget.
    pub fn should_retry(&self, retries_done: u32) -> bool {
        retries_done < self.max_retries
    }

    /// Total attempts including the first one.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

pub fn is_retryable_status(status: StatusCode) -> bool {
    RETRY_STATUS_CODES.contains(&status.as_u16())
}

pub fn is_retryable_method(method: &Method) -> bool {
    *method == Method::GET || *method == Method::PUT || *method == Method::POST
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_is_three_retries_one_second_apart() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 4);
        assert_eq!(policy.delay, Duration::from_secs(1));
    }

    #[test]
    fn should_retry_respects_budget() {
        let policy = RetryPolicy::fixed(3, Duration::ZERO);
        assert!(policy.should_retry(0));
        assert!(policy.should_retry(2));
        assert!(!policy.should_retry(3));
        assert!(!RetryPolicy::fixed(0, Duration::ZERO).should_retry(0));
    }

    #[test]
    fn transient_statuses_and_methods() {
        for code in RETRY_STATUS_CODES {
            assert!(is_retryable_status(StatusCode::from_u16(code).unwrap()));
        }
        assert!(!is_retryable_status(StatusCode::NOT_FOUND));
        assert!(!is_retryable_status(StatusCode::UNAUTHORIZED));
        assert!(is_retryable_method(&Method::PUT));
        assert!(!is_retryable_method(&Method::DELETE));
    }
}
