//! Retry policy for dispatched requests.

use crate::error::QuantumError;

/// Default number of additional attempts after the first one.
pub const DEFAULT_RETRIES: u32 = 3;

/// Decides whether a failed request is attempted again.
///
/// The budget is a plain counter with no delay between attempts. By default
/// application errors reported in the response body share the budget with
/// transport failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first one.
    pub retries: u32,
    /// Whether classified API errors (authentication, handler not found,
    /// internal server error) are retried too.
    pub retry_classified: bool,
}

impl RetryPolicy {
    /// Creates a policy with the given number of retries.
    pub fn new(retries: u32) -> Self {
        Self {
            retries,
            retry_classified: true,
        }
    }

    /// Disables retries.
    pub fn no_retry() -> Self {
        Self::new(0)
    }

    /// Only retry transport and decoding failures.
    pub fn transport_only(mut self) -> Self {
        self.retry_classified = false;
        self
    }

    /// Same policy with a different budget.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Determines if an error seen after `attempt` retries should be retried.
    pub fn should_retry(&self, error: &QuantumError, attempt: u32) -> bool {
        if attempt >= self.retries || !error.is_retryable() {
            return false;
        }
        self.retry_classified || !error.is_classified()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_RETRIES)
    }
}
