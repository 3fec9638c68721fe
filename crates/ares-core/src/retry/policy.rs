use std::time::Duration;

/// Statuses that are retried by default (server errors a proxy or app may recover from).
pub const DEFAULT_RETRY_STATUSES: &[u16] = &[500, 502, 504];

/// Methods for which read failures and retryable statuses are retried.
pub const DEFAULT_RETRY_METHODS: &[&str] = &["GET", "POST"];

/// High-level classification of a failed attempt for retry purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Could not establish a connection (refused, DNS, proxy resolve, TLS handshake).
    /// The request never reached the server.
    Connect,
    /// Connection was made but sending or reading failed (timeout, reset, empty reply).
    Read,
    /// Server answered with a status listed in the policy's forcelist.
    Status(u16),
    /// Anything else; never retried.
    Other,
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry this error.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Exponential backoff policy: `backoff_factor * 2^(n-1)` before retry `n`, capped.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt.
    pub max_retries: u32,
    /// Base factor for backoff.
    pub backoff_factor: Duration,
    /// Upper bound on a single backoff delay.
    pub backoff_max: Duration,
    /// Response statuses treated as retryable.
    pub status_forcelist: &'static [u16],
    /// Methods eligible for read/status retries.
    pub allowed_methods: &'static [&'static str],
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            backoff_factor: Duration::from_secs(3),
            backoff_max: Duration::from_secs(120),
            status_forcelist: DEFAULT_RETRY_STATUSES,
            allowed_methods: DEFAULT_RETRY_METHODS,
        }
    }
}

impl RetryPolicy {
    /// True if `code` is in the forcelist.
    pub fn is_retryable_status(&self, code: u32) -> bool {
        self.status_forcelist.iter().any(|&s| u32::from(s) == code)
    }

    pub fn is_method_retryable(&self, method: &str) -> bool {
        self.allowed_methods
            .iter()
            .any(|m| m.eq_ignore_ascii_case(method))
    }

    /// Backoff before retry number `retry` (1-based), capped at `backoff_max`.
    pub fn backoff(&self, retry: u32) -> Duration {
        let exp = 1u32 << retry.saturating_sub(1).min(16);
        self.backoff_factor.saturating_mul(exp).min(self.backoff_max)
    }

    /// Decide what to do after `attempt` attempts (1 = the first request) failed with `kind`.
    ///
    /// Connect failures are retried for any method; read and status failures only
    /// for methods in `allowed_methods`.
    pub fn decide(&self, attempt: u32, kind: ErrorKind, method: &str) -> RetryDecision {
        if attempt > self.max_retries {
            return RetryDecision::NoRetry;
        }

        let retryable = match kind {
            ErrorKind::Connect => true,
            ErrorKind::Read | ErrorKind::Status(_) => self.is_method_retryable(method),
            ErrorKind::Other => false,
        };
        if retryable {
            RetryDecision::RetryAfter(self.backoff(attempt))
        } else {
            RetryDecision::NoRetry
        }
    }
}
