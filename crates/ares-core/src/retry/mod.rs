//! Retry and backoff policy.
//!
//! This module encapsulates error classification (connect, read, retryable
//! status) and exponential backoff decisions so that every HTTP delivery path
//! shares a consistent policy.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use error::{AttemptError, DeliveryFailure};
pub use policy::{
    ErrorKind, RetryDecision, RetryPolicy, DEFAULT_RETRY_METHODS, DEFAULT_RETRY_STATUSES,
};
pub use run::{run_with_retry, Sleeper, ThreadSleeper};
