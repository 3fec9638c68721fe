//! Single-attempt and delivery-level error types for retry classification.

use std::fmt;

/// Error returned by a single HTTP attempt (curl failure or HTTP error status).
/// Kept separate from the resolver errors so the retry loop can classify it first.
#[derive(Debug)]
pub enum AttemptError {
    /// Curl reported an error (timeout, connection, etc.).
    Curl(curl::Error),
    /// HTTP response had a non-2xx status.
    Http(u32),
    /// Request could not be prepared (bad URL, header rejected by curl). Never retried.
    Setup(String),
}

impl fmt::Display for AttemptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptError::Curl(e) => write!(f, "{}", e),
            AttemptError::Http(code) => write!(f, "HTTP {}", code),
            AttemptError::Setup(msg) => write!(f, "request setup: {}", msg),
        }
    }
}

impl std::error::Error for AttemptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AttemptError::Curl(e) => Some(e),
            AttemptError::Http(_) | AttemptError::Setup(_) => None,
        }
    }
}

/// Why a request could not be delivered after the retry loop gave up.
#[derive(Debug)]
pub enum DeliveryFailure {
    /// Every allowed retry was used and the last attempt still failed.
    RetriesExhausted { attempts: u32, last: AttemptError },
    /// The failure was not retryable (e.g. HTTP 404, TLS certificate problem).
    Rejected(AttemptError),
}

impl DeliveryFailure {
    /// The error from the final attempt.
    pub fn last_error(&self) -> &AttemptError {
        match self {
            DeliveryFailure::RetriesExhausted { last, .. } => last,
            DeliveryFailure::Rejected(e) => e,
        }
    }
}

impl fmt::Display for DeliveryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryFailure::RetriesExhausted { attempts, last } => {
                write!(f, "gave up after {} attempts: {}", attempts, last)
            }
            DeliveryFailure::Rejected(e) => write!(f, "not retryable: {}", e),
        }
    }
}

impl std::error::Error for DeliveryFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.last_error())
    }
}
