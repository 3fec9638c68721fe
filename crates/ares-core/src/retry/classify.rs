//! Classify HTTP status and curl errors into retry policy error kinds.

use super::error::AttemptError;
use super::policy::{ErrorKind, RetryPolicy};

/// Classify an HTTP status code for retry decisions.
pub fn classify_http_status(policy: &RetryPolicy, code: u32) -> ErrorKind {
    if policy.is_retryable_status(code) {
        ErrorKind::Status(code as u16)
    } else {
        ErrorKind::Other
    }
}

/// Classify a curl error for retry decisions.
pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_ssl_connect_error()
    {
        return ErrorKind::Connect;
    }
    if e.is_operation_timedout()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_read_error()
        || e.is_got_nothing()
        || e.is_partial_file()
    {
        return ErrorKind::Read;
    }
    ErrorKind::Other
}

/// Classify an attempt error (curl, HTTP or setup) into an ErrorKind.
pub fn classify(policy: &RetryPolicy, e: &AttemptError) -> ErrorKind {
    match e {
        AttemptError::Curl(ce) => classify_curl_error(ce),
        AttemptError::Http(code) => classify_http_status(policy, *code),
        AttemptError::Setup(_) => ErrorKind::Other,
    }
}
