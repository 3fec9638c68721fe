//! Single-attempt HTTP delivery.
//!
//! A `Transport` performs exactly one request and reports the status code;
//! retries live one layer up in `client::RetryingClient`. The production
//! transport uses the curl crate (libcurl) with one `Easy` handle per attempt.

use std::time::Duration;

use crate::retry::AttemptError;

/// Everything needed to issue one request.
#[derive(Debug, Clone, Copy)]
pub struct PostRequest<'a> {
    pub method: &'a str,
    pub url: &'a str,
    /// Header name/value pairs, sent in order.
    pub headers: &'a [(String, String)],
    pub body: &'a [u8],
    /// Proxy to route through; `None` disables proxying (including env proxies).
    pub proxy: Option<&'a str>,
    /// Whole-attempt timeout.
    pub timeout: Duration,
}

/// Performs one HTTP attempt and returns the response status.
pub trait Transport: Send + Sync {
    fn send(&self, req: &PostRequest<'_>) -> Result<u32, AttemptError>;
}

/// libcurl-backed transport. Blocks the calling thread for the duration of the attempt.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurlTransport;

fn setup(e: curl::Error) -> AttemptError {
    AttemptError::Setup(e.to_string())
}

impl Transport for CurlTransport {
    fn send(&self, req: &PostRequest<'_>) -> Result<u32, AttemptError> {
        let mut easy = curl::easy::Easy::new();
        easy.url(req.url).map_err(setup)?;
        easy.post(true).map_err(setup)?;
        easy.post_fields_copy(req.body).map_err(setup)?;
        if !req.method.eq_ignore_ascii_case("POST") {
            easy.custom_request(req.method).map_err(setup)?;
        }
        // A POST must not be silently replayed against another location.
        easy.follow_location(false).map_err(setup)?;
        easy.timeout(req.timeout).map_err(setup)?;
        // Empty string explicitly disables proxying, overriding http_proxy/https_proxy.
        easy.proxy(req.proxy.unwrap_or("")).map_err(setup)?;

        let mut list = curl::easy::List::new();
        for (k, v) in req.headers {
            list.append(&format!("{}: {}", k.trim(), v.trim()))
                .map_err(setup)?;
        }
        // Suppress `Expect: 100-continue` on larger bodies.
        list.append("Expect:").map_err(setup)?;
        easy.http_headers(list).map_err(setup)?;

        {
            let mut transfer = easy.transfer();
            // Response body is not inspected.
            transfer
                .write_function(|data| Ok(data.len()))
                .map_err(setup)?;
            transfer.perform().map_err(AttemptError::Curl)?;
        }

        let code = easy.response_code().map_err(AttemptError::Curl)?;
        tracing::debug!("{} {} -> HTTP {}", req.method, req.url, code);
        Ok(code)
    }
}
