//! HTTP client with built-in retry and exponential backoff.

use std::sync::Arc;

use crate::retry::{
    run_with_retry, AttemptError, DeliveryFailure, RetryPolicy, Sleeper, ThreadSleeper,
};
use crate::transport::{CurlTransport, PostRequest, Transport};

/// Wraps a `Transport` so every request is retried per `RetryPolicy`.
/// Non-2xx responses are turned into `AttemptError::Http` and classified like transport errors.
#[derive(Clone)]
pub struct RetryingClient {
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl Default for RetryingClient {
    fn default() -> Self {
        Self::new(Arc::new(CurlTransport))
    }
}

impl RetryingClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            policy: RetryPolicy::default(),
            sleeper: Arc::new(ThreadSleeper),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Send `req`, retrying transient failures. Returns once a 2xx is received.
    pub fn send(&self, req: &PostRequest<'_>) -> Result<(), DeliveryFailure> {
        run_with_retry(&self.policy, self.sleeper.as_ref(), req.method, || {
            let code = self.transport.send(req)?;
            if (200..300).contains(&code) {
                Ok(())
            } else {
                Err(AttemptError::Http(code))
            }
        })
    }
}
