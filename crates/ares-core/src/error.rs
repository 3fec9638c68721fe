//! Error types surfaced by resolvers and their configuration layer.

use thiserror::Error;

use crate::retry::DeliveryFailure;

/// Rule configuration is missing a key or holds a value of the wrong shape.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required option `{0}`")]
    MissingOption(&'static str),
    #[error("invalid value for `{key}`: {reason}")]
    InvalidOption { key: String, reason: String },
    #[error("unknown resolver `{0}` (expected `http_post` or `log`)")]
    UnknownResolver(String),
}

impl ConfigError {
    pub(crate) fn invalid(key: &str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidOption {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// The static payload could not be turned into JSON.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("payload value at `{path}` is not a finite number")]
    NonFiniteFloat { path: String },
    #[error("payload serialization failed")]
    Json(#[from] serde_json::Error),
}

/// Delivery to one URL failed for good; later URLs were not attempted.
#[derive(Debug, Error)]
#[error("failed to deliver resolution to {url}")]
pub struct AlertDeliveryError {
    pub url: String,
    #[source]
    pub cause: DeliveryFailure,
}

/// Anything `Resolver::resolve` or resolver construction can fail with.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Payload(#[from] PayloadError),
    #[error(transparent)]
    Delivery(#[from] AlertDeliveryError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::AttemptError;
    use std::error::Error;

    #[test]
    fn delivery_error_chains_to_cause() {
        let e = ResolveError::from(AlertDeliveryError {
            url: "http://a/".into(),
            cause: DeliveryFailure::Rejected(AttemptError::Http(404)),
        });
        assert_eq!(e.to_string(), "failed to deliver resolution to http://a/");
        let cause = e.source().expect("cause");
        assert_eq!(cause.to_string(), "not retryable: HTTP 404");
    }

    #[test]
    fn invalid_option_message() {
        let e = ConfigError::invalid("resolve_http_post_timeout", "must be positive");
        assert_eq!(
            e.to_string(),
            "invalid value for `resolve_http_post_timeout`: must be positive"
        );
    }
}
