//! HTTP POST resolver: sends the rule's static payload as JSON to every configured URL.
//!
//! URLs are tried in order and delivery stops at the first URL that fails for
//! good; later URLs are not contacted. Each request goes through a
//! `RetryingClient`, so transient failures are retried with backoff before
//! they count as failures here.

use std::sync::Arc;
use std::time::Duration;

use crate::client::RetryingClient;
use crate::config::RuleConfig;
use crate::error::{AlertDeliveryError, ConfigError, PayloadError, ResolveError};
use crate::logging::LogSink;
use crate::payload;
use crate::resolver::Resolver;
use crate::transport::PostRequest;

pub const URL_KEY: &str = "resolve_http_post_url";
pub const PROXY_KEY: &str = "resolve_http_post_proxy";
pub const PAYLOAD_KEY: &str = "resolve_http_post_static_payload";
pub const HEADERS_KEY: &str = "resolve_http_post_headers";
pub const TIMEOUT_KEY: &str = "resolve_http_post_timeout";

/// Headers every request starts with; `resolve_http_post_headers` may override them.
pub const DEFAULT_HEADERS: [(&str, &str); 2] = [
    ("Content-Type", "application/json"),
    ("Accept", "application/json;charset=utf-8"),
];

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Delivery settings read from the rule once, at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpPostSettings {
    /// One or more destinations, in delivery order.
    pub post_urls: Vec<String>,
    /// Used for HTTPS destinations only.
    pub proxy: Option<String>,
    pub static_payload: toml::Table,
    pub extra_headers: Vec<(String, String)>,
    /// Per-attempt timeout.
    pub timeout: Duration,
}

impl HttpPostSettings {
    pub fn from_rule(rule: &RuleConfig) -> Result<Self, ConfigError> {
        let post_urls = rule
            .get_string_list(URL_KEY)?
            .ok_or(ConfigError::MissingOption(URL_KEY))?;
        if post_urls.is_empty() {
            return Err(ConfigError::invalid(URL_KEY, "must list at least one URL"));
        }
        for u in &post_urls {
            check_url(u)?;
        }

        let proxy = rule.get_str(PROXY_KEY)?.map(str::to_string);
        let static_payload = rule.get_table(PAYLOAD_KEY)?.cloned().unwrap_or_default();

        let mut extra_headers = Vec::new();
        if let Some(table) = rule.get_table(HEADERS_KEY)? {
            for (name, value) in table {
                let value = value.as_str().ok_or_else(|| {
                    ConfigError::invalid(
                        HEADERS_KEY,
                        format!("header `{}` must be a string, found {}", name, value.type_str()),
                    )
                })?;
                if has_line_break(name) || has_line_break(value) {
                    return Err(ConfigError::invalid(
                        HEADERS_KEY,
                        format!("header `{}` must not contain CR or LF", name.escape_debug()),
                    ));
                }
                extra_headers.push((name.clone(), value.to_string()));
            }
        }

        let timeout = match rule.get_integer(TIMEOUT_KEY)? {
            None => DEFAULT_TIMEOUT,
            Some(secs) if secs > 0 => Duration::from_secs(secs as u64),
            Some(secs) => {
                return Err(ConfigError::invalid(
                    TIMEOUT_KEY,
                    format!("must be a positive number of seconds, got {}", secs),
                ))
            }
        };

        Ok(Self {
            post_urls,
            proxy,
            static_payload,
            extra_headers,
            timeout,
        })
    }

    /// Effective request headers: the JSON defaults overridden by `extra_headers`.
    pub fn headers(&self) -> Vec<(String, String)> {
        merge_headers(&self.extra_headers)
    }

    /// Proxy to use for `url`: the configured proxy for `https` URLs, never for anything else.
    pub fn proxy_for(&self, url: &str) -> Option<&str> {
        let is_https = url::Url::parse(url)
            .map(|u| u.scheme() == "https")
            .unwrap_or(false);
        if is_https {
            self.proxy.as_deref()
        } else {
            None
        }
    }
}

fn has_line_break(s: &str) -> bool {
    s.contains(['\r', '\n'])
}

fn check_url(raw: &str) -> Result<(), ConfigError> {
    let parsed = url::Url::parse(raw)
        .map_err(|e| ConfigError::invalid(URL_KEY, format!("`{}` is not a valid URL: {}", raw, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::invalid(
            URL_KEY,
            format!("`{}` has unsupported scheme `{}`", raw, other),
        )),
    }
}

/// Overlay `extra` on the default headers. Names compare case-insensitively; the
/// override's spelling and value replace the default in place, new names are appended.
pub fn merge_headers(extra: &[(String, String)]) -> Vec<(String, String)> {
    let mut headers: Vec<(String, String)> = DEFAULT_HEADERS
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    for (name, value) in extra {
        match headers
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
        {
            Some(slot) => *slot = (name.clone(), value.clone()),
            None => headers.push((name.clone(), value.clone())),
        }
    }
    headers
}

/// Resolves an alert by POSTing the rule's static payload to each configured URL.
pub struct HttpResolver<'r> {
    rule: &'r RuleConfig,
    settings: HttpPostSettings,
    client: RetryingClient,
    log: Arc<dyn LogSink>,
}

impl<'r> HttpResolver<'r> {
    pub const REQUIRED_OPTIONS: &'static [&'static str] = &[URL_KEY, PAYLOAD_KEY];

    /// Read settings from `rule`. Uses a curl-backed client with the default retry policy.
    pub fn new(rule: &'r RuleConfig, log: Arc<dyn LogSink>) -> Result<Self, ConfigError> {
        Ok(Self {
            rule,
            settings: HttpPostSettings::from_rule(rule)?,
            client: RetryingClient::default(),
            log,
        })
    }

    pub fn with_client(mut self, client: RetryingClient) -> Self {
        self.client = client;
        self
    }

    pub fn settings(&self) -> &HttpPostSettings {
        &self.settings
    }

    pub fn rule(&self) -> &'r RuleConfig {
        self.rule
    }

    /// The exact request body `resolve` sends.
    pub fn body(&self) -> Result<Vec<u8>, PayloadError> {
        payload::encode(&self.settings.static_payload)
    }
}

impl Resolver for HttpResolver<'_> {
    fn name(&self) -> &'static str {
        "http_post"
    }

    fn resolve(&self) -> Result<(), ResolveError> {
        let headers = self.settings.headers();
        let body = self.body()?;

        for url in &self.settings.post_urls {
            let req = PostRequest {
                method: "POST",
                url,
                headers: &headers,
                body: &body,
                proxy: self.settings.proxy_for(url),
                timeout: self.settings.timeout,
            };
            self.client
                .send(&req)
                .map_err(|cause| AlertDeliveryError {
                    url: url.clone(),
                    cause,
                })?;
            tracing::debug!("resolution posted to {}", url);
        }

        let msg = match self.rule.name() {
            Some(name) => format!("HTTP POST resolution sent for rule '{}'", name),
            None => "HTTP POST resolution sent".to_string(),
        };
        self.log.info(&msg);
        Ok(())
    }
}
