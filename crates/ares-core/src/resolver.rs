//! Resolver interface: announce that a previously firing alert is resolved.
//!
//! Callers only depend on this trait and `ResolverKind`; concrete channels
//! (HTTP POST, log) live in their own modules.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::client::RetryingClient;
use crate::config::{check_required, RuleConfig};
use crate::error::{ConfigError, ResolveError};
use crate::http_post::HttpResolver;
use crate::log_resolver::LogResolver;
use crate::logging::LogSink;

/// Implemented by every resolution channel.
pub trait Resolver {
    /// Short channel name, as used in rule files.
    fn name(&self) -> &'static str;

    /// Notify that the alert is resolved. Blocks until done or failed.
    fn resolve(&self) -> Result<(), ResolveError>;
}

/// The known resolver variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverKind {
    HttpPost,
    Log,
}

impl ResolverKind {
    pub const ALL: [ResolverKind; 2] = [ResolverKind::HttpPost, ResolverKind::Log];

    pub fn as_str(self) -> &'static str {
        match self {
            ResolverKind::HttpPost => "http_post",
            ResolverKind::Log => "log",
        }
    }

    /// Keys a rule must define before this variant can be built.
    pub fn required_options(self) -> &'static [&'static str] {
        match self {
            ResolverKind::HttpPost => HttpResolver::REQUIRED_OPTIONS,
            ResolverKind::Log => &[],
        }
    }

    /// Variants selected by the rule's `resolver` key (string or list), or `default` if unset.
    pub fn from_rule(rule: &RuleConfig, default: ResolverKind) -> Result<Vec<Self>, ConfigError> {
        match rule.get_string_list("resolver")? {
            None => Ok(vec![default]),
            Some(names) if names.is_empty() => {
                Err(ConfigError::invalid("resolver", "must name at least one resolver"))
            }
            Some(names) => names.iter().map(|n| n.parse()).collect(),
        }
    }

    /// Check required options, then construct the variant. No network activity.
    pub fn build<'r>(
        self,
        rule: &'r RuleConfig,
        log: Arc<dyn LogSink>,
        client: RetryingClient,
    ) -> Result<Box<dyn Resolver + 'r>, ResolveError> {
        check_required(rule, self.required_options())?;
        let resolver: Box<dyn Resolver + 'r> = match self {
            ResolverKind::HttpPost => Box::new(HttpResolver::new(rule, log)?.with_client(client)),
            ResolverKind::Log => Box::new(LogResolver::new(rule, log)),
        };
        Ok(resolver)
    }
}

impl fmt::Display for ResolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResolverKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s.trim())
            .ok_or_else(|| ConfigError::UnknownResolver(s.to_string()))
    }
}
