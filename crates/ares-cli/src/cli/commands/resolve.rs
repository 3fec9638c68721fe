//! `ares resolve <rule>`: run the rule's resolvers in order.

use anyhow::{Context, Result};
use ares_core::client::RetryingClient;
use ares_core::config::{self, AresConfig};
use ares_core::logging::{LogSink, TracingSink};
use ares_core::{Resolver, ResolverKind, RuleConfig};
use std::path::Path;
use std::sync::Arc;

use super::selected_kinds;

pub fn run_resolve(path: &Path, cfg: &AresConfig, override_name: Option<&str>) -> Result<()> {
    let rule = config::load_rule(path)?;
    for kind in resolve_rule(&rule, cfg, override_name, Arc::new(TracingSink))? {
        println!("resolved via {}", kind);
    }
    Ok(())
}

/// Build every selected resolver, then resolve them in order. Nothing is announced
/// unless all of them could be built.
pub(crate) fn resolve_rule(
    rule: &RuleConfig,
    cfg: &AresConfig,
    override_name: Option<&str>,
    log: Arc<dyn LogSink>,
) -> Result<Vec<ResolverKind>> {
    let kinds = selected_kinds(rule, cfg, override_name)?;
    let client = RetryingClient::default().with_policy(cfg.retry_policy()?);

    let resolvers: Vec<Box<dyn Resolver + '_>> = kinds
        .iter()
        .map(|&kind| {
            kind.build(rule, log.clone(), client.clone())
                .with_context(|| format!("failed to set up resolver `{}`", kind))
        })
        .collect::<Result<_>>()?;

    for (kind, resolver) in kinds.iter().zip(&resolvers) {
        resolver
            .resolve()
            .with_context(|| format!("resolver `{}` failed", kind))?;
    }
    Ok(kinds)
}
