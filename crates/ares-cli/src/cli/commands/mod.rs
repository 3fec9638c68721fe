//! CLI command handlers. Each command is in its own file.

mod check;
mod payload;
mod resolve;

pub use check::run_check;
pub use payload::run_payload;
pub use resolve::run_resolve;

#[cfg(test)]
pub(crate) use check::render_check;
#[cfg(test)]
pub(crate) use payload::render_payload;
#[cfg(test)]
pub(crate) use resolve::resolve_rule;

use anyhow::{Context, Result};
use ares_core::config::AresConfig;
use ares_core::{ResolverKind, RuleConfig};

/// Resolvers to run: the explicit override, else the rule's `resolver` key, else the config default.
pub(crate) fn selected_kinds(
    rule: &RuleConfig,
    cfg: &AresConfig,
    override_name: Option<&str>,
) -> Result<Vec<ResolverKind>> {
    if let Some(name) = override_name {
        return Ok(vec![name.parse()?]);
    }
    let default: ResolverKind = cfg
        .default_resolver
        .parse()
        .context("invalid default_resolver in config")?;
    Ok(ResolverKind::from_rule(rule, default)?)
}
