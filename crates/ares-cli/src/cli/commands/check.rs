//! `ares check <rule>`: validate a rule without sending anything.

use anyhow::{Context, Result};
use ares_core::config::{self, AresConfig};
use ares_core::http_post::{HttpPostSettings, PAYLOAD_KEY};
use ares_core::{payload, ResolverKind, RuleConfig};
use std::fmt::Write as _;
use std::path::Path;

use super::selected_kinds;

pub fn run_check(path: &Path, cfg: &AresConfig) -> Result<()> {
    let rule = config::load_rule(path)?;
    print!("{}", render_check(&rule, cfg)?);
    Ok(())
}

/// Validate every selected resolver and describe its delivery settings.
pub(crate) fn render_check(rule: &RuleConfig, cfg: &AresConfig) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "rule: {}", rule.name().unwrap_or("(unnamed)"))?;

    for kind in selected_kinds(rule, cfg, None)? {
        config::check_required(rule, kind.required_options())
            .with_context(|| format!("resolver `{}`", kind))?;
        writeln!(out, "resolver: {}", kind)?;
        if kind == ResolverKind::HttpPost {
            let settings = HttpPostSettings::from_rule(rule)
                .with_context(|| format!("resolver `{}`", kind))?;
            let body = payload::encode(&settings.static_payload)
                .with_context(|| format!("invalid `{}`", PAYLOAD_KEY))?;
            for url in &settings.post_urls {
                match settings.proxy_for(url) {
                    Some(p) => writeln!(out, "  url: {} (via proxy {})", url, p)?,
                    None => writeln!(out, "  url: {}", url)?,
                }
            }
            writeln!(out, "  timeout: {}s", settings.timeout.as_secs())?;
            for (k, v) in settings.headers() {
                writeln!(out, "  header: {}: {}", k, v)?;
            }
            writeln!(out, "  payload: {} bytes", body.len())?;
        }
    }
    Ok(out)
}
