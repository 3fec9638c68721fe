//! `ares payload <rule>`: print the request body the HTTP resolver would send.

use anyhow::{Context, Result};
use ares_core::config;
use ares_core::http_post::PAYLOAD_KEY;
use ares_core::{payload, RuleConfig};
use std::path::Path;

pub fn run_payload(path: &Path) -> Result<()> {
    let rule = config::load_rule(path)?;
    println!("{}", render_payload(&rule)?);
    Ok(())
}

pub(crate) fn render_payload(rule: &RuleConfig) -> Result<String> {
    let table = rule.get_table(PAYLOAD_KEY)?.cloned().unwrap_or_default();
    let body = payload::encode(&table).with_context(|| format!("invalid `{}`", PAYLOAD_KEY))?;
    // The encoder escapes non-ASCII, so the body is always valid UTF-8.
    Ok(String::from_utf8(body)?)
}
