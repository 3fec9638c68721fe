use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::retry::RetryPolicy;

/// A rule's key/value configuration, as loaded from a TOML rule file.
///
/// Read-only once built; resolvers borrow it for as long as they live.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleConfig(toml::Table);

/// Either a single value or a list of them; normalized with `into_vec`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(v) => vec![v],
            OneOrMany::Many(v) => v,
        }
    }
}

impl From<toml::Table> for RuleConfig {
    fn from(table: toml::Table) -> Self {
        Self(table)
    }
}

impl FromStr for RuleConfig {
    type Err = toml::de::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.parse::<toml::Table>().map(Self)
    }
}

impl RuleConfig {
    pub fn table(&self) -> &toml::Table {
        &self.0
    }

    pub fn get(&self, key: &str) -> Option<&toml::Value> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Rule name, if the rule sets a string `name`.
    pub fn name(&self) -> Option<&str> {
        self.get("name").and_then(toml::Value::as_str)
    }

    pub fn get_str(&self, key: &str) -> std::result::Result<Option<&str>, ConfigError> {
        match self.get(key) {
            None => Ok(None),
            Some(toml::Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(ConfigError::invalid(
                key,
                format!("expected a string, found {}", other.type_str()),
            )),
        }
    }

    pub fn get_table(&self, key: &str) -> std::result::Result<Option<&toml::Table>, ConfigError> {
        match self.get(key) {
            None => Ok(None),
            Some(toml::Value::Table(t)) => Ok(Some(t)),
            Some(other) => Err(ConfigError::invalid(
                key,
                format!("expected a table, found {}", other.type_str()),
            )),
        }
    }

    pub fn get_integer(&self, key: &str) -> std::result::Result<Option<i64>, ConfigError> {
        match self.get(key) {
            None => Ok(None),
            Some(toml::Value::Integer(i)) => Ok(Some(*i)),
            Some(other) => Err(ConfigError::invalid(
                key,
                format!("expected an integer, found {}", other.type_str()),
            )),
        }
    }

    /// A string or array of strings, normalized to a vector.
    pub fn get_string_list(
        &self,
        key: &str,
    ) -> std::result::Result<Option<Vec<String>>, ConfigError> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        value
            .clone()
            .try_into::<OneOrMany<String>>()
            .map(|v| Some(v.into_vec()))
            .map_err(|_| ConfigError::invalid(key, "expected a string or an array of strings"))
    }
}

/// Check that every key in `required` is present in `rule`.
pub fn check_required(
    rule: &RuleConfig,
    required: &[&'static str],
) -> std::result::Result<(), ConfigError> {
    match required.iter().find(|k| !rule.contains(k)) {
        Some(missing) => Err(ConfigError::MissingOption(*missing)),
        None => Ok(()),
    }
}

/// Load a rule from a TOML file.
pub fn load_rule(path: &Path) -> Result<RuleConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read rule file {}", path.display()))?;
    let rule: RuleConfig = data
        .parse()
        .with_context(|| format!("failed to parse rule file {}", path.display()))?;
    Ok(rule)
}

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt.
    pub max_retries: u32,
    /// Backoff factor in seconds; retry n waits factor * 2^(n-1).
    pub backoff_factor_secs: f64,
    /// Maximum single backoff delay in seconds.
    pub backoff_max_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            backoff_factor_secs: 3.0,
            backoff_max_secs: 120,
        }
    }
}

impl RetryConfig {
    /// Fails if `backoff_factor_secs` is negative, NaN, infinite or too large for a `Duration`.
    pub fn to_policy(&self) -> Result<RetryPolicy> {
        let backoff_factor =
            Duration::try_from_secs_f64(self.backoff_factor_secs).map_err(|e| {
                anyhow::anyhow!(
                    "retry.backoff_factor_secs = {}: {}",
                    self.backoff_factor_secs,
                    e
                )
            })?;
        Ok(RetryPolicy {
            max_retries: self.max_retries,
            backoff_factor,
            backoff_max: Duration::from_secs(self.backoff_max_secs),
            ..RetryPolicy::default()
        })
    }
}

/// Global configuration loaded from `~/.config/ares/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AresConfig {
    /// Resolver used when a rule has no `resolver` key.
    pub default_resolver: String,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl Default for AresConfig {
    fn default() -> Self {
        Self {
            default_resolver: "http_post".to_string(),
            retry: None,
        }
    }
}

impl AresConfig {
    pub fn retry_policy(&self) -> Result<RetryPolicy> {
        match &self.retry {
            Some(retry) => retry.to_policy(),
            None => Ok(RetryPolicy::default()),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("ares")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<AresConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = AresConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: AresConfig = toml::from_str(&data)?;
    cfg.retry_policy()
        .with_context(|| format!("invalid [retry] section in {}", path.display()))?;
    Ok(cfg)
}
