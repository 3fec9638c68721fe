//! Resolver that only records the resolution in the log.

use std::sync::Arc;

use crate::config::RuleConfig;
use crate::error::ResolveError;
use crate::logging::LogSink;
use crate::resolver::Resolver;

pub struct LogResolver<'r> {
    rule: &'r RuleConfig,
    log: Arc<dyn LogSink>,
}

impl<'r> LogResolver<'r> {
    pub fn new(rule: &'r RuleConfig, log: Arc<dyn LogSink>) -> Self {
        Self { rule, log }
    }
}

impl Resolver for LogResolver<'_> {
    fn name(&self) -> &'static str {
        "log"
    }

    fn resolve(&self) -> Result<(), ResolveError> {
        match self.rule.name() {
            Some(name) => self.log.info(&format!("alert resolved for rule '{}'", name)),
            None => self.log.info("alert resolved"),
        }
        Ok(())
    }
}
