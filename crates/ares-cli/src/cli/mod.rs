//! CLI for ARES alert resolvers.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use ares_core::config;
use std::path::Path;

use commands::{run_check, run_payload, run_resolve};

/// Top-level CLI for ARES.
#[derive(Debug, Parser)]
#[command(name = "ares")]
#[command(about = "ARES: announce resolved alerts to external endpoints", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Validate a rule file and show where resolutions would be sent. No network I/O.
    Check {
        /// Path to the TOML rule file.
        rule: String,
    },

    /// Print the exact JSON body the HTTP resolver would POST.
    Payload {
        /// Path to the TOML rule file.
        rule: String,
    },

    /// Run every resolver the rule selects, stopping at the first failure.
    Resolve {
        /// Path to the TOML rule file.
        rule: String,

        /// Use this resolver instead of the rule's `resolver` key (e.g. "log" for a dry run).
        #[arg(long, value_name = "NAME")]
        resolver: Option<String>,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Check { rule } => run_check(Path::new(&rule), &cfg)?,
            CliCommand::Payload { rule } => run_payload(Path::new(&rule))?,
            CliCommand::Resolve { rule, resolver } => {
                run_resolve(Path::new(&rule), &cfg, resolver.as_deref())?
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
