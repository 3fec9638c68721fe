//! CLI parse and command rendering tests.

use super::{Cli, CliCommand};
use clap::Parser;

pub(super) fn parse(args: &[&str]) -> CliCommand {
    let cli = Cli::try_parse_from(args).unwrap();
    cli.command
}


#[test]
fn cli_parse_check() {
    match parse(&["ares", "check", "rules/cpu.toml"]) {
        CliCommand::Check { rule } => assert_eq!(rule, "rules/cpu.toml"),
        _ => panic!("expected Check"),
    }
}

#[test]
fn cli_parse_payload() {
    match parse(&["ares", "payload", "r.toml"]) {
        CliCommand::Payload { rule } => assert_eq!(rule, "r.toml"),
        _ => panic!("expected Payload"),
    }
}

#[test]
fn cli_parse_resolve_defaults() {
    match parse(&["ares", "resolve", "r.toml"]) {
        CliCommand::Resolve { rule, resolver } => {
            assert_eq!(rule, "r.toml");
            assert!(resolver.is_none());
        }
        _ => panic!("expected Resolve"),
    }
}

#[test]
fn cli_parse_resolve_override() {
    match parse(&["ares", "resolve", "r.toml", "--resolver", "log"]) {
        CliCommand::Resolve { resolver, .. } => assert_eq!(resolver.as_deref(), Some("log")),
        _ => panic!("expected Resolve"),
    }
}

#[test]
fn cli_requires_rule_path() {
    assert!(Cli::try_parse_from(["ares", "check"]).is_err());
    assert!(Cli::try_parse_from(["ares", "frobnicate"]).is_err());
}
